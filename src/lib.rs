//! kantong: a personal income and expense tracker.
//!
//! Incomes and expenses are kept as two JSON arrays in a key-value store. Every read merges them
//! into one history, most recent first, with income and expense totals and the balance.

pub mod args;
mod backup;
pub mod capture;
pub mod commands;
mod config;
mod error;
pub mod ledger;
pub mod model;
pub mod refresh;
pub mod report;
pub mod store;
mod utils;


pub use backup::Backup;
pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use error::{LedgerError, ValidationError};
