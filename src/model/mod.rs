//! Types that represent the core data model, such as `Record` and `Transaction`.
mod amount;
mod category;
mod record;

pub use amount::{format_idr, parse_float, Amount};
pub use category::{label_for, CategoryOption, ExpenseCategory, IncomeCategory};
pub use record::{
    iso_timestamp, parse_timestamp, Record, Transaction, TransactionType, EXPENSES, INCOMES,
};
