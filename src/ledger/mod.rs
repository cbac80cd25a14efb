//! Aggregation of the stored records into what the summary view shows.
//!
//! Every pass starts from the store: both arrays are read, parsed and tagged with the type of
//! the key they came from, then merged newest first. Nothing is cached between passes.

mod grouping;
mod relative_date;

use crate::error::LedgerError;
use crate::model::{Record, Transaction, TransactionType, EXPENSES, INCOMES};
use crate::store::Store;
use serde::Serialize;
use std::cmp::Reverse;
use tracing::{debug, warn};

pub use grouping::{group_by_category, total_by_category, CategoryGroup};
pub use relative_date::{absolute_date, day_difference, format_relative_date};

/// A source whose stored value could not be parsed during a pass. The pass carried on without
/// it.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct SourceFailure {
    pub kind: TransactionType,
    pub message: String,
}

/// The result of `load_and_merge`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Merged {
    /// All records of both sources, most recent first.
    pub transactions: Vec<Transaction>,
    /// Sources that were treated as empty because their value was malformed.
    pub failures: Vec<SourceFailure>,
}

/// Reads both store keys, tags their records, and returns them merged and sorted by date,
/// most recent first.
///
/// # Errors
/// - A failing store call is returned as `LedgerError::Storage`.
/// - A malformed value is not an error: it is logged, recorded in `Merged::failures`, and that
///   source contributes no records.
pub async fn load_and_merge(store: &dyn Store) -> Result<Merged, LedgerError> {
    let keys = [INCOMES, EXPENSES];
    let values = store
        .snapshot(&keys)
        .await
        .map_err(|e| LedgerError::storage(keys.join(", "), e))?;

    let mut merged = Merged::default();
    for (kind, raw) in [TransactionType::Income, TransactionType::Expense]
        .into_iter()
        .zip(values)
    {
        match parse_records(kind.storage_key(), raw.as_deref()) {
            Ok(records) => {
                debug!("Loaded {} {kind} records", records.len());
                merged
                    .transactions
                    .extend(records.into_iter().map(|r| Transaction::new(r, kind)));
            }
            Err(e) => {
                warn!("{e}");
                merged.failures.push(SourceFailure {
                    kind,
                    message: e.to_string(),
                });
            }
        }
    }

    sort_by_date_desc(&mut merged.transactions);
    Ok(merged)
}

/// Parses the value stored under `key`. A missing, empty, or `null` value is an empty list.
pub fn parse_records(key: &str, raw: Option<&str>) -> Result<Vec<Record>, LedgerError> {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Ok(Vec::new()),
    };
    let records: Option<Vec<Record>> =
        serde_json::from_str(raw).map_err(|e| LedgerError::parse(key, e))?;
    Ok(records.unwrap_or_default())
}

/// Sorts most recent first. Equal dates keep their relative order, and records without a
/// parseable date go last.
pub fn sort_by_date_desc(transactions: &mut [Transaction]) {
    transactions.sort_by_cached_key(|t| Reverse(t.timestamp()));
}

/// Sums the amounts of all transactions of `kind`. Amounts that are not numbers count as zero.
pub fn total_by_type(transactions: &[Transaction], kind: TransactionType) -> f64 {
    transactions
        .iter()
        .filter(|t| t.kind() == kind)
        .map(|t| t.amount().value_or_zero())
        .sum()
}

/// Everything the summary view needs from one pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub income_total: f64,
    pub expense_total: f64,
    pub balance: f64,
    pub transactions: Vec<Transaction>,
    pub failures: Vec<SourceFailure>,
}

impl Summary {
    pub fn new(merged: Merged) -> Self {
        let income_total = total_by_type(&merged.transactions, TransactionType::Income);
        let expense_total = total_by_type(&merged.transactions, TransactionType::Expense);
        Self {
            income_total,
            expense_total,
            balance: income_total - expense_total,
            transactions: merged.transactions,
            failures: merged.failures,
        }
    }

    /// Runs `load_and_merge` and totals the result.
    pub async fn load(store: &dyn Store) -> Result<Self, LedgerError> {
        Ok(Self::new(load_and_merge(store).await?))
    }

    pub fn groups(&self) -> Vec<CategoryGroup> {
        group_by_category(&self.transactions)
    }
}
