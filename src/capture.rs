//! Recording new income and expense records.
//!
//! The flow mirrors the capture forms: the user fills a `FormState`, it is validated into a
//! `Record` stamped with the current time, and the record is appended to the array stored under
//! its type's key. A fresh `FormState` is used for the next entry.

use crate::backup::Backup;
use crate::error::{LedgerError, ValidationError};
use crate::ledger::parse_records;
use crate::model::{Record, TransactionType};
use crate::store::Store;
use chrono::{DateTime, Utc};
use tracing::debug;

/// The short-lived contents of a capture form.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FormState {
    pub amount: String,
    pub category: Option<String>,
}

impl FormState {
    pub fn new(amount: impl Into<String>, category: Option<String>) -> Self {
        Self {
            amount: amount.into(),
            category,
        }
    }

    /// Checks the form for `kind` and turns it into a record dated `now`. The amount only has to
    /// be non-blank; the category has to be one the form for `kind` offers.
    pub fn validate(
        &self,
        kind: TransactionType,
        now: DateTime<Utc>,
    ) -> Result<Record, ValidationError> {
        if self.amount.trim().is_empty() {
            return Err(ValidationError::MissingAmount);
        }
        let category = match self.category.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => c,
            _ => return Err(ValidationError::MissingCategory),
        };
        if !kind.accepts_category(category) {
            return Err(ValidationError::UnknownCategory {
                kind: kind.to_string(),
                category: category.to_string(),
            });
        }
        Ok(Record::captured_at(self.amount.as_str(), category, now))
    }
}

/// Appends `record` to the array stored under `kind`'s key and returns the new length of the
/// array.
///
/// When `backup` is given, the previous value is saved there before it is replaced. A value that
/// cannot be parsed is never overwritten: the append fails with `LedgerError::Parse` instead.
pub async fn append(
    store: &dyn Store,
    kind: TransactionType,
    record: Record,
    backup: Option<&Backup>,
) -> Result<usize, LedgerError> {
    let key = kind.storage_key();
    let existing = store
        .get(key)
        .await
        .map_err(|e| LedgerError::storage(key, e))?;
    let mut records = parse_records(key, existing.as_deref())?;

    if let (Some(backup), Some(raw)) = (backup, existing.as_deref()) {
        let path = backup
            .save(key, raw)
            .await
            .map_err(|e| LedgerError::storage(key, e))?;
        debug!("Saved backup to {}", path.display());
    }

    records.push(record);
    let json = serde_json::to_string(&records)
        .map_err(|e| LedgerError::storage(key, anyhow::Error::new(e)))?;
    store
        .set(key, json)
        .await
        .map_err(|e| LedgerError::storage(key, e))?;
    Ok(records.len())
}

/// Validates `form` and appends the resulting record. Nothing is written if validation fails.
pub async fn submit(
    store: &dyn Store,
    kind: TransactionType,
    form: &FormState,
    now: DateTime<Utc>,
    backup: Option<&Backup>,
) -> Result<Record, LedgerError> {
    let record = form.validate(kind, now)?;
    append(store, kind, record.clone(), backup).await?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::load_and_merge;
    use crate::model::{EXPENSES, INCOMES};
    use crate::store::MemoryStore;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 8, 30, 0).unwrap()
    }

    fn form(amount: &str, category: Option<&str>) -> FormState {
        FormState::new(amount, category.map(str::to_string))
    }

    #[test]
    fn test_validate_ok() {
        let record = form("250000", Some("food_beverages"))
            .validate(TransactionType::Expense, now())
            .unwrap();
        assert_eq!(
            record,
            Record::new("250000", "food_beverages", "2024-01-02T08:30:00.000Z")
        );
    }

    #[test]
    fn test_validate_missing_amount() {
        let err = form("  ", Some("salary"))
            .validate(TransactionType::Income, now())
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingAmount);
    }

    #[test]
    fn test_validate_missing_category() {
        let err = form("5", None)
            .validate(TransactionType::Income, now())
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingCategory);
        let err = form("5", Some(""))
            .validate(TransactionType::Income, now())
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingCategory);
    }

    #[test]
    fn test_validate_category_of_other_kind() {
        let err = form("5", Some("salary"))
            .validate(TransactionType::Expense, now())
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownCategory { .. }));
    }

    #[test]
    fn test_validate_does_not_check_amount_format() {
        let record = form("abc", Some("other"))
            .validate(TransactionType::Income, now())
            .unwrap();
        assert_eq!(record.amount().raw(), "abc");
    }

    #[tokio::test]
    async fn test_append_then_reload_round_trips() {
        let store = MemoryStore::default();
        let record = Record::new("1000000", "salary", "2024-01-01T00:00:00.000Z");
        let len = append(&store, TransactionType::Income, record.clone(), None)
            .await
            .unwrap();
        assert_eq!(len, 1);

        let merged = load_and_merge(&store).await.unwrap();
        assert_eq!(merged.transactions.len(), 1);
        assert_eq!(merged.transactions[0].record(), &record);
        assert_eq!(merged.transactions[0].kind(), TransactionType::Income);
        assert!(store.get(EXPENSES).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_append_keeps_existing_records() {
        let store = MemoryStore::with_values([(
            EXPENSES,
            r#"[{"amount":"1","category":"education","date":"2024-01-01"}]"#,
        )]);
        let len = append(
            &store,
            TransactionType::Expense,
            Record::new("2", "insurance", "2024-01-02"),
            None,
        )
        .await
        .unwrap();
        assert_eq!(len, 2);
        let stored = store.get(EXPENSES).await.unwrap().unwrap();
        let records = parse_records(EXPENSES, Some(&stored)).unwrap();
        assert_eq!(records[0].category(), "education");
        assert_eq!(records[1].category(), "insurance");
    }

    #[tokio::test]
    async fn test_append_refuses_to_overwrite_corrupt_value() {
        let store = MemoryStore::with_values([(INCOMES, "[{oops")]);
        let err = append(
            &store,
            TransactionType::Income,
            Record::new("1", "salary", "2024-01-01"),
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, LedgerError::Parse { .. }));
        assert_eq!(store.get(INCOMES).await.unwrap().as_deref(), Some("[{oops"));
    }

    #[tokio::test]
    async fn test_append_backs_up_previous_value() {
        let dir = TempDir::new().unwrap();
        let backup = Backup::with_settings(dir.path(), 3);
        let store = MemoryStore::default();

        // Nothing to back up the first time.
        append(
            &store,
            TransactionType::Expense,
            Record::new("1", "education", "2024-01-01"),
            Some(&backup),
        )
        .await
        .unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        let previous = store.get(EXPENSES).await.unwrap().unwrap();
        append(
            &store,
            TransactionType::Expense,
            Record::new("2", "education", "2024-01-02"),
            Some(&backup),
        )
        .await
        .unwrap();
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(std::fs::read_to_string(&entries[0]).unwrap(), previous);
    }

    #[tokio::test]
    async fn test_submit_invalid_form_writes_nothing() {
        let store = MemoryStore::default();
        let err = submit(
            &store,
            TransactionType::Expense,
            &form("", Some("healthcare")),
            now(),
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Validation(ValidationError::MissingAmount)
        ));
        assert!(store.get(EXPENSES).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_submit_then_reset() {
        let store = MemoryStore::default();
        let mut state = form("75000", Some("transportation"));
        let record = submit(&store, TransactionType::Expense, &state, now(), None)
            .await
            .unwrap();
        assert_eq!(record.date(), "2024-01-02T08:30:00.000Z");
        state = FormState::default();
        assert_eq!(state, FormState::new("", None));
    }
}
