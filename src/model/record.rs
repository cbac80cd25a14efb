use crate::model::category::{label_for, CategoryOption, ExpenseCategory, IncomeCategory};
use crate::model::Amount;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The store key holding expense records.
pub const EXPENSES: &str = "expenses";

/// The store key holding income records.
pub const INCOMES: &str = "incomes";

/// Whether a transaction is money coming in or going out. This is never persisted; it is
/// derived from the store key that a record was read from.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

impl TransactionType {
    /// The store key whose records are of this type.
    pub fn storage_key(&self) -> &'static str {
        match self {
            TransactionType::Income => INCOMES,
            TransactionType::Expense => EXPENSES,
        }
    }

    /// Returns true if `category` is one of the values that this type's form offers.
    pub fn accepts_category(&self, category: &str) -> bool {
        match self {
            TransactionType::Income => category.parse::<IncomeCategory>().is_ok(),
            TransactionType::Expense => category.parse::<ExpenseCategory>().is_ok(),
        }
    }

    /// The picker list for this type.
    pub fn category_options(&self) -> Vec<CategoryOption> {
        match self {
            TransactionType::Income => IncomeCategory::ALL
                .iter()
                .map(|c| CategoryOption {
                    value: c.to_string(),
                    label: c.label().to_string(),
                })
                .collect(),
            TransactionType::Expense => ExpenseCategory::ALL
                .iter()
                .map(|c| CategoryOption {
                    value: c.to_string(),
                    label: c.label().to_string(),
                })
                .collect(),
        }
    }
}

/// One element of the JSON array stored under `"expenses"` or `"incomes"`.
///
/// Example:
/// ```json
/// { "amount": "250000", "category": "food_beverages", "date": "2024-01-02T00:00:00.000Z" }
/// ```
///
/// Missing fields read as empty so that one odd record does not make the whole array
/// unreadable. Fields the forms never write, including a stray `type`, are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub(crate) amount: Amount,
    #[serde(default)]
    pub(crate) category: String,
    #[serde(default)]
    pub(crate) date: String,
}

impl Record {
    pub fn new(
        amount: impl Into<Amount>,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            category: category.into(),
            date: date.into(),
        }
    }

    /// Creates a record stamped with `now`, as the capture forms do.
    pub fn captured_at(
        amount: impl Into<Amount>,
        category: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self::new(amount, category, iso_timestamp(now))
    }

    pub fn amount(&self) -> &Amount {
        &self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> &str {
        &self.date
    }
}

/// A `Record` together with the type of the store it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Transaction {
    #[serde(flatten)]
    record: Record,
    #[serde(rename = "type")]
    kind: TransactionType,
}

impl Transaction {
    pub fn new(record: Record, kind: TransactionType) -> Self {
        Self { record, kind }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn amount(&self) -> &Amount {
        &self.record.amount
    }

    pub fn category(&self) -> &str {
        &self.record.category
    }

    /// The picker label for the category, or the stored text when no form offers it.
    pub fn category_label(&self) -> &str {
        label_for(&self.record.category).unwrap_or(self.record.category.as_str())
    }

    pub fn date(&self) -> &str {
        &self.record.date
    }

    /// The parsed date, or `None` when the stored text is not a recognizable timestamp.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.record.date)
    }
}

impl Display for Transaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.kind,
            self.record.amount,
            self.category_label(),
            self.record.date
        )
    }
}

/// Formats `t` the way the capture forms stamp records, e.g. `2024-01-02T00:00:00.000Z`.
pub fn iso_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses the ISO-8601 shapes that have been seen in stores. Timestamps without an offset and
/// bare dates are taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_storage_keys() {
        assert_eq!(TransactionType::Income.storage_key(), "incomes");
        assert_eq!(TransactionType::Expense.storage_key(), "expenses");
    }

    #[test]
    fn test_accepts_category() {
        assert!(TransactionType::Expense.accepts_category("food_beverages"));
        assert!(!TransactionType::Expense.accepts_category("salary"));
        assert!(TransactionType::Income.accepts_category("salary"));
        assert!(!TransactionType::Income.accepts_category("Salary"));
    }

    #[test]
    fn test_record_ignores_stored_type() {
        let json = r#"{"amount":"5","category":"salary","date":"2024-01-01","type":"expense"}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record, Record::new("5", "salary", "2024-01-01"));
    }

    #[test]
    fn test_record_missing_fields_are_empty() {
        let record: Record = serde_json::from_str(r#"{"amount":"5"}"#).unwrap();
        assert_eq!(record.category(), "");
        assert_eq!(record.date(), "");
    }

    #[test]
    fn test_record_serializes_without_type() {
        let record = Record::new("1000000", "salary", "2024-01-01T00:00:00.000Z");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"amount":"1000000","category":"salary","date":"2024-01-01T00:00:00.000Z"}"#
        );
    }

    #[test]
    fn test_transaction_serializes_type() {
        let t = Transaction::new(
            Record::new("1", "salary", "2024-01-01T00:00:00.000Z"),
            TransactionType::Income,
        );
        let value = serde_json::to_value(&t).unwrap();
        assert_eq!(value["type"], "income");
        assert_eq!(value["amount"], "1");
    }

    #[test]
    fn test_iso_timestamp() {
        let t = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(iso_timestamp(t), "2024-01-02T03:04:05.000Z");
    }

    #[test]
    fn test_parse_timestamp_shapes() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-01-02T00:00:00.000Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02T07:00:00+07:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02T00:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02T00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-01-02"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn test_category_label_falls_back_to_raw() {
        let t = Transaction::new(Record::new("1", "lottery", ""), TransactionType::Income);
        assert_eq!(t.category_label(), "lottery");
        let t = Transaction::new(
            Record::new("1", "debt_payments", ""),
            TransactionType::Expense,
        );
        assert_eq!(t.category_label(), "Debt Payments");
    }
}
