//! Text renderings of a summary and of the transaction history.

use crate::ledger::{format_relative_date, Summary};
use crate::model::{format_idr, Transaction};
use crate::Result;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter, Write};

/// The output format for `kantong history`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum HistoryFormat {
    /// A markdown table.
    #[default]
    Table,
    /// A JSON array of transactions, each with its `type`.
    Json,
    /// CSV with a header row.
    Csv,
}

serde_plain::derive_display_from_serialize!(HistoryFormat);
serde_plain::derive_fromstr_from_deserialize!(HistoryFormat);

/// History rows in the requested output format.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rows {
    /// JSON array of objects.
    Json(serde_json::Value),
    /// Markdown table as a single formatted string.
    Table(String),
    /// CSV data as a properly escaped string.
    Csv(String),
}

impl Debug for Rows {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rows::Json(v) => write!(f, "Rows::Json({:?})", v),
            Rows::Table(s) => write!(f, "Rows::Table({} chars)", s.len()),
            Rows::Csv(s) => write!(f, "Rows::Csv({} chars)", s.len()),
        }
    }
}

impl Display for Rows {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rows::Json(v) => {
                if let Ok(s) = serde_json::to_string_pretty(v) {
                    write!(f, "{}", s)
                } else {
                    write!(f, "{:?}", v)
                }
            }
            Rows::Table(s) => write!(f, "{}", s),
            Rows::Csv(s) => write!(f, "{}", s),
        }
    }
}

const HEADERS: [&str; 5] = ["Type", "Amount", "Category", "Date", "When"];

/// Renders `transactions` in `format`, with relative dates computed against `now`.
pub fn history_rows(
    transactions: &[Transaction],
    format: HistoryFormat,
    now: DateTime<Utc>,
) -> Result<Rows> {
    Ok(match format {
        HistoryFormat::Json => Rows::Json(
            serde_json::to_value(transactions).context("Unable to serialize transactions")?,
        ),
        HistoryFormat::Table => Rows::Table(markdown_table(transactions, now)),
        HistoryFormat::Csv => Rows::Csv(csv_rows(transactions, now)?),
    })
}

fn cells(t: &Transaction, now: DateTime<Utc>) -> [String; 5] {
    [
        t.kind().to_string(),
        t.amount().to_string(),
        t.category_label().to_string(),
        t.date().to_string(),
        format_relative_date(t.date(), now),
    ]
}

fn markdown_table(transactions: &[Transaction], now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "| {} |", HEADERS.join(" | "));
    let _ = writeln!(out, "|{}", "---|".repeat(HEADERS.len()));
    for t in transactions {
        let row: Vec<String> = cells(t, now)
            .iter()
            .map(|c| c.replace('|', "\\|"))
            .collect();
        let _ = writeln!(out, "| {} |", row.join(" | "));
    }
    out
}

fn csv_rows(transactions: &[Transaction], now: DateTime<Utc>) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(HEADERS)
        .context("Unable to write CSV header")?;
    for t in transactions {
        writer
            .write_record(cells(t, now))
            .context("Unable to write CSV row")?;
    }
    let bytes = writer.into_inner().context("Unable to finish CSV output")?;
    String::from_utf8(bytes).context("CSV output was not UTF-8")
}

/// Renders the summary view: totals, then the history either as one list or grouped by
/// category with a subtotal per group.
pub fn render_summary(summary: &Summary, by_category: bool, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Finances");
    let _ = writeln!(out, "Income:   {}", format_idr(summary.income_total));
    let _ = writeln!(out, "Expenses: {}", format_idr(summary.expense_total));
    let _ = writeln!(out, "Balance:  {}", format_idr(summary.balance));
    for failure in &summary.failures {
        let _ = writeln!(out, "Warning: {}", failure.message);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Transaction History");

    if summary.transactions.is_empty() {
        let _ = writeln!(out, "  (no transactions)");
        return out;
    }

    if by_category {
        for group in summary.groups() {
            let _ = writeln!(
                out,
                "{} ({}) {}",
                group.label(),
                group.transactions().len(),
                format_idr(group.total())
            );
            for t in group.transactions() {
                let _ = writeln!(out, "    {}", history_line(t, now));
            }
        }
    } else {
        for t in &summary.transactions {
            let _ = writeln!(out, "  {}", history_line(t, now));
        }
    }
    out
}

fn history_line(t: &Transaction, now: DateTime<Utc>) -> String {
    format!(
        "{:<7} {:>20}  {}  {}",
        t.kind(),
        t.amount().to_string(),
        t.category_label(),
        format_relative_date(t.date(), now)
    )
}
