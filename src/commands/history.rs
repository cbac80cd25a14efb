use crate::commands::Out;
use crate::ledger::load_and_merge;
use crate::report::{self, HistoryFormat, Rows};
use crate::{Config, Result};
use chrono::Utc;
use tracing::warn;

/// Prints every stored record, most recent first, as a table, JSON, or CSV.
pub async fn history(config: Config, format: HistoryFormat) -> Result<Out<Rows>> {
    let store = config.store().await?;
    let merged = load_and_merge(&store).await?;
    for failure in &merged.failures {
        warn!("{}", failure.message);
    }
    let rows = report::history_rows(&merged.transactions, format, Utc::now())?;
    Ok(Out::new(rows.to_string(), rows))
}
