use crate::commands::Out;
use crate::ledger::Summary;
use crate::{report, Config, Result};
use chrono::Utc;

/// Loads both arrays, totals them, and renders the summary view. With `by_category` the history
/// is grouped by category with a subtotal per group.
pub async fn summary(config: Config, by_category: bool) -> Result<Out<Summary>> {
    let store = config.store().await?;
    let summary = Summary::load(&store).await?;
    let text = report::render_summary(&summary, by_category, Utc::now());
    Ok(Out::new(text, summary))
}
