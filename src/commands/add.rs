use crate::capture::{self, FormState};
use crate::commands::Out;
use crate::model::{label_for, Record, TransactionType};
use crate::{Config, Result};
use chrono::Utc;
use tracing::debug;

/// Validates and records one income or expense, stamped with the current time. The previous
/// value of the array is backed up before it is replaced.
///
/// # Errors
/// - Returns `ValidationError` (wrapped) if the amount is blank or the category is missing or
///   belongs to the other type. Nothing is written in that case.
/// - Returns an error if the stored array is malformed or the store cannot be written.
pub async fn add(
    config: Config,
    kind: TransactionType,
    amount: &str,
    category: &str,
) -> Result<Out<Record>> {
    let store = config.store().await?;
    let backup = config.backup();
    let form = FormState::new(amount, Some(category.to_string()));
    let record = capture::submit(&store, kind, &form, Utc::now(), Some(&backup)).await?;
    debug!("Appended {record:?} to '{}'", kind.storage_key());

    let label = label_for(record.category()).unwrap_or(record.category());
    Ok(Out::new(
        format!("Saved {kind}: {} for {label}", record.amount()),
        record,
    ))
}
