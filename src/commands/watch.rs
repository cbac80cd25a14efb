use crate::commands::Out;
use crate::refresh::{self, Refresh, Refresher};
use crate::store::Store;
use crate::{report, Config, Result};
use anyhow::bail;
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Re-renders the summary every `interval` seconds (or `refresh_seconds` from the config) until
/// Ctrl-C, or until `count` passes have run.
///
/// A pass that fails to read the store is reported and the last good summary is shown again.
pub async fn watch(
    config: Config,
    interval: Option<u64>,
    count: Option<u64>,
    by_category: bool,
) -> Result<Out<u64>> {
    watch_until(config, interval, count, by_category, ctrl_c()).await
}

async fn watch_until(
    config: Config,
    interval: Option<u64>,
    count: Option<u64>,
    by_category: bool,
    shutdown: impl Future<Output = ()>,
) -> Result<Out<u64>> {
    let period = match interval {
        Some(0) => bail!("The refresh interval must be at least one second"),
        Some(seconds) => Duration::from_secs(seconds),
        None => config.refresh_interval(),
    };
    let store: Arc<dyn Store> = Arc::new(config.store().await?);
    let refresher = Refresher::new(store);
    info!("Refreshing every {}s, press Ctrl-C to stop", period.as_secs());

    let passes = refresh::watch(&refresher, period, count, shutdown, |outcome| {
        match outcome {
            Refresh::Updated(summary) => {
                info!(
                    "{}",
                    report::render_summary(summary, by_category, Utc::now())
                );
            }
            Refresh::Stale { error, last } => {
                warn!("Refresh failed: {error}");
                if let Some(last) = last {
                    info!("{}", report::render_summary(last, by_category, Utc::now()));
                }
            }
            Refresh::Skipped => debug!("Previous refresh still running"),
        }
    })
    .await;

    Ok(Out::new(format!("Stopped after {passes} refreshes"), passes))
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Unable to listen for Ctrl-C, use --count to stop: {e}");
        std::future::pending::<()>().await;
    }
}
