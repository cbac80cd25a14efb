//! Periodic refresh of the summary.
//!
//! A `Refresher` owns the last summary that loaded successfully and lets at most one
//! aggregation pass run at a time. `watch` drives it on a fixed interval.

use crate::ledger::Summary;
use crate::store::Store;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// The outcome of one call to `Refresher::refresh`.
#[derive(Debug, Clone, PartialEq)]
pub enum Refresh {
    /// A pass completed and this is its summary.
    Updated(Summary),
    /// The pass failed. `last` is the most recent summary that did load, if any.
    Stale {
        error: String,
        last: Option<Summary>,
    },
    /// Another pass was still in flight, so this one did not run.
    Skipped,
}

pub struct Refresher {
    store: Arc<dyn Store>,
    in_flight: AtomicBool,
    last: Mutex<Option<Summary>>,
}

/// Clears the in-flight flag when a pass ends, including when its future is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Refresher {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            in_flight: AtomicBool::new(false),
            last: Mutex::new(None),
        }
    }

    /// Runs one aggregation pass unless one is already running.
    pub async fn refresh(&self) -> Refresh {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("A refresh is already in flight, skipping");
            return Refresh::Skipped;
        }
        let _in_flight = InFlight(&self.in_flight);

        match Summary::load(self.store.as_ref()).await {
            Ok(summary) => {
                *self.last.lock().await = Some(summary.clone());
                Refresh::Updated(summary)
            }
            Err(e) => {
                error!("Failed to load transactions: {e}");
                Refresh::Stale {
                    error: e.to_string(),
                    last: self.last.lock().await.clone(),
                }
            }
        }
    }

    /// The most recent summary that loaded successfully.
    pub async fn last(&self) -> Option<Summary> {
        self.last.lock().await.clone()
    }
}

/// Refreshes once right away and then every `period`, handing each outcome to `on_pass`. Stops
/// after `count` passes when given, or when `shutdown` completes. Ticks that are missed because
/// a pass ran long are skipped rather than bunched up. Shutdown wins over a pending tick.
/// Returns the number of passes run.
pub async fn watch<F, S>(
    refresher: &Refresher,
    period: Duration,
    count: Option<u64>,
    shutdown: S,
    mut on_pass: F,
) -> u64
where
    F: FnMut(&Refresh),
    S: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut passes = 0;
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Stopping after {passes} refreshes");
                break;
            }
            _ = ticker.tick() => {}
        }
        let outcome = refresher.refresh().await;
        on_pass(&outcome);
        passes += 1;
        if count.is_some_and(|c| passes >= c) {
            break;
        }
    }
    passes
}
