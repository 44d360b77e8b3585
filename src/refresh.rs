// src/refresh.rs

use reqwest::Client;
use std::{future::Future, sync::Arc, time::Duration};
use tokio::{
    sync::Mutex,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{error, info, instrument, warn};

use crate::{
    error::RefreshError,
    fetch::download::fetch_bytes,
    process::parse_stats,
    stats::{Snapshot, SnapshotCell},
};

/// Owns the refresh cycle for one data source and the snapshot it publishes.
pub struct Refresher {
    client: Client,
    source_url: String,
    cell: SnapshotCell,
    /// Held for a whole cycle so overlapping triggers run one after another.
    cycle: Mutex<()>,
}

impl Refresher {
    pub fn new(client: Client, source_url: impl Into<String>) -> Self {
        Self {
            client,
            source_url: source_url.into(),
            cell: SnapshotCell::default(),
            cycle: Mutex::new(()),
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// The most recently published snapshot. Empty until the first successful cycle.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.cell.load()
    }

    /// A read handle on the published snapshot that can outlive `self`.
    pub fn cell(&self) -> SnapshotCell {
        self.cell.clone()
    }

    /// Run one cycle. Failures are logged and leave the current snapshot in
    /// place; returns whether a new snapshot was published.
    pub async fn refresh(&self) -> bool {
        match self.try_refresh().await {
            Ok(snapshot) => {
                info!(
                    rows = snapshot.len(),
                    total_latest = snapshot.total_latest(),
                    total_delta = snapshot.total_delta(),
                    "published snapshot"
                );
                true
            }
            Err(e) => {
                error!(stage = %e.stage(), url = %self.source_url, error = %e, "refresh failed, keeping previous snapshot");
                false
            }
        }
    }

    /// Run one cycle and report why it failed, if it did.
    ///
    /// Nothing is published unless every step succeeds. If the returned future
    /// is dropped mid-download the cycle is simply abandoned.
    #[instrument(level = "info", skip(self), fields(url = %self.source_url))]
    pub async fn try_refresh(&self) -> Result<Arc<Snapshot>, RefreshError> {
        let _cycle = self.cycle.lock().await;
        let start = Instant::now();

        let body = fetch_bytes(&self.client, &self.source_url).await?;
        let stats = parse_stats(&body)?;

        let next = Arc::new(Snapshot::new(stats, self.source_url.as_str()));
        self.cell.publish(Arc::clone(&next));
        info!(elapsed = ?start.elapsed(), "refresh cycle complete");
        Ok(next)
    }
}

/// Call `refresh` straight away and then every `period` until `shutdown`
/// resolves. Ticks missed while a slow cycle runs are skipped, not queued.
pub async fn run_every<F>(refresher: Arc<Refresher>, period: Duration, shutdown: F)
where
    F: Future<Output = ()>,
{
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("shutdown requested, stopping refresh schedule");
                break;
            }
            _ = ticker.tick() => {
                if !refresher.refresh().await {
                    warn!(next_in = ?period, "serving stale snapshot until next cycle");
                }
            }
        }
    }
}
