//! Hot Score Refresher Background Job
//!
//! Periodically recomputes the decayed hot score for every published topic
//! created within the recompute window and bulk-persists the results. The
//! batch may run while readers are scoring or composing feeds; a mix of
//! stale and fresh scores mid-batch is accepted eventual consistency.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::sleep;

use crate::services::HotScoreService;

/// How often to run the refresher by default (every 10 minutes)
const REFRESH_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Startup delay so pools and connections settle first
const INITIAL_DELAY: Duration = Duration::from_secs(10);

/// Configuration for the hot score refresher
#[derive(Clone)]
pub struct HotScoreRefresherConfig {
    pub enabled: bool,
    pub refresh_interval: Duration,
}

impl Default for HotScoreRefresherConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            refresh_interval: REFRESH_INTERVAL,
        }
    }
}

/// Start the hot score refresher background job
pub async fn start_hot_score_refresher(
    service: Arc<HotScoreService>,
    config: HotScoreRefresherConfig,
) {
    if !config.enabled {
        tracing::info!("Hot score refresher disabled by configuration");
        return;
    }

    tracing::info!(
        interval_secs = config.refresh_interval.as_secs(),
        "Starting hot score refresher background job"
    );

    sleep(INITIAL_DELAY).await;

    loop {
        let cycle_start = Instant::now();

        match service.refresh_all().await {
            Ok(updated) => {
                tracing::info!(
                    topics_updated = updated,
                    duration_ms = cycle_start.elapsed().as_millis() as u64,
                    "Hot score refresh cycle completed"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    duration_ms = cycle_start.elapsed().as_millis() as u64,
                    "Hot score refresh cycle failed"
                );
            }
        }

        sleep(config.refresh_interval).await;
    }
}
