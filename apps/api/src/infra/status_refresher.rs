use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::interval;
use tracing::{debug, error, info};

use crate::use_cases::subscription::SubscriptionUseCases;

/// Keeps the persisted `status` column in step with the calendar. Reads never
/// depend on it; it exists for queries and exports that filter by status.
pub async fn run_status_refresh_loop(
    subscription_use_cases: Arc<SubscriptionUseCases>,
    refresh_secs: u64,
) {
    let mut ticker = interval(Duration::from_secs(refresh_secs.max(1)));

    info!("Status refresher started (every {}s)", refresh_secs);

    loop {
        ticker.tick().await;

        let today = Utc::now().date_naive();
        match subscription_use_cases.refresh_status_cache(today).await {
            Ok(0) => debug!(%today, "Subscription statuses already current"),
            Ok(rewritten) => info!(%today, rewritten, "Refreshed subscription statuses"),
            Err(e) => error!(error = ?e, "Failed to refresh subscription statuses"),
        }
    }
}
