use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::interval;
use tracing::{error, info};

use crate::use_cases::reminder::ReminderUseCases;

pub async fn run_reminder_dispatch_loop(reminder_use_cases: Arc<ReminderUseCases>, poll_secs: u64) {
    let mut ticker = interval(Duration::from_secs(poll_secs.max(1)));

    info!("Reminder dispatcher started (polling every {}s)", poll_secs);

    loop {
        ticker.tick().await;

        let now = Utc::now().naive_utc();
        match reminder_use_cases.dispatch_due(now.date(), now).await {
            Ok(results) if results.is_empty() => {}
            Ok(results) => {
                let failed = results.iter().filter(|r| !r.outcome.is_terminal()).count();
                info!(
                    processed = results.len(),
                    failed, "Reminder dispatch pass finished"
                );
            }
            Err(e) => {
                error!(error = ?e, "Failed to fetch due reminders");
            }
        }
    }
}
