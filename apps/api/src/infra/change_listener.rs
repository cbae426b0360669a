use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use serde::Deserialize;
use sqlx::postgres::PgListener;
use subsentry_engine::{BoardUpdate, SubscriptionChange};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    adapters::persistence::subscription::SubscriptionDb,
    use_cases::subscription::SubscriptionUseCases,
};

const RECONNECT_BACKOFF_SECS: u64 = 5;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Deserialize)]
struct RowId {
    id: Uuid,
}

/// Payload published by the `subscriptions` trigger:
/// `{"type": "...", "record": {row} | null, "old_record": {"id": ...} | null}`.
#[derive(Debug, Deserialize)]
struct ChangeNotification {
    #[serde(rename = "type")]
    kind: ChangeKind,
    record: Option<SubscriptionDb>,
    old_record: Option<RowId>,
}

pub fn decode_change(payload: &str) -> anyhow::Result<SubscriptionChange> {
    let notification: ChangeNotification =
        serde_json::from_str(payload).context("malformed change notification")?;

    match notification {
        ChangeNotification {
            kind: ChangeKind::Insert,
            record: Some(row),
            ..
        } => Ok(SubscriptionChange::Insert { record: row.into() }),
        ChangeNotification {
            kind: ChangeKind::Update,
            record: Some(row),
            ..
        } => Ok(SubscriptionChange::Update { record: row.into() }),
        ChangeNotification {
            kind: ChangeKind::Delete,
            old_record: Some(old),
            ..
        } => Ok(SubscriptionChange::Delete { id: old.id }),
        ChangeNotification { kind, .. } => {
            anyhow::bail!("{kind:?} notification without the row it refers to")
        }
    }
}

/// Follows the subscriptions change feed for the life of the process.
/// A dropped connection is re-established after a fixed back-off.
pub async fn run_change_listener(
    database_url: String,
    channel: String,
    subscription_use_cases: Arc<SubscriptionUseCases>,
) {
    info!(channel = %channel, "Change listener started");

    loop {
        if let Err(e) = listen(&database_url, &channel, &subscription_use_cases).await {
            error!(
                channel = %channel,
                error = ?e,
                "Change listener disconnected, retrying in {}s",
                RECONNECT_BACKOFF_SECS
            );
        }
        sleep(Duration::from_secs(RECONNECT_BACKOFF_SECS)).await;
    }
}

async fn listen(
    database_url: &str,
    channel: &str,
    subscription_use_cases: &SubscriptionUseCases,
) -> anyhow::Result<()> {
    let mut listener = PgListener::connect(database_url).await?;
    listener.listen(channel).await?;
    debug!(channel = %channel, "Subscribed to change notifications");

    loop {
        let notification = listener.recv().await?;
        handle_notification(subscription_use_cases, notification.payload()).await;
    }
}

async fn handle_notification(subscription_use_cases: &SubscriptionUseCases, payload: &str) {
    let change = match decode_change(payload) {
        Ok(change) => change,
        Err(e) => {
            warn!(error = ?e, payload = %payload, "Ignoring change notification");
            return;
        }
    };

    let subscription_id = change.subscription_id();
    let today = Utc::now().date_naive();
    match subscription_use_cases.apply_change(change, today).await {
        Ok(BoardUpdate::Upserted(view)) => {
            debug!(subscription_id = %subscription_id, status = %view.status, "Subscription re-classified");
        }
        Ok(BoardUpdate::Removed(_)) => {
            debug!(subscription_id = %subscription_id, "Subscription removed");
        }
        Ok(BoardUpdate::Ignored) => {
            debug!(subscription_id = %subscription_id, "Change for a row that is already gone");
        }
        Err(e) => {
            error!(subscription_id = %subscription_id, error = ?e, "Failed to apply subscription change");
        }
    }
}
