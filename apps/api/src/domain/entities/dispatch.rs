use serde::Serialize;
use strum::AsRefStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeliveryChannel {
    Email,
    Push,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// Every channel the reminder asked for is switched off (or the owner
    /// has no email address on file).
    NotificationsDisabled,
    /// The subscription or its owner no longer exists.
    SubscriptionMissing,
}

/// Result of trying to deliver one reminder.
///
/// `Sent` and `Skipped` are terminal: the reminder is marked sent. `Failed`
/// leaves it pending so the next tick retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum DispatchOutcome {
    Sent { channels: Vec<DeliveryChannel> },
    Skipped { reason: SkipReason },
    Failed { error: String },
}

impl DispatchOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DispatchOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    pub reminder_id: Uuid,
    #[serde(flatten)]
    pub outcome: DispatchOutcome,
}
