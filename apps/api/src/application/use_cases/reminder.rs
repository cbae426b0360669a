use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use subsentry_engine::{Reminder, ReminderMethod, format_amount, format_calendar_date, reminder_date};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::email_templates::reminder_email,
    entities::dispatch::{DeliveryChannel, DispatchOutcome, DispatchResult, SkipReason},
    use_cases::{
        settings::{SettingsRepo, effective_settings},
        subscription::SubscriptionRepo,
        user::{EmailSender, PushSender, UserRepo},
    },
};

/// Upper bound on reminders handled per dispatch pass.
const DUE_BATCH_SIZE: i64 = 100;

/// Failed deliveries after which the dispatcher stops retrying a reminder.
pub const MAX_DELIVERY_ATTEMPTS: u32 = 5;

#[async_trait]
pub trait ReminderRepo: Send + Sync {
    async fn create(&self, user_id: Uuid, reminder: &Reminder) -> AppResult<()>;
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Reminder>>;
    async fn get(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Reminder>>;
    async fn list_for_subscription(&self, subscription_id: Uuid) -> AppResult<Vec<Reminder>>;
    /// Pending reminders scheduled on or before `today` with fewer than
    /// `max_attempts` failed deliveries. Never-attempted reminders come
    /// first, then the least recently attempted, then the oldest schedule.
    async fn list_due(
        &self,
        today: NaiveDate,
        max_attempts: u32,
        limit: i64,
    ) -> AppResult<Vec<Reminder>>;
    /// Persist a recomputed schedule (date, status, sent_at) and clear the
    /// failed-delivery counter.
    async fn update_schedule(&self, reminder: &Reminder) -> AppResult<()>;
    async fn mark_sent(&self, id: Uuid, sent_at: NaiveDateTime) -> AppResult<()>;
    /// Count a failed delivery at `at`. Returns the new number of attempts.
    async fn record_failed_attempt(&self, id: Uuid, at: NaiveDateTime) -> AppResult<u32>;
    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool>;
    async fn delete_for_subscription(&self, subscription_id: Uuid) -> AppResult<u64>;
}

/// Move every reminder of a subscription to match its new billing date,
/// re-arming sent ones that now fall in a later cycle. Returns how many
/// changed.
pub(crate) async fn reschedule_for_subscription(
    repo: &dyn ReminderRepo,
    subscription_id: Uuid,
    next_billing: NaiveDate,
) -> AppResult<usize> {
    let mut moved = 0;
    for mut reminder in repo.list_for_subscription(subscription_id).await? {
        if reminder.reschedule(next_billing)? {
            repo.update_schedule(&reminder).await?;
            moved += 1;
        }
    }
    Ok(moved)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDraft {
    pub subscription_id: Uuid,
    /// Falls back to the user's `reminderDays` setting.
    pub lead_days: Option<i64>,
    #[serde(default)]
    pub method: ReminderMethod,
    pub custom_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderPreview {
    pub subscription_id: Uuid,
    pub next_billing_date: NaiveDate,
    pub lead_days: i64,
    pub scheduled_date: NaiveDate,
}

#[derive(Clone)]
pub struct ReminderUseCases {
    reminders: Arc<dyn ReminderRepo>,
    subscriptions: Arc<dyn SubscriptionRepo>,
    settings: Arc<dyn SettingsRepo>,
    users: Arc<dyn UserRepo>,
    email: Arc<dyn EmailSender>,
    push: Arc<dyn PushSender>,
    app_origin: String,
}

impl ReminderUseCases {
    pub fn new(
        reminders: Arc<dyn ReminderRepo>,
        subscriptions: Arc<dyn SubscriptionRepo>,
        settings: Arc<dyn SettingsRepo>,
        users: Arc<dyn UserRepo>,
        email: Arc<dyn EmailSender>,
        push: Arc<dyn PushSender>,
        app_origin: String,
    ) -> Self {
        Self {
            reminders,
            subscriptions,
            settings,
            users,
            email,
            push,
            app_origin,
        }
    }

    #[instrument(skip(self))]
    pub async fn schedule(&self, user_id: Uuid, draft: ReminderDraft) -> AppResult<Reminder> {
        let subscription = self
            .subscriptions
            .get(user_id, draft.subscription_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let lead_days = self.lead_days_or_default(user_id, draft.lead_days).await?;

        let reminder = Reminder::schedule(
            Uuid::new_v4(),
            subscription.id,
            subscription.next_billing_date,
            lead_days,
            draft.method,
            draft.custom_message,
        )?;
        self.reminders.create(user_id, &reminder).await?;
        Ok(reminder)
    }

    #[instrument(skip(self))]
    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<Reminder>> {
        self.reminders.list_by_user(user_id).await
    }

    /// The date a reminder would fire, without saving anything.
    #[instrument(skip(self))]
    pub async fn preview(
        &self,
        user_id: Uuid,
        subscription_id: Uuid,
        lead_days: Option<i64>,
    ) -> AppResult<ReminderPreview> {
        let subscription = self
            .subscriptions
            .get(user_id, subscription_id)
            .await?
            .ok_or(AppError::NotFound)?;
        let lead_days = self.lead_days_or_default(user_id, lead_days).await?;
        let scheduled_date = reminder_date(subscription.next_billing_date, lead_days)?;

        Ok(ReminderPreview {
            subscription_id,
            next_billing_date: subscription.next_billing_date,
            lead_days,
            scheduled_date,
        })
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<()> {
        if !self.reminders.delete(user_id, id).await? {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// Deliver one reminder right away, whatever its schedule or status.
    #[instrument(skip(self))]
    pub async fn send_now(
        &self,
        user_id: Uuid,
        id: Uuid,
        now: NaiveDateTime,
    ) -> AppResult<DispatchResult> {
        let reminder = self
            .reminders
            .get(user_id, id)
            .await?
            .ok_or(AppError::NotFound)?;

        let outcome = self.dispatch_one(&reminder, now).await?;
        log_outcome(reminder.id, &outcome);
        if let DispatchOutcome::Failed { error } = outcome {
            return Err(AppError::Delivery(error));
        }
        Ok(DispatchResult {
            reminder_id: reminder.id,
            outcome,
        })
    }

    /// Deliver every reminder due on `today`. Errors for a single reminder
    /// are reported as `Failed` and do not stop the pass. A failed reminder
    /// is pushed behind untried ones and dropped from the queue after
    /// [`MAX_DELIVERY_ATTEMPTS`].
    #[instrument(skip(self))]
    pub async fn dispatch_due(
        &self,
        today: NaiveDate,
        now: NaiveDateTime,
    ) -> AppResult<Vec<DispatchResult>> {
        let due = self
            .reminders
            .list_due(today, MAX_DELIVERY_ATTEMPTS, DUE_BATCH_SIZE)
            .await?;
        let mut results = Vec::with_capacity(due.len());

        for reminder in due {
            let outcome = match self.dispatch_one(&reminder, now).await {
                Ok(outcome) => outcome,
                Err(e) => DispatchOutcome::Failed {
                    error: e.to_string(),
                },
            };
            log_outcome(reminder.id, &outcome);
            if matches!(outcome, DispatchOutcome::Failed { .. }) {
                self.record_failure(reminder.id, now).await;
            }
            results.push(DispatchResult {
                reminder_id: reminder.id,
                outcome,
            });
        }

        Ok(results)
    }

    async fn record_failure(&self, reminder_id: Uuid, now: NaiveDateTime) {
        match self.reminders.record_failed_attempt(reminder_id, now).await {
            Ok(attempts) if attempts >= MAX_DELIVERY_ATTEMPTS => {
                warn!(reminder_id = %reminder_id, attempts, "Giving up on reminder delivery");
            }
            Ok(_) => {}
            Err(e) => {
                error!(reminder_id = %reminder_id, error = ?e, "Failed to record delivery attempt");
            }
        }
    }

    async fn lead_days_or_default(&self, user_id: Uuid, lead_days: Option<i64>) -> AppResult<i64> {
        match lead_days {
            Some(days) => Ok(days),
            None => {
                let settings = effective_settings(self.settings.as_ref(), user_id).await?;
                Ok(i64::from(settings.reminder_days))
            }
        }
    }

    async fn dispatch_one(
        &self,
        reminder: &Reminder,
        now: NaiveDateTime,
    ) -> AppResult<DispatchOutcome> {
        let Some(owned) = self.subscriptions.get_owned(reminder.subscription_id).await? else {
            return self
                .finish_skipped(reminder.id, SkipReason::SubscriptionMissing, now)
                .await;
        };
        let Some(owner) = self.users.get_profile_by_id(owned.user_id).await? else {
            return self
                .finish_skipped(reminder.id, SkipReason::SubscriptionMissing, now)
                .await;
        };
        let settings = effective_settings(self.settings.as_ref(), owner.id).await?;
        let subscription = &owned.subscription;

        let email_to = if reminder.method.wants_email() && settings.email_notifications {
            owner.email.as_deref().filter(|e| !e.trim().is_empty())
        } else {
            None
        };
        let push = reminder.method.wants_push() && settings.push_notifications;

        if email_to.is_none() && !push {
            return self
                .finish_skipped(reminder.id, SkipReason::NotificationsDisabled, now)
                .await;
        }

        let mut channels = Vec::with_capacity(2);
        if let Some(to) = email_to {
            let (subject, html) = reminder_email(
                &self.app_origin,
                owner.name.as_deref(),
                subscription,
                reminder.custom_message.as_deref(),
            );
            if let Err(e) = self.email.send(to, &subject, &html).await {
                return Ok(DispatchOutcome::Failed {
                    error: format!("{}: {e}", DeliveryChannel::Email.as_ref()),
                });
            }
            channels.push(DeliveryChannel::Email);
        }
        if push {
            let date = format_calendar_date(subscription.next_billing_date);
            let title = format!("{} renews on {date}", subscription.name);
            let body = match reminder.custom_message.as_deref() {
                Some(note) => format!(
                    "{} due. {note}",
                    format_amount(subscription.currency, subscription.amount)
                ),
                None => format!(
                    "{} due.",
                    format_amount(subscription.currency, subscription.amount)
                ),
            };
            if let Err(e) = self.push.push(owner.id, &title, &body).await {
                return Ok(DispatchOutcome::Failed {
                    error: format!("{}: {e}", DeliveryChannel::Push.as_ref()),
                });
            }
            channels.push(DeliveryChannel::Push);
        }

        self.reminders.mark_sent(reminder.id, now).await?;
        Ok(DispatchOutcome::Sent { channels })
    }

    async fn finish_skipped(
        &self,
        reminder_id: Uuid,
        reason: SkipReason,
        now: NaiveDateTime,
    ) -> AppResult<DispatchOutcome> {
        self.reminders.mark_sent(reminder_id, now).await?;
        Ok(DispatchOutcome::Skipped { reason })
    }
}

fn log_outcome(reminder_id: Uuid, outcome: &DispatchOutcome) {
    match outcome {
        DispatchOutcome::Sent { channels } => {
            info!(reminder_id = %reminder_id, channels = ?channels, "Reminder sent");
        }
        DispatchOutcome::Skipped { reason } => {
            info!(reminder_id = %reminder_id, reason = ?reason, "Reminder skipped");
        }
        DispatchOutcome::Failed { error } => {
            warn!(reminder_id = %reminder_id, error = %error, "Reminder delivery failed");
        }
    }
}
