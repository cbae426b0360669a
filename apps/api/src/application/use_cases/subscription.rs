use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::NaiveDate;
use subsentry_engine::{
    BoardUpdate, Subscription, SubscriptionBoard, SubscriptionChange, SubscriptionDraft,
    SubscriptionPatch, SubscriptionStats, SubscriptionStatus, SubscriptionView,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    use_cases::{
        reminder::{ReminderRepo, reschedule_for_subscription},
        settings::{SettingsRepo, effective_settings},
    },
};

/// A subscription row together with its owner and the status last written
/// to the cache column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedSubscription {
    pub user_id: Uuid,
    pub subscription: Subscription,
    /// `None` when the column is empty or holds an unknown value.
    pub cached_status: Option<SubscriptionStatus>,
}

#[async_trait]
pub trait SubscriptionRepo: Send + Sync {
    async fn create(
        &self,
        user_id: Uuid,
        subscription: &Subscription,
        status: SubscriptionStatus,
    ) -> AppResult<()>;
    /// Ordered by next billing date, earliest first.
    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Subscription>>;
    async fn get(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Subscription>>;
    async fn get_owned(&self, id: Uuid) -> AppResult<Option<OwnedSubscription>>;
    async fn list_all(&self) -> AppResult<Vec<OwnedSubscription>>;
    async fn update(
        &self,
        user_id: Uuid,
        subscription: &Subscription,
        status: SubscriptionStatus,
    ) -> AppResult<()>;
    async fn set_status(&self, id: Uuid, status: SubscriptionStatus) -> AppResult<()>;
    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct SubscriptionUseCases {
    repo: Arc<dyn SubscriptionRepo>,
    reminders: Arc<dyn ReminderRepo>,
    settings: Arc<dyn SettingsRepo>,
}

impl SubscriptionUseCases {
    pub fn new(
        repo: Arc<dyn SubscriptionRepo>,
        reminders: Arc<dyn ReminderRepo>,
        settings: Arc<dyn SettingsRepo>,
    ) -> Self {
        Self {
            repo,
            reminders,
            settings,
        }
    }

    #[instrument(skip(self, draft))]
    pub async fn create(
        &self,
        user_id: Uuid,
        draft: SubscriptionDraft,
        today: NaiveDate,
    ) -> AppResult<SubscriptionView> {
        let settings = effective_settings(self.settings.as_ref(), user_id).await?;
        let subscription = draft.into_subscription(Uuid::new_v4(), settings.currency)?;
        let view = SubscriptionView::evaluate(subscription, today, settings.due_soon_days);

        self.repo
            .create(user_id, &view.subscription, view.status)
            .await?;
        Ok(view)
    }

    #[instrument(skip(self))]
    pub async fn list_views(
        &self,
        user_id: Uuid,
        today: NaiveDate,
    ) -> AppResult<Vec<SubscriptionView>> {
        let settings = effective_settings(self.settings.as_ref(), user_id).await?;
        let board = SubscriptionBoard::new(self.repo.list_by_user(user_id).await?);
        Ok(board.views(today, settings.due_soon_days))
    }

    #[instrument(skip(self))]
    pub async fn get_view(
        &self,
        user_id: Uuid,
        id: Uuid,
        today: NaiveDate,
    ) -> AppResult<SubscriptionView> {
        let subscription = self
            .repo
            .get(user_id, id)
            .await?
            .ok_or(AppError::NotFound)?;
        let settings = effective_settings(self.settings.as_ref(), user_id).await?;
        Ok(SubscriptionView::evaluate(
            subscription,
            today,
            settings.due_soon_days,
        ))
    }

    /// Apply a partial edit. Pending reminders follow a moved billing date.
    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        patch: SubscriptionPatch,
        today: NaiveDate,
    ) -> AppResult<SubscriptionView> {
        let mut subscription = self
            .repo
            .get(user_id, id)
            .await?
            .ok_or(AppError::NotFound)?;
        let billing_moved = patch.apply(&mut subscription)?;

        let settings = effective_settings(self.settings.as_ref(), user_id).await?;
        let view = SubscriptionView::evaluate(subscription, today, settings.due_soon_days);
        self.repo
            .update(user_id, &view.subscription, view.status)
            .await?;

        if billing_moved {
            let moved = reschedule_for_subscription(
                self.reminders.as_ref(),
                id,
                view.subscription.next_billing_date,
            )
            .await?;
            debug!(subscription_id = %id, moved, "Rescheduled reminders");
        }
        Ok(view)
    }

    /// Hard delete; the subscription's reminders go with it.
    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<()> {
        if self.repo.get(user_id, id).await?.is_none() {
            return Err(AppError::NotFound);
        }
        self.reminders.delete_for_subscription(id).await?;
        if !self.repo.delete(user_id, id).await? {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn stats(&self, user_id: Uuid, today: NaiveDate) -> AppResult<SubscriptionStats> {
        let settings = effective_settings(self.settings.as_ref(), user_id).await?;
        let board = SubscriptionBoard::new(self.repo.list_by_user(user_id).await?);
        Ok(board.stats(today, settings.due_soon_days))
    }

    /// Rewrite the cached status column wherever it drifted from the value
    /// derived for `today`. Returns the number of rows rewritten.
    #[instrument(skip(self))]
    pub async fn refresh_status_cache(&self, today: NaiveDate) -> AppResult<usize> {
        let mut windows: HashMap<Uuid, u32> = HashMap::new();
        let mut rewritten = 0;

        for owned in self.repo.list_all().await? {
            let window = match windows.get(&owned.user_id) {
                Some(window) => *window,
                None => {
                    let settings =
                        effective_settings(self.settings.as_ref(), owned.user_id).await?;
                    windows.insert(owned.user_id, settings.due_soon_days);
                    settings.due_soon_days
                }
            };

            let status = owned.subscription.status(today, window);
            if owned.cached_status != Some(status) {
                self.repo.set_status(owned.subscription.id, status).await?;
                rewritten += 1;
            }
        }

        Ok(rewritten)
    }

    /// React to a row change published by the database: re-classify the row
    /// and keep pending reminders aligned with its billing date.
    ///
    /// Writes only happen on drift, so the notification they trigger settles
    /// on the next pass.
    #[instrument(skip(self))]
    pub async fn apply_change(
        &self,
        change: SubscriptionChange,
        today: NaiveDate,
    ) -> AppResult<BoardUpdate> {
        let id = change.subscription_id();
        if let SubscriptionChange::Delete { .. } = change {
            let removed = self.reminders.delete_for_subscription(id).await?;
            debug!(subscription_id = %id, removed, "Dropped reminders of deleted subscription");
            return Ok(BoardUpdate::Removed(id));
        }

        // The stored row is authoritative; the payload may already be stale.
        let Some(owned) = self.repo.get_owned(id).await? else {
            return Ok(BoardUpdate::Ignored);
        };
        let settings = effective_settings(self.settings.as_ref(), owned.user_id).await?;

        let mut board = SubscriptionBoard::default();
        let update = board.apply(
            SubscriptionChange::Update {
                record: owned.subscription,
            },
            today,
            settings.due_soon_days,
        );

        if let BoardUpdate::Upserted(view) = &update {
            if owned.cached_status != Some(view.status) {
                self.repo.set_status(id, view.status).await?;
            }
            let moved = reschedule_for_subscription(
                self.reminders.as_ref(),
                id,
                view.subscription.next_billing_date,
            )
            .await?;
            debug!(subscription_id = %id, status = %view.status, moved, "Applied subscription change");
        }
        Ok(update)
    }
}
