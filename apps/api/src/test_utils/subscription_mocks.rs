//! In-memory mock implementations for subscription and settings repositories.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use subsentry_engine::{Settings, Subscription, SubscriptionStatus};
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    use_cases::{
        settings::SettingsRepo,
        subscription::{OwnedSubscription, SubscriptionRepo},
    },
};

// ============================================================================
// InMemorySubscriptionRepo
// ============================================================================

#[derive(Default)]
pub struct InMemorySubscriptionRepo {
    pub rows: Mutex<HashMap<Uuid, OwnedSubscription>>,
}

impl InMemorySubscriptionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed (or overwrite) a row, as another client writing to the table
    /// would. The cached status starts out empty.
    pub fn insert(&self, user_id: Uuid, subscription: Subscription) {
        self.rows.lock().unwrap().insert(
            subscription.id,
            OwnedSubscription {
                user_id,
                subscription,
                cached_status: None,
            },
        );
    }
}

#[async_trait]
impl SubscriptionRepo for InMemorySubscriptionRepo {
    async fn create(
        &self,
        user_id: Uuid,
        subscription: &Subscription,
        status: SubscriptionStatus,
    ) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&subscription.id) {
            return Err(AppError::InvalidInput("Subscription already exists".into()));
        }
        rows.insert(
            subscription.id,
            OwnedSubscription {
                user_id,
                subscription: subscription.clone(),
                cached_status: Some(status),
            },
        );
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Subscription>> {
        let mut items: Vec<Subscription> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|row| row.user_id == user_id)
            .map(|row| row.subscription.clone())
            .collect();
        items.sort_by(|a, b| {
            a.next_billing_date
                .cmp(&b.next_billing_date)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(items)
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Subscription>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&id)
            .filter(|row| row.user_id == user_id)
            .map(|row| row.subscription.clone()))
    }

    async fn get_owned(&self, id: Uuid) -> AppResult<Option<OwnedSubscription>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<OwnedSubscription>> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn update(
        &self,
        user_id: Uuid,
        subscription: &Subscription,
        status: SubscriptionStatus,
    ) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .get_mut(&subscription.id)
            .filter(|row| row.user_id == user_id)
            .ok_or(AppError::NotFound)?;
        row.subscription = subscription.clone();
        row.cached_status = Some(status);
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: SubscriptionStatus) -> AppResult<()> {
        if let Some(row) = self.rows.lock().unwrap().get_mut(&id) {
            row.cached_status = Some(status);
        }
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get(&id) {
            Some(row) if row.user_id == user_id => {
                rows.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

// ============================================================================
// InMemorySettingsRepo
// ============================================================================

#[derive(Default)]
pub struct InMemorySettingsRepo {
    pub settings: Mutex<HashMap<Uuid, Settings>>,
}

impl InMemorySettingsRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user_id: Uuid, settings: Settings) {
        self.settings.lock().unwrap().insert(user_id, settings);
    }
}

#[async_trait]
impl SettingsRepo for InMemorySettingsRepo {
    async fn get(&self, user_id: Uuid) -> AppResult<Option<Settings>> {
        Ok(self.settings.lock().unwrap().get(&user_id).copied())
    }

    async fn upsert(&self, user_id: Uuid, settings: &Settings) -> AppResult<()> {
        self.settings.lock().unwrap().insert(user_id, *settings);
        Ok(())
    }
}
