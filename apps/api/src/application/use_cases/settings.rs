use std::sync::Arc;

use async_trait::async_trait;
use subsentry_engine::{Settings, SettingsPatch};
use tracing::instrument;
use uuid::Uuid;

use crate::app_error::AppResult;

#[async_trait]
pub trait SettingsRepo: Send + Sync {
    async fn get(&self, user_id: Uuid) -> AppResult<Option<Settings>>;
    async fn upsert(&self, user_id: Uuid, settings: &Settings) -> AppResult<()>;
}

/// Stored settings, or the defaults for users who never saved any.
pub(crate) async fn effective_settings(
    repo: &dyn SettingsRepo,
    user_id: Uuid,
) -> AppResult<Settings> {
    Ok(repo.get(user_id).await?.unwrap_or_default())
}

#[derive(Clone)]
pub struct SettingsUseCases {
    repo: Arc<dyn SettingsRepo>,
}

impl SettingsUseCases {
    pub fn new(repo: Arc<dyn SettingsRepo>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, user_id: Uuid) -> AppResult<Settings> {
        effective_settings(self.repo.as_ref(), user_id).await
    }

    #[instrument(skip(self))]
    pub async fn update(&self, user_id: Uuid, patch: SettingsPatch) -> AppResult<Settings> {
        let current = effective_settings(self.repo.as_ref(), user_id).await?;
        let updated = patch.apply(current)?;
        self.repo.upsert(user_id, &updated).await?;
        Ok(updated)
    }
}
