use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::{app_error::AppResult, use_cases::user::PushSender};

/// No push provider is wired up; notifications are logged.
#[derive(Clone, Default)]
pub struct LogPushSender;

#[async_trait]
impl PushSender for LogPushSender {
    async fn push(&self, user_id: Uuid, title: &str, body: &str) -> AppResult<()> {
        info!(user_id = %user_id, title = %title, body = %body, "Push notification");
        Ok(())
    }
}
