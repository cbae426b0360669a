use async_trait::async_trait;
use uuid::Uuid;

use crate::{app_error::AppResult, entities::user::UserProfile};

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Resolve the auth platform's subject id to our user row, creating it on
    /// first sight. A present `email` overwrites the stored one.
    async fn upsert_by_auth_id(&self, auth_id: &str, email: Option<&str>)
    -> AppResult<UserProfile>;
    async fn get_profile_by_id(&self, user_id: Uuid) -> AppResult<Option<UserProfile>>;
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()>;
}

#[async_trait]
pub trait PushSender: Send + Sync {
    async fn push(&self, user_id: Uuid, title: &str, body: &str) -> AppResult<()>;
}
