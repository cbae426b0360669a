//! In-memory mock implementations for users and outbound notification ports.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::user::UserProfile,
    use_cases::user::{EmailSender, PushSender, UserRepo},
};

// ============================================================================
// InMemoryUserRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryUserRepo {
    pub users: Mutex<HashMap<Uuid, UserProfile>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<UserProfile>) -> Self {
        Self {
            users: Mutex::new(users.into_iter().map(|u| (u.id, u)).collect()),
        }
    }

    pub fn insert(&self, user: UserProfile) {
        self.users.lock().unwrap().insert(user.id, user);
    }
}

#[async_trait]
impl UserRepo for InMemoryUserRepo {
    async fn upsert_by_auth_id(
        &self,
        auth_id: &str,
        email: Option<&str>,
    ) -> AppResult<UserProfile> {
        let mut users = self.users.lock().unwrap();

        if let Some(user) = users.values_mut().find(|u| u.auth_id == auth_id) {
            if let Some(email) = email {
                user.email = Some(email.to_string());
            }
            return Ok(user.clone());
        }

        let user = UserProfile {
            id: Uuid::new_v4(),
            auth_id: auth_id.to_string(),
            email: email.map(str::to_string),
            name: None,
            created_at: Some(chrono::Utc::now().naive_utc()),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_profile_by_id(&self, user_id: Uuid) -> AppResult<Option<UserProfile>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }
}

// ============================================================================
// InMemoryEmailSender
// ============================================================================

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Records every message. `failing()` rejects every send instead, and
/// `failing_for()` rejects only one recipient.
#[derive(Default)]
pub struct InMemoryEmailSender {
    sent: Mutex<Vec<SentEmail>>,
    fail: bool,
    bounce: Option<String>,
}

impl InMemoryEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn failing_for(recipient: &str) -> Self {
        Self {
            bounce: Some(recipient.to_string()),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for InMemoryEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        if self.fail || self.bounce.as_deref() == Some(to) {
            return Err(AppError::Delivery("provider rejected the message".into()));
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
        });
        Ok(())
    }
}

// ============================================================================
// InMemoryPushSender
// ============================================================================

#[derive(Debug, Clone)]
pub struct SentPush {
    pub user_id: Uuid,
    pub title: String,
    pub body: String,
}

#[derive(Default)]
pub struct InMemoryPushSender {
    sent: Mutex<Vec<SentPush>>,
}

impl InMemoryPushSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentPush> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushSender for InMemoryPushSender {
    async fn push(&self, user_id: Uuid, title: &str, body: &str) -> AppResult<()> {
        self.sent.lock().unwrap().push(SentPush {
            user_id,
            title: title.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
