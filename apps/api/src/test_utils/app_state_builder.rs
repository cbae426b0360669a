//! Test app state builder for HTTP-level integration testing.
//!
//! This module provides `TestAppStateBuilder` which creates a minimal `AppState`
//! with in-memory mocks for testing HTTP endpoints.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::http::HeaderValue;
use secrecy::SecretString;
use subsentry_engine::{Reminder, Settings, Subscription};
use url::Url;
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState,
    domain::entities::user::UserProfile,
    infra::config::{AppConfig, DEFAULT_CHANGE_CHANNEL, DEFAULT_EMAIL_FROM},
    test_utils::{
        InMemoryEmailSender, InMemoryPushSender, InMemoryReminderRepo, InMemorySettingsRepo,
        InMemorySubscriptionRepo, InMemoryUserRepo, TEST_JWT_SECRET,
    },
    use_cases::{
        reminder::ReminderUseCases, settings::SettingsUseCases,
        subscription::SubscriptionUseCases,
    },
};

/// Handles to the in-memory dependencies behind a built `AppState`.
pub struct TestMocks {
    pub users: Arc<InMemoryUserRepo>,
    pub subscriptions: Arc<InMemorySubscriptionRepo>,
    pub reminders: Arc<InMemoryReminderRepo>,
    pub settings: Arc<InMemorySettingsRepo>,
    pub email: Arc<InMemoryEmailSender>,
    pub push: Arc<InMemoryPushSender>,
}

impl TestMocks {
    pub fn reminder(&self, id: Uuid) -> Option<Reminder> {
        self.reminders.find(id)
    }
}

/// Builder for creating `AppState` with in-memory mocks for testing.
///
/// # Example
///
/// ```ignore
/// let user = create_test_user(|_| {});
/// let sub = create_test_subscription(|s| s.name = "Spotify".to_string());
///
/// let app_state = TestAppStateBuilder::new()
///     .with_user(user.clone())
///     .with_subscription(user.id, sub)
///     .build();
/// ```
pub struct TestAppStateBuilder {
    users: Vec<UserProfile>,
    subscriptions: Vec<(Uuid, Subscription)>,
    reminders: Vec<(Uuid, Reminder)>,
    settings: Vec<(Uuid, Settings)>,
    email_sender: Option<Arc<InMemoryEmailSender>>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            users: vec![],
            subscriptions: vec![],
            reminders: vec![],
            settings: vec![],
            email_sender: None,
        }
    }

    pub fn with_user(mut self, user: UserProfile) -> Self {
        self.users.push(user);
        self
    }

    pub fn with_subscription(mut self, user_id: Uuid, subscription: Subscription) -> Self {
        self.subscriptions.push((user_id, subscription));
        self
    }

    pub fn with_reminder(mut self, user_id: Uuid, reminder: Reminder) -> Self {
        self.reminders.push((user_id, reminder));
        self
    }

    pub fn with_settings(mut self, user_id: Uuid, settings: Settings) -> Self {
        self.settings.push((user_id, settings));
        self
    }

    /// Set a custom email sender (e.g. `InMemoryEmailSender::failing()`).
    pub fn with_email_sender(mut self, sender: Arc<InMemoryEmailSender>) -> Self {
        self.email_sender = Some(sender);
        self
    }

    /// Build the AppState with all configured mocks.
    pub fn build(self) -> AppState {
        self.build_with_mocks().0
    }

    /// Build the AppState and return the mocks behind it for assertions.
    pub fn build_with_mocks(self) -> (AppState, TestMocks) {
        let users = Arc::new(InMemoryUserRepo::with_users(self.users));

        let subscriptions = Arc::new(InMemorySubscriptionRepo::new());
        for (user_id, subscription) in self.subscriptions {
            subscriptions.insert(user_id, subscription);
        }

        let reminders = Arc::new(InMemoryReminderRepo::new());
        for (user_id, reminder) in self.reminders {
            reminders.insert(user_id, reminder);
        }

        let settings = Arc::new(InMemorySettingsRepo::new());
        for (user_id, value) in self.settings {
            settings.insert(user_id, value);
        }

        let email = self
            .email_sender
            .unwrap_or_else(|| Arc::new(InMemoryEmailSender::new()));
        let push = Arc::new(InMemoryPushSender::new());

        // Create minimal config for testing
        let config = Arc::new(AppConfig {
            database_url: String::new(),
            db_max_connections: 1,
            jwt_secret: SecretString::new(TEST_JWT_SECRET.into()),
            jwt_audience: None,
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 3001)),
            cors_origin: HeaderValue::from_static("http://localhost:3000"),
            app_origin: Url::parse("http://localhost:3000").unwrap(),
            resend_api_key: None,
            email_from: DEFAULT_EMAIL_FROM.to_string(),
            reminder_poll_secs: 300,
            status_refresh_secs: 3600,
            change_channel: DEFAULT_CHANGE_CHANNEL.to_string(),
        });

        let subscription_use_cases = Arc::new(SubscriptionUseCases::new(
            subscriptions.clone(),
            reminders.clone(),
            settings.clone(),
        ));
        let reminder_use_cases = Arc::new(ReminderUseCases::new(
            reminders.clone(),
            subscriptions.clone(),
            settings.clone(),
            users.clone(),
            email.clone(),
            push.clone(),
            config.app_origin.to_string(),
        ));
        let settings_use_cases = Arc::new(SettingsUseCases::new(settings.clone()));

        let app_state = AppState {
            config,
            user_repo: users.clone(),
            subscription_use_cases,
            reminder_use_cases,
            settings_use_cases,
        };

        let mocks = TestMocks {
            users,
            subscriptions,
            reminders,
            settings,
            email,
            push,
        };

        (app_state, mocks)
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
