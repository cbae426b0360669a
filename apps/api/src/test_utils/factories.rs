//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use secrecy::SecretString;
use subsentry_engine::{BillingFrequency, Currency, Reminder, ReminderMethod, Subscription};
use uuid::Uuid;

use crate::{application::jwt, domain::entities::user::UserProfile};

/// Secret the test `AppConfig` verifies tokens with.
pub const TEST_JWT_SECRET: &str = "test_jwt_secret";

/// Create a test user with sensible defaults.
pub fn create_test_user(overrides: impl FnOnce(&mut UserProfile)) -> UserProfile {
    let id = Uuid::new_v4();
    let mut user = UserProfile {
        id,
        auth_id: format!("auth|{id}"),
        email: Some(format!("user-{}@example.com", id.simple())),
        name: None,
        created_at: Some(test_datetime()),
    };
    overrides(&mut user);
    user
}

/// Create a test subscription: Netflix, $15.99 monthly, billed 2025-11-25.
pub fn create_test_subscription(overrides: impl FnOnce(&mut Subscription)) -> Subscription {
    let mut subscription = Subscription {
        id: Uuid::new_v4(),
        name: "Netflix".to_string(),
        icon: "🎬".to_string(),
        amount: Decimal::new(1599, 2),
        currency: Currency::Usd,
        frequency: BillingFrequency::Monthly,
        next_billing_date: test_date(),
    };
    overrides(&mut subscription);
    subscription
}

/// Create a pending email reminder three days ahead of `subscription`'s
/// billing date.
pub fn create_test_reminder(
    subscription: &Subscription,
    overrides: impl FnOnce(&mut Reminder),
) -> Reminder {
    let mut reminder = Reminder::schedule(
        Uuid::new_v4(),
        subscription.id,
        subscription.next_billing_date,
        3,
        ReminderMethod::Email,
        None,
    )
    .expect("test reminder should schedule");
    overrides(&mut reminder);
    reminder
}

/// A valid access token for `auth_id`, signed with [`TEST_JWT_SECRET`].
/// The email claim is `{auth_id}@example.com`.
pub fn test_access_token(auth_id: &str) -> String {
    jwt::issue(
        auth_id,
        Some(&format!("{auth_id}@example.com")),
        &SecretString::new(TEST_JWT_SECRET.into()),
        time::Duration::hours(1),
    )
    .expect("test token should sign")
}

/// Fixed billing date used by the factories.
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 25).unwrap()
}

/// Fixed timestamp for reproducible tests.
pub fn test_datetime() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use subsentry_engine::ReminderStatus;

    #[test]
    fn test_create_subscription_with_defaults() {
        let sub = create_test_subscription(|_| {});
        assert_eq!(sub.name, "Netflix");
        assert_eq!(sub.amount, Decimal::new(1599, 2));
        assert_eq!(sub.next_billing_date, test_date());
    }

    #[test]
    fn test_create_reminder_follows_subscription() {
        let sub = create_test_subscription(|s| {
            s.next_billing_date = NaiveDate::from_ymd_opt(2025, 12, 10).unwrap();
        });
        let reminder = create_test_reminder(&sub, |_| {});
        assert_eq!(reminder.subscription_id, sub.id);
        assert_eq!(
            reminder.scheduled_date,
            NaiveDate::from_ymd_opt(2025, 12, 7).unwrap()
        );
        assert_eq!(reminder.status, ReminderStatus::Pending);
    }

    #[test]
    fn test_create_user_with_overrides() {
        let user = create_test_user(|u| u.email = None);
        assert_eq!(user.email, None);
        assert!(user.auth_id.starts_with("auth|"));
    }
}
