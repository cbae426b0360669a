use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use subsentry_engine::{BillingFrequency, Currency, Subscription, SubscriptionStatus, resolve_icon};
use uuid::Uuid;

use crate::{
    adapters::persistence::{PostgresPersistence, parse_text_with_fallback},
    app_error::{AppError, AppResult},
    use_cases::subscription::{OwnedSubscription, SubscriptionRepo},
};

const SUBSCRIPTION_COLUMNS: &str =
    "id, user_id, name, icon, amount, currency, frequency, next_billing_date, status";

/// Row shape; also the `record` of a change notification, which carries the
/// row as JSON.
#[derive(sqlx::FromRow, serde::Deserialize, Debug)]
pub struct SubscriptionDb {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub icon: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub frequency: String,
    pub next_billing_date: NaiveDate,
    pub status: Option<String>,
}

impl From<SubscriptionDb> for OwnedSubscription {
    fn from(row: SubscriptionDb) -> Self {
        let id = row.id.to_string();
        OwnedSubscription {
            user_id: row.user_id,
            cached_status: row
                .status
                .as_deref()
                .and_then(|s| SubscriptionStatus::from_str(s.trim()).ok()),
            subscription: Subscription {
                id: row.id,
                name: row.name,
                icon: resolve_icon(row.icon.as_deref()),
                amount: row.amount,
                currency: parse_text_with_fallback::<Currency>(
                    &row.currency,
                    "currency",
                    "subscription",
                    &id,
                ),
                frequency: parse_text_with_fallback::<BillingFrequency>(
                    &row.frequency,
                    "frequency",
                    "subscription",
                    &id,
                ),
                next_billing_date: row.next_billing_date,
            },
        }
    }
}

impl From<SubscriptionDb> for Subscription {
    fn from(row: SubscriptionDb) -> Self {
        OwnedSubscription::from(row).subscription
    }
}

#[async_trait]
impl SubscriptionRepo for PostgresPersistence {
    async fn create(
        &self,
        user_id: Uuid,
        subscription: &Subscription,
        status: SubscriptionStatus,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
                INSERT INTO subscriptions
                    (id, user_id, name, icon, amount, currency, frequency, next_billing_date, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(subscription.id)
        .bind(user_id)
        .bind(&subscription.name)
        .bind(&subscription.icon)
        .bind(subscription.amount)
        .bind(subscription.currency.as_ref())
        .bind(subscription.frequency.as_ref())
        .bind(subscription.next_billing_date)
        .bind(status.as_ref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Subscription>> {
        let rows = sqlx::query_as::<_, SubscriptionDb>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions \
             WHERE user_id = $1 ORDER BY next_billing_date ASC, name ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Subscription>> {
        let row = sqlx::query_as::<_, SubscriptionDb>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn get_owned(&self, id: Uuid) -> AppResult<Option<OwnedSubscription>> {
        let row = sqlx::query_as::<_, SubscriptionDb>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn list_all(&self) -> AppResult<Vec<OwnedSubscription>> {
        let rows = sqlx::query_as::<_, SubscriptionDb>(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions ORDER BY user_id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(
        &self,
        user_id: Uuid,
        subscription: &Subscription,
        status: SubscriptionStatus,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
                UPDATE subscriptions
                SET name = $3, icon = $4, amount = $5, currency = $6, frequency = $7,
                    next_billing_date = $8, status = $9, updated_at = NOW()
                WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(subscription.id)
        .bind(user_id)
        .bind(&subscription.name)
        .bind(&subscription.icon)
        .bind(subscription.amount)
        .bind(subscription.currency.as_ref())
        .bind(subscription.frequency.as_ref())
        .bind(subscription.next_billing_date)
        .bind(status.as_ref())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn set_status(&self, id: Uuid, status: SubscriptionStatus) -> AppResult<()> {
        sqlx::query("UPDATE subscriptions SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status.as_ref())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
