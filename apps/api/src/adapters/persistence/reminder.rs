use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use subsentry_engine::{Reminder, ReminderMethod, ReminderStatus};
use uuid::Uuid;

use crate::{
    adapters::persistence::{PostgresPersistence, parse_text_or, parse_text_with_fallback},
    app_error::{AppError, AppResult},
    use_cases::reminder::ReminderRepo,
};

const REMINDER_COLUMNS: &str =
    "id, subscription_id, lead_days, method, custom_message, scheduled_date, status, sent_at";

#[derive(sqlx::FromRow, Debug)]
pub struct ReminderDb {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub lead_days: i32,
    pub method: String,
    pub custom_message: Option<String>,
    pub scheduled_date: NaiveDate,
    pub status: String,
    pub sent_at: Option<NaiveDateTime>,
}

impl From<ReminderDb> for Reminder {
    fn from(row: ReminderDb) -> Self {
        let id = row.id.to_string();
        Reminder {
            id: row.id,
            subscription_id: row.subscription_id,
            lead_days: u32::try_from(row.lead_days).unwrap_or_default(),
            method: parse_text_with_fallback::<ReminderMethod>(&row.method, "method", "reminder", &id),
            custom_message: row.custom_message,
            scheduled_date: row.scheduled_date,
            // An unreadable status must never make a reminder deliverable again.
            status: parse_text_or(&row.status, ReminderStatus::Sent, "status", "reminder", &id),
            sent_at: row.sent_at,
        }
    }
}

#[async_trait]
impl ReminderRepo for PostgresPersistence {
    async fn create(&self, user_id: Uuid, reminder: &Reminder) -> AppResult<()> {
        let lead_days = i32::try_from(reminder.lead_days)
            .map_err(|_| AppError::InvalidInput("leadDays is out of range".into()))?;
        sqlx::query(
            r#"
                INSERT INTO reminders
                    (id, user_id, subscription_id, lead_days, method, custom_message,
                     scheduled_date, status, sent_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(reminder.id)
        .bind(user_id)
        .bind(reminder.subscription_id)
        .bind(lead_days)
        .bind(reminder.method.as_ref())
        .bind(reminder.custom_message.as_deref())
        .bind(reminder.scheduled_date)
        .bind(reminder.status.as_ref())
        .bind(reminder.sent_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Reminder>> {
        let rows = sqlx::query_as::<_, ReminderDb>(&format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders WHERE user_id = $1 ORDER BY scheduled_date ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Reminder>> {
        let row = sqlx::query_as::<_, ReminderDb>(&format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn list_for_subscription(&self, subscription_id: Uuid) -> AppResult<Vec<Reminder>> {
        let rows = sqlx::query_as::<_, ReminderDb>(&format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders WHERE subscription_id = $1"
        ))
        .bind(subscription_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_due(
        &self,
        today: NaiveDate,
        max_attempts: u32,
        limit: i64,
    ) -> AppResult<Vec<Reminder>> {
        let rows = sqlx::query_as::<_, ReminderDb>(&format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders \
             WHERE status = 'pending' AND scheduled_date <= $1 AND delivery_attempts < $2 \
             ORDER BY last_attempt_at ASC NULLS FIRST, scheduled_date ASC LIMIT $3"
        ))
        .bind(today)
        .bind(i32::try_from(max_attempts).unwrap_or(i32::MAX))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_schedule(&self, reminder: &Reminder) -> AppResult<()> {
        sqlx::query(
            r#"
                UPDATE reminders
                SET scheduled_date = $2, status = $3, sent_at = $4,
                    delivery_attempts = 0, last_attempt_at = NULL
                WHERE id = $1
            "#,
        )
        .bind(reminder.id)
        .bind(reminder.scheduled_date)
        .bind(reminder.status.as_ref())
        .bind(reminder.sent_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_sent(&self, id: Uuid, sent_at: NaiveDateTime) -> AppResult<()> {
        sqlx::query("UPDATE reminders SET status = 'sent', sent_at = $2 WHERE id = $1")
            .bind(id)
            .bind(sent_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn record_failed_attempt(&self, id: Uuid, at: NaiveDateTime) -> AppResult<u32> {
        let attempts: i32 = sqlx::query_scalar(
            r#"
                UPDATE reminders
                SET delivery_attempts = delivery_attempts + 1, last_attempt_at = $2
                WHERE id = $1
                RETURNING delivery_attempts
            "#,
        )
        .bind(id)
        .bind(at)
        .fetch_one(&self.pool)
        .await?;
        Ok(u32::try_from(attempts).unwrap_or_default())
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM reminders WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_subscription(&self, subscription_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM reminders WHERE subscription_id = $1")
            .bind(subscription_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
