use async_trait::async_trait;
use subsentry_engine::{Currency, Settings};
use uuid::Uuid;

use crate::{
    adapters::persistence::{PostgresPersistence, parse_text_with_fallback},
    app_error::{AppError, AppResult},
    use_cases::settings::SettingsRepo,
};

#[derive(sqlx::FromRow, Debug)]
pub struct SettingsDb {
    pub user_id: Uuid,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub reminder_days: i32,
    pub due_soon_days: i32,
    pub currency: String,
}

impl From<SettingsDb> for Settings {
    fn from(row: SettingsDb) -> Self {
        let defaults = Settings::default();
        let id = row.user_id.to_string();
        Settings {
            email_notifications: row.email_notifications,
            push_notifications: row.push_notifications,
            reminder_days: u32::try_from(row.reminder_days).unwrap_or(defaults.reminder_days),
            due_soon_days: u32::try_from(row.due_soon_days).unwrap_or(defaults.due_soon_days),
            currency: parse_text_with_fallback::<Currency>(&row.currency, "currency", "settings", &id),
        }
    }
}

fn days_param(field: &str, days: u32) -> AppResult<i32> {
    i32::try_from(days).map_err(|_| AppError::InvalidInput(format!("{field} is out of range")))
}

#[async_trait]
impl SettingsRepo for PostgresPersistence {
    async fn get(&self, user_id: Uuid) -> AppResult<Option<Settings>> {
        let rec = sqlx::query_as::<_, SettingsDb>(
            r#"
                SELECT user_id, email_notifications, push_notifications,
                       reminder_days, due_soon_days, currency
                FROM settings
                WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec.map(Into::into))
    }

    async fn upsert(&self, user_id: Uuid, settings: &Settings) -> AppResult<()> {
        sqlx::query(
            r#"
                INSERT INTO settings
                    (user_id, email_notifications, push_notifications, reminder_days, due_soon_days, currency)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (user_id) DO UPDATE
                SET email_notifications = EXCLUDED.email_notifications,
                    push_notifications = EXCLUDED.push_notifications,
                    reminder_days = EXCLUDED.reminder_days,
                    due_soon_days = EXCLUDED.due_soon_days,
                    currency = EXCLUDED.currency
            "#,
        )
        .bind(user_id)
        .bind(settings.email_notifications)
        .bind(settings.push_notifications)
        .bind(days_param("reminderDays", settings.reminder_days)?)
        .bind(days_param("dueSoonDays", settings.due_soon_days)?)
        .bind(settings.currency.as_ref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
