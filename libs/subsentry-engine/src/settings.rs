use serde::{Deserialize, Serialize};

use crate::{
    errors::{EngineError, EngineResult},
    money::Currency,
    reminder::DEFAULT_REMINDER_LEAD_DAYS,
    status::DUE_SOON_WINDOW_DAYS,
};

/// Upper bound for both day-count knobs.
pub const MAX_SETTING_DAYS: u32 = 60;

/// Per-user notification and display preferences.
///
/// `reminder_days` (default reminder lead) and `due_soon_days` (status
/// window) are separate knobs that happen to share a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub reminder_days: u32,
    pub due_soon_days: u32,
    pub currency: Currency,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            push_notifications: true,
            reminder_days: DEFAULT_REMINDER_LEAD_DAYS,
            due_soon_days: DUE_SOON_WINDOW_DAYS,
            currency: Currency::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> EngineResult<()> {
        check_days("reminderDays", self.reminder_days)?;
        check_days("dueSoonDays", self.due_soon_days)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub email_notifications: Option<bool>,
    pub push_notifications: Option<bool>,
    pub reminder_days: Option<u32>,
    pub due_soon_days: Option<u32>,
    pub currency: Option<Currency>,
}

impl SettingsPatch {
    /// Produce the updated settings; the input is left untouched on error.
    pub fn apply(self, current: Settings) -> EngineResult<Settings> {
        let updated = Settings {
            email_notifications: self.email_notifications.unwrap_or(current.email_notifications),
            push_notifications: self.push_notifications.unwrap_or(current.push_notifications),
            reminder_days: self.reminder_days.unwrap_or(current.reminder_days),
            due_soon_days: self.due_soon_days.unwrap_or(current.due_soon_days),
            currency: self.currency.unwrap_or(current.currency),
        };
        updated.validate()?;
        Ok(updated)
    }
}

fn check_days(field: &'static str, value: u32) -> EngineResult<()> {
    if value > MAX_SETTING_DAYS {
        return Err(EngineError::InvalidSetting {
            field,
            reason: format!("must be between 0 and {MAX_SETTING_DAYS}"),
        });
    }
    Ok(())
}
