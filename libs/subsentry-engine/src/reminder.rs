use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{
    dates::{parse_calendar_date, sub_days},
    errors::{EngineError, EngineResult},
};

/// Default number of days before billing that a reminder fires.
///
/// Kept apart from [`crate::DUE_SOON_WINDOW_DAYS`] even though the values
/// currently match: users tune them independently.
pub const DEFAULT_REMINDER_LEAD_DAYS: u32 = 3;

/// Longest custom note accepted on a reminder.
pub const MAX_CUSTOM_MESSAGE_LEN: usize = 500;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReminderMethod {
    #[default]
    Email,
    Push,
    Both,
}

impl ReminderMethod {
    pub fn wants_email(&self) -> bool {
        matches!(self, ReminderMethod::Email | ReminderMethod::Both)
    }

    pub fn wants_push(&self) -> bool {
        matches!(self, ReminderMethod::Push | ReminderMethod::Both)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReminderStatus {
    #[default]
    Pending,
    Sent,
}

/// The day a reminder fires: `next_billing - lead_days` in plain calendar
/// days (weekends and holidays are not skipped).
pub fn reminder_date(next_billing: NaiveDate, lead_days: i64) -> EngineResult<NaiveDate> {
    if lead_days < 0 {
        return Err(EngineError::NegativeLeadDays(lead_days));
    }
    sub_days(next_billing, lead_days.unsigned_abs()).ok_or(EngineError::DateOutOfRange)
}

/// Same as [`reminder_date`] for a billing date still in its ISO string form.
pub fn reminder_date_from_iso(next_billing: &str, lead_days: i64) -> EngineResult<NaiveDate> {
    reminder_date(parse_calendar_date(next_billing)?, lead_days)
}

/// A scheduled renewal reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub lead_days: u32,
    pub method: ReminderMethod,
    pub custom_message: Option<String>,
    pub scheduled_date: NaiveDate,
    pub status: ReminderStatus,
    pub sent_at: Option<NaiveDateTime>,
}

impl Reminder {
    /// Build a pending reminder for a subscription billed on `next_billing`.
    pub fn schedule(
        id: Uuid,
        subscription_id: Uuid,
        next_billing: NaiveDate,
        lead_days: i64,
        method: ReminderMethod,
        custom_message: Option<String>,
    ) -> EngineResult<Self> {
        let scheduled_date = reminder_date(next_billing, lead_days)?;
        let custom_message = normalize_custom_message(custom_message)?;
        Ok(Self {
            id,
            subscription_id,
            lead_days: u32::try_from(lead_days).map_err(|_| EngineError::DateOutOfRange)?,
            method,
            custom_message,
            scheduled_date,
            status: ReminderStatus::Pending,
            sent_at: None,
        })
    }

    /// Recompute the scheduled date after the billing date moved. Returns
    /// whether the reminder changed.
    ///
    /// A sent reminder whose new date falls after the day it was sent is
    /// re-armed for the next cycle.
    pub fn reschedule(&mut self, next_billing: NaiveDate) -> EngineResult<bool> {
        let scheduled = reminder_date(next_billing, i64::from(self.lead_days))?;
        if scheduled == self.scheduled_date {
            return Ok(false);
        }
        self.scheduled_date = scheduled;
        let sent_before = self.sent_at.is_some_and(|at| at.date() < scheduled);
        if self.status == ReminderStatus::Sent && sent_before {
            self.status = ReminderStatus::Pending;
            self.sent_at = None;
        }
        Ok(true)
    }

    /// Pending and scheduled on or before `today`.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.status == ReminderStatus::Pending && self.scheduled_date <= today
    }

    pub fn mark_sent(&mut self, at: NaiveDateTime) {
        self.status = ReminderStatus::Sent;
        self.sent_at = Some(at);
    }
}

/// Trim the custom note; blank notes become `None`.
pub fn normalize_custom_message(message: Option<String>) -> EngineResult<Option<String>> {
    let Some(message) = message else {
        return Ok(None);
    };
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_CUSTOM_MESSAGE_LEN {
        return Err(EngineError::InvalidSetting {
            field: "customMessage",
            reason: format!("must be at most {MAX_CUSTOM_MESSAGE_LEN} characters"),
        });
    }
    Ok(Some(trimmed.to_string()))
}
