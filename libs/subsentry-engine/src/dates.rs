use chrono::{Days, NaiveDate};

use crate::errors::{EngineError, EngineResult};

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an ISO-8601 calendar date (`YYYY-MM-DD`), as entered through a
/// date-only form field. No timezone is involved.
pub fn parse_calendar_date(raw: &str) -> EngineResult<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT)
        .map_err(|_| EngineError::InvalidDate(trimmed.to_string()))
}

/// Format a date the way it is stored and exchanged.
pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

pub(crate) fn add_days(date: NaiveDate, days: u32) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(u64::from(days)))
}

pub(crate) fn sub_days(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(days))
}

/// Signed number of calendar days from `today` until `date`.
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}
