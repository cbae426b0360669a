use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::dates::add_days;

/// Days ahead of the evaluation date that still count as "due soon".
pub const DUE_SOON_WINDOW_DAYS: u32 = 3;

/// Lifecycle status of a subscription relative to an evaluation date.
///
/// This is a classification of the date axis, not a state machine: it is
/// recomputed from the next billing date every time it is read.
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
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SubscriptionStatus {
    #[default]
    Active,
    DueSoon,
    Overdue,
}

/// Classify with the default due-soon window.
pub fn classify(next_billing: NaiveDate, today: NaiveDate) -> SubscriptionStatus {
    classify_within(next_billing, today, DUE_SOON_WINDOW_DAYS)
}

/// Overdue strictly before `today`; due soon from `today` through
/// `today + window_days` inclusive; active afterwards.
pub fn classify_within(
    next_billing: NaiveDate,
    today: NaiveDate,
    window_days: u32,
) -> SubscriptionStatus {
    if next_billing < today {
        return SubscriptionStatus::Overdue;
    }
    match add_days(today, window_days) {
        Some(window_end) if next_billing > window_end => SubscriptionStatus::Active,
        _ => SubscriptionStatus::DueSoon,
    }
}
