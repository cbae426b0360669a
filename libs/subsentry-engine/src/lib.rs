//! Subscription state rules for SubSentry.
//!
//! This crate provides:
//! - Status classification (`active` / `due-soon` / `overdue`) against an explicit evaluation date
//! - Annualized and monthly-equivalent cost calculation
//! - Reminder scheduling (`next billing - lead days`)
//! - Aggregate dashboard statistics
//! - A caller-owned `SubscriptionBoard` that applies real-time change events
//!
//! Nothing here performs I/O or reads the clock; every rule takes `today` as
//! an argument.

mod changes;
mod dates;
mod errors;
mod frequency;
mod money;
mod reminder;
mod settings;
mod stats;
mod status;
mod subscription;

pub use changes::{BoardUpdate, SubscriptionBoard, SubscriptionChange};
pub use dates::{days_until, format_calendar_date, parse_calendar_date};
pub use errors::{EngineError, EngineResult};
pub use frequency::{BillingFrequency, annual_cost, monthly_equivalent};
pub use money::{Currency, format_amount, round_currency};
pub use reminder::{
    DEFAULT_REMINDER_LEAD_DAYS, MAX_CUSTOM_MESSAGE_LEN, Reminder, ReminderMethod, ReminderStatus,
    normalize_custom_message, reminder_date, reminder_date_from_iso,
};
pub use settings::{MAX_SETTING_DAYS, Settings, SettingsPatch};
pub use stats::SubscriptionStats;
pub use status::{DUE_SOON_WINDOW_DAYS, SubscriptionStatus, classify, classify_within};
pub use subscription::{
    DEFAULT_ICON, MAX_AMOUNT, MAX_NAME_LEN, Subscription, SubscriptionDraft, SubscriptionPatch,
    SubscriptionView, resolve_icon, validate_amount, validate_name,
};
