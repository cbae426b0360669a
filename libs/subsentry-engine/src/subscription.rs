use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    dates::days_until,
    errors::{EngineError, EngineResult},
    frequency::{BillingFrequency, annual_cost, monthly_equivalent},
    money::Currency,
    status::{SubscriptionStatus, classify_within},
};

/// Icon shown when the user does not pick one.
pub const DEFAULT_ICON: &str = "📦";

pub const MAX_NAME_LEN: usize = 100;
/// Largest per-cycle amount accepted from users (one trillion).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);
const MAX_ICON_CHARS: usize = 8;

/// A tracked recurring payment. Status is deliberately absent: it is always
/// derived through [`SubscriptionView::evaluate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub name: String,
    pub icon: String,
    pub amount: Decimal,
    #[serde(default)]
    pub currency: Currency,
    pub frequency: BillingFrequency,
    pub next_billing_date: NaiveDate,
}

impl Subscription {
    pub fn status(&self, today: NaiveDate, window_days: u32) -> SubscriptionStatus {
        classify_within(self.next_billing_date, today, window_days)
    }

    pub fn annual_cost(&self) -> Decimal {
        annual_cost(self.amount, self.frequency)
    }

    pub fn monthly_cost(&self) -> Decimal {
        monthly_equivalent(self.amount, self.frequency)
    }
}

/// User input for a new subscription, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDraft {
    pub name: String,
    pub icon: Option<String>,
    pub amount: Decimal,
    pub currency: Option<Currency>,
    pub frequency: BillingFrequency,
    pub next_billing_date: NaiveDate,
}

impl SubscriptionDraft {
    /// Validate the draft and turn it into a subscription with the given id.
    /// A missing currency falls back to `default_currency`.
    pub fn into_subscription(
        self,
        id: Uuid,
        default_currency: Currency,
    ) -> EngineResult<Subscription> {
        Ok(Subscription {
            id,
            name: validate_name(&self.name)?,
            icon: resolve_icon(self.icon.as_deref()),
            amount: validate_amount(self.amount)?,
            currency: self.currency.unwrap_or(default_currency),
            frequency: self.frequency,
            next_billing_date: self.next_billing_date,
        })
    }
}

/// Partial edit of an existing subscription.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<Currency>,
    pub frequency: Option<BillingFrequency>,
    pub next_billing_date: Option<NaiveDate>,
}

impl SubscriptionPatch {
    /// Apply the edit. Returns whether the next billing date moved, which
    /// means dependent reminders must be rescheduled.
    pub fn apply(self, subscription: &mut Subscription) -> EngineResult<bool> {
        let name = self.name.as_deref().map(validate_name).transpose()?;
        let amount = self.amount.map(validate_amount).transpose()?;

        if let Some(name) = name {
            subscription.name = name;
        }
        if let Some(icon) = self.icon {
            subscription.icon = resolve_icon(Some(&icon));
        }
        if let Some(amount) = amount {
            subscription.amount = amount;
        }
        if let Some(currency) = self.currency {
            subscription.currency = currency;
        }
        if let Some(frequency) = self.frequency {
            subscription.frequency = frequency;
        }
        let billing_moved = match self.next_billing_date {
            Some(date) if date != subscription.next_billing_date => {
                subscription.next_billing_date = date;
                true
            }
            _ => false,
        };
        Ok(billing_moved)
    }
}

/// A subscription together with everything derived from it for one
/// evaluation date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub subscription: Subscription,
    pub status: SubscriptionStatus,
    pub annual_cost: Decimal,
    pub monthly_cost: Decimal,
    pub days_until_billing: i64,
}

impl SubscriptionView {
    pub fn evaluate(subscription: Subscription, today: NaiveDate, window_days: u32) -> Self {
        Self {
            status: subscription.status(today, window_days),
            annual_cost: subscription.annual_cost(),
            monthly_cost: subscription.monthly_cost(),
            days_until_billing: days_until(subscription.next_billing_date, today),
            subscription,
        }
    }
}

pub fn validate_name(raw: &str) -> EngineResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName("name is required".into()));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(EngineError::InvalidName(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

pub fn validate_amount(amount: Decimal) -> EngineResult<Decimal> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(EngineError::NegativeAmount);
    }
    if amount > MAX_AMOUNT {
        return Err(EngineError::AmountTooLarge(MAX_AMOUNT));
    }
    Ok(amount)
}

/// Use the given glyph, or [`DEFAULT_ICON`] when it is missing, blank or
/// implausibly long for a single glyph.
pub fn resolve_icon(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(icon) if !icon.is_empty() && icon.chars().count() <= MAX_ICON_CHARS => {
            icon.to_string()
        }
        _ => DEFAULT_ICON.to_string(),
    }
}
