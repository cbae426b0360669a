use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::errors::{EngineError, EngineResult};

const CURRENCY_DECIMALS: u32 = 2;

/// Billing currencies a user can pick.
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
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Inr,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Inr => "₹",
        }
    }

    pub fn parse(raw: &str) -> EngineResult<Self> {
        raw.trim()
            .parse::<Currency>()
            .map_err(|_| EngineError::UnknownValue {
                kind: "currency",
                value: raw.to_string(),
            })
    }
}

/// Round to currency precision for display. Computation elsewhere keeps
/// full precision.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
}

/// Render an amount with its currency symbol and exactly two decimals.
pub fn format_amount(currency: Currency, amount: Decimal) -> String {
    let mut rounded = round_currency(amount);
    rounded.rescale(CURRENCY_DECIMALS);
    format!("{}{}", currency.symbol(), rounded)
}
