use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::errors::{EngineError, EngineResult};

const MONTHS_PER_YEAR: u32 = 12;

/// Recurrence interval of a subscription charge.
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
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum BillingFrequency {
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl BillingFrequency {
    /// Number of charges in a calendar year.
    pub fn cycles_per_year(&self) -> u32 {
        match self {
            BillingFrequency::Weekly => 52,
            BillingFrequency::Monthly => 12,
            BillingFrequency::Quarterly => 4,
            BillingFrequency::Yearly => 1,
        }
    }

    /// Parse a stored or user-supplied frequency, case-insensitively.
    pub fn parse(raw: &str) -> EngineResult<Self> {
        raw.trim()
            .parse::<BillingFrequency>()
            .map_err(|_| EngineError::UnknownValue {
                kind: "frequency",
                value: raw.to_string(),
            })
    }
}

/// Yearly cost of a subscription charged `amount` per cycle. Not rounded.
/// Saturates at `Decimal::MAX` for amounts that bypassed validation.
pub fn annual_cost(amount: Decimal, frequency: BillingFrequency) -> Decimal {
    amount.saturating_mul(Decimal::from(frequency.cycles_per_year()))
}

/// Cost normalized to a monthly cadence. Not rounded.
pub fn monthly_equivalent(amount: Decimal, frequency: BillingFrequency) -> Decimal {
    match frequency {
        BillingFrequency::Monthly => amount,
        other => annual_cost(amount, other) / Decimal::from(MONTHS_PER_YEAR),
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_annual_cost_multipliers() {
        let amount = dec("7.25");
        assert_eq!(annual_cost(amount, BillingFrequency::Monthly), amount * dec("12"));
        assert_eq!(annual_cost(amount, BillingFrequency::Weekly), amount * dec("52"));
        assert_eq!(annual_cost(amount, BillingFrequency::Quarterly), amount * dec("4"));
        assert_eq!(annual_cost(amount, BillingFrequency::Yearly), amount);
    }

    #[test]
    fn test_annual_cost_monthly_scenario() {
        assert_eq!(
            annual_cost(dec("9.99"), BillingFrequency::Monthly),
            dec("119.88")
        );
    }

    #[test]
    fn test_monthly_equivalent() {
        assert_eq!(
            monthly_equivalent(dec("120"), BillingFrequency::Yearly),
            dec("10")
        );
        assert_eq!(
            monthly_equivalent(dec("30"), BillingFrequency::Quarterly),
            dec("10")
        );
        assert_eq!(
            monthly_equivalent(dec("15.99"), BillingFrequency::Monthly),
            dec("15.99")
        );
        // 3 * 52 / 12 = 13
        assert_eq!(
            monthly_equivalent(dec("3"), BillingFrequency::Weekly),
            dec("13")
        );
    }

    #[test]
    fn test_monthly_equivalent_keeps_precision() {
        let weekly = monthly_equivalent(dec("1"), BillingFrequency::Weekly);
        // 52 / 12 is not representable in two decimals
        assert!(weekly > dec("4.33") && weekly < dec("4.34"));
        assert!(weekly.scale() > 2);
        assert_eq!(weekly.round_dp(2), dec("4.33"));
    }

    #[test]
    fn test_huge_amount_saturates_instead_of_panicking() {
        assert_eq!(
            annual_cost(Decimal::MAX, BillingFrequency::Weekly),
            Decimal::MAX
        );
        let monthly = monthly_equivalent(Decimal::MAX, BillingFrequency::Weekly);
        assert_eq!(monthly, Decimal::MAX / dec("12"));
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(
            BillingFrequency::parse("monthly").unwrap(),
            BillingFrequency::Monthly
        );
        assert_eq!(
            BillingFrequency::parse(" YEARLY ").unwrap(),
            BillingFrequency::Yearly
        );
        assert!(matches!(
            BillingFrequency::parse("daily"),
            Err(EngineError::UnknownValue { kind: "frequency", .. })
        ));
    }

    #[test]
    fn test_display_matches_serde() {
        for variant in BillingFrequency::iter() {
            let json = serde_json::to_string(&variant).unwrap();
            assert_eq!(json, format!("\"{}\"", variant));
            assert_eq!(variant.as_ref(), variant.to_string());
        }
    }
}
