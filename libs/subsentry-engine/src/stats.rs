use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{status::SubscriptionStatus, subscription::Subscription};

/// Dashboard totals for a set of subscriptions.
///
/// `monthly_total` normalizes every subscription to a monthly cadence before
/// summing, so a yearly charge contributes a twelfth of its amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStats {
    pub total_count: usize,
    pub active_count: usize,
    pub due_soon_count: usize,
    pub overdue_count: usize,
    pub monthly_total: Decimal,
    pub annual_total: Decimal,
}

impl SubscriptionStats {
    pub fn compute<'a, I>(subscriptions: I, today: NaiveDate, window_days: u32) -> Self
    where
        I: IntoIterator<Item = &'a Subscription>,
    {
        subscriptions
            .into_iter()
            .fold(Self::default(), |mut stats, subscription| {
                stats.total_count += 1;
                match subscription.status(today, window_days) {
                    SubscriptionStatus::Active => stats.active_count += 1,
                    SubscriptionStatus::DueSoon => stats.due_soon_count += 1,
                    SubscriptionStatus::Overdue => stats.overdue_count += 1,
                }
                stats.monthly_total = stats
                    .monthly_total
                    .saturating_add(subscription.monthly_cost());
                stats.annual_total = stats
                    .annual_total
                    .saturating_add(subscription.annual_cost());
                stats
            })
    }
}
