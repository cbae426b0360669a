use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    stats::SubscriptionStats,
    subscription::{Subscription, SubscriptionView},
};

/// A row-level change pushed by the backend's real-time feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum SubscriptionChange {
    Insert { record: Subscription },
    Update { record: Subscription },
    Delete { id: Uuid },
}

impl SubscriptionChange {
    pub fn subscription_id(&self) -> Uuid {
        match self {
            SubscriptionChange::Insert { record } | SubscriptionChange::Update { record } => {
                record.id
            }
            SubscriptionChange::Delete { id } => *id,
        }
    }
}

/// What a change did to the board, already re-classified for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardUpdate {
    Upserted(SubscriptionView),
    Removed(Uuid),
    /// Delete for an id the board never held.
    Ignored,
}

/// Caller-owned collection of a user's subscriptions.
///
/// The engine's rules read nothing but their arguments; whoever renders owns
/// one of these and feeds it rows and change events.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionBoard {
    items: Vec<Subscription>,
}

impl SubscriptionBoard {
    pub fn new(items: Vec<Subscription>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// `None` when the id is not among the visible rows; callers fall back
    /// to their default view.
    pub fn get(&self, id: Uuid) -> Option<&Subscription> {
        self.items.iter().find(|s| s.id == id)
    }

    pub fn upsert(&mut self, subscription: Subscription) {
        match self.items.iter_mut().find(|s| s.id == subscription.id) {
            Some(existing) => *existing = subscription,
            None => self.items.push(subscription),
        }
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Subscription> {
        let index = self.items.iter().position(|s| s.id == id)?;
        Some(self.items.remove(index))
    }

    /// Apply a change event and return the row re-evaluated for `today`.
    pub fn apply(
        &mut self,
        change: SubscriptionChange,
        today: NaiveDate,
        window_days: u32,
    ) -> BoardUpdate {
        match change {
            SubscriptionChange::Insert { record } | SubscriptionChange::Update { record } => {
                self.upsert(record.clone());
                BoardUpdate::Upserted(SubscriptionView::evaluate(record, today, window_days))
            }
            SubscriptionChange::Delete { id } => match self.remove(id) {
                Some(_) => BoardUpdate::Removed(id),
                None => BoardUpdate::Ignored,
            },
        }
    }

    /// Every subscription evaluated for `today`, soonest billing first.
    pub fn views(&self, today: NaiveDate, window_days: u32) -> Vec<SubscriptionView> {
        let mut views: Vec<SubscriptionView> = self
            .items
            .iter()
            .cloned()
            .map(|s| SubscriptionView::evaluate(s, today, window_days))
            .collect();
        views.sort_by(|a, b| {
            a.subscription
                .next_billing_date
                .cmp(&b.subscription.next_billing_date)
                .then_with(|| a.subscription.name.cmp(&b.subscription.name))
        });
        views
    }

    pub fn stats(&self, today: NaiveDate, window_days: u32) -> SubscriptionStats {
        SubscriptionStats::compute(&self.items, today, window_days)
    }
}
