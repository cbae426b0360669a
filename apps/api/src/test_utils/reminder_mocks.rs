//! In-memory mock implementation of the reminder repository.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::sync::Mutex;
use subsentry_engine::Reminder;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    use_cases::reminder::ReminderRepo,
};

/// Reminders keyed by id, each stored with its owner. Failed deliveries are
/// tracked beside them the way the `delivery_attempts` and
/// `last_attempt_at` columns are.
#[derive(Default)]
pub struct InMemoryReminderRepo {
    pub reminders: Mutex<HashMap<Uuid, (Uuid, Reminder)>>,
    attempts: Mutex<HashMap<Uuid, (u32, NaiveDateTime)>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user_id: Uuid, reminder: Reminder) {
        self.reminders
            .lock()
            .unwrap()
            .insert(reminder.id, (user_id, reminder));
    }

    /// Get all reminders (for test assertions).
    pub fn get_all(&self) -> Vec<Reminder> {
        self.reminders
            .lock()
            .unwrap()
            .values()
            .map(|(_, r)| r.clone())
            .collect()
    }

    /// Failed deliveries recorded for a reminder.
    pub fn attempts(&self, id: Uuid) -> u32 {
        self.attempts
            .lock()
            .unwrap()
            .get(&id)
            .map_or(0, |(count, _)| *count)
    }

    /// Look up a reminder regardless of owner.
    pub fn find(&self, id: Uuid) -> Option<Reminder> {
        self.reminders
            .lock()
            .unwrap()
            .get(&id)
            .map(|(_, r)| r.clone())
    }
}

#[async_trait]
impl ReminderRepo for InMemoryReminderRepo {
    async fn create(&self, user_id: Uuid, reminder: &Reminder) -> AppResult<()> {
        let mut reminders = self.reminders.lock().unwrap();
        if reminders.contains_key(&reminder.id) {
            return Err(AppError::InvalidInput("Reminder already exists".into()));
        }
        reminders.insert(reminder.id, (user_id, reminder.clone()));
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Reminder>> {
        let mut items: Vec<Reminder> = self
            .reminders
            .lock()
            .unwrap()
            .values()
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, r)| r.clone())
            .collect();
        items.sort_by_key(|r| r.scheduled_date);
        Ok(items)
    }

    async fn get(&self, user_id: Uuid, id: Uuid) -> AppResult<Option<Reminder>> {
        Ok(self
            .reminders
            .lock()
            .unwrap()
            .get(&id)
            .filter(|(owner, _)| *owner == user_id)
            .map(|(_, r)| r.clone()))
    }

    async fn list_for_subscription(&self, subscription_id: Uuid) -> AppResult<Vec<Reminder>> {
        Ok(self
            .reminders
            .lock()
            .unwrap()
            .values()
            .filter(|(_, r)| r.subscription_id == subscription_id)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn list_due(
        &self,
        today: NaiveDate,
        max_attempts: u32,
        limit: i64,
    ) -> AppResult<Vec<Reminder>> {
        let reminders = self.reminders.lock().unwrap();
        let attempts = self.attempts.lock().unwrap();
        let mut due: Vec<(Option<NaiveDateTime>, Reminder)> = reminders
            .values()
            .filter(|(_, r)| r.is_due(today))
            .filter_map(|(_, r)| match attempts.get(&r.id) {
                Some((count, _)) if *count >= max_attempts => None,
                Some((_, last)) => Some((Some(*last), r.clone())),
                None => Some((None, r.clone())),
            })
            .collect();
        // `None` sorts first, like NULLS FIRST.
        due.sort_by_key(|(last, r)| (*last, r.scheduled_date));
        due.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(due.into_iter().map(|(_, r)| r).collect())
    }

    async fn update_schedule(&self, reminder: &Reminder) -> AppResult<()> {
        let mut reminders = self.reminders.lock().unwrap();
        let (_, stored) = reminders.get_mut(&reminder.id).ok_or(AppError::NotFound)?;
        stored.scheduled_date = reminder.scheduled_date;
        stored.status = reminder.status;
        stored.sent_at = reminder.sent_at;
        self.attempts.lock().unwrap().remove(&reminder.id);
        Ok(())
    }

    async fn mark_sent(&self, id: Uuid, sent_at: NaiveDateTime) -> AppResult<()> {
        let mut reminders = self.reminders.lock().unwrap();
        let (_, reminder) = reminders.get_mut(&id).ok_or(AppError::NotFound)?;
        reminder.mark_sent(sent_at);
        Ok(())
    }

    async fn record_failed_attempt(&self, id: Uuid, at: NaiveDateTime) -> AppResult<u32> {
        if !self.reminders.lock().unwrap().contains_key(&id) {
            return Err(AppError::NotFound);
        }
        let mut attempts = self.attempts.lock().unwrap();
        let entry = attempts.entry(id).or_insert((0, at));
        entry.0 += 1;
        entry.1 = at;
        Ok(entry.0)
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> AppResult<bool> {
        let mut reminders = self.reminders.lock().unwrap();
        match reminders.get(&id) {
            Some((owner, _)) if *owner == user_id => {
                reminders.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_for_subscription(&self, subscription_id: Uuid) -> AppResult<u64> {
        let mut reminders = self.reminders.lock().unwrap();
        let before = reminders.len();
        reminders.retain(|_, (_, r)| r.subscription_id != subscription_id);
        Ok((before - reminders.len()) as u64)
    }
}
