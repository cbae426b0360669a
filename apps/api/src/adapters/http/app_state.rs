use std::sync::Arc;

use crate::{
    infra::config::AppConfig,
    use_cases::{
        reminder::ReminderUseCases, settings::SettingsUseCases,
        subscription::SubscriptionUseCases, user::UserRepo,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub user_repo: Arc<dyn UserRepo>,
    pub subscription_use_cases: Arc<SubscriptionUseCases>,
    pub reminder_use_cases: Arc<ReminderUseCases>,
    pub settings_use_cases: Arc<SettingsUseCases>,
}
