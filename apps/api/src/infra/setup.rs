use crate::{
    adapters::{
        email::{log::LogEmailSender, resend::ResendEmailSender},
        http::app_state::AppState,
        push::log::LogPushSender,
    },
    infra::{config::AppConfig, postgres_persistence},
    use_cases::{
        reminder::{ReminderRepo, ReminderUseCases},
        settings::{SettingsRepo, SettingsUseCases},
        subscription::{SubscriptionRepo, SubscriptionUseCases},
        user::{EmailSender, PushSender, UserRepo},
    },
};
use std::fs::File;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state() -> anyhow::Result<AppState> {
    let config = AppConfig::from_env()?;

    let postgres_arc =
        Arc::new(postgres_persistence(&config.database_url, config.db_max_connections).await?);

    let email: Arc<dyn EmailSender> = match &config.resend_api_key {
        Some(api_key) => Arc::new(ResendEmailSender::new(
            api_key.clone(),
            config.email_from.clone(),
        )),
        None => {
            warn!("RESEND_API_KEY not set, reminder emails will only be logged");
            Arc::new(LogEmailSender)
        }
    };
    let push: Arc<dyn PushSender> = Arc::new(LogPushSender);

    let user_repo_arc = postgres_arc.clone() as Arc<dyn UserRepo>;
    let subscription_repo_arc = postgres_arc.clone() as Arc<dyn SubscriptionRepo>;
    let reminder_repo_arc = postgres_arc.clone() as Arc<dyn ReminderRepo>;
    let settings_repo_arc = postgres_arc.clone() as Arc<dyn SettingsRepo>;

    let subscription_use_cases = SubscriptionUseCases::new(
        subscription_repo_arc.clone(),
        reminder_repo_arc.clone(),
        settings_repo_arc.clone(),
    );

    let reminder_use_cases = ReminderUseCases::new(
        reminder_repo_arc,
        subscription_repo_arc,
        settings_repo_arc.clone(),
        user_repo_arc.clone(),
        email,
        push,
        config.app_origin.to_string(),
    );

    let settings_use_cases = SettingsUseCases::new(settings_repo_arc);

    info!(app_origin = %config.app_origin, "Application state initialized");

    Ok(AppState {
        config: Arc::new(config),
        user_repo: user_repo_arc,
        subscription_use_cases: Arc::new(subscription_use_cases),
        reminder_use_cases: Arc::new(reminder_use_cases),
        settings_use_cases: Arc::new(settings_use_cases),
    })
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "subsentry_api=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false) // don’t show target (module path)
        .with_level(true) // show log level
        .pretty(); // human-friendly, with colors

    // File (structured JSON logs). Skipped when the working dir is read-only.
    let json_layer = File::create("app.log").ok().map(|file| {
        fmt::layer()
            .json()
            .with_writer(file)
            .with_current_span(true)
            .with_span_list(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
