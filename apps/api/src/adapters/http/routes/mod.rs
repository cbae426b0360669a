pub mod reminders;
pub mod settings;
pub mod subscriptions;
pub mod user;

use axum::Router;
use chrono::{NaiveDate, NaiveDateTime, Utc};

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/user", user::router())
        .nest("/subscriptions", subscriptions::router())
        .nest("/reminders", reminders::router())
        .nest("/settings", settings::router())
}

/// Evaluation date for request handlers (UTC calendar day).
fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}
