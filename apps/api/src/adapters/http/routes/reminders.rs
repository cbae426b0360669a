use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::Deserialize;
use uuid::Uuid;

use super::now;
use crate::{
    adapters::http::{app_state::AppState, auth::CurrentUser},
    app_error::AppResult,
    use_cases::reminder::ReminderDraft,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reminders).post(schedule_reminder))
        .route("/preview", get(preview_reminder))
        .route("/{id}/send", post(send_reminder))
        .route("/{id}", delete(delete_reminder))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreviewQuery {
    subscription_id: Uuid,
    lead_days: Option<i64>,
}

async fn list_reminders(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<impl IntoResponse> {
    let reminders = app_state.reminder_use_cases.list(user.id).await?;
    Ok(Json(reminders))
}

async fn schedule_reminder(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(draft): Json<ReminderDraft>,
) -> AppResult<impl IntoResponse> {
    let reminder = app_state.reminder_use_cases.schedule(user.id, draft).await?;
    Ok((StatusCode::CREATED, Json(reminder)))
}

async fn preview_reminder(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<PreviewQuery>,
) -> AppResult<impl IntoResponse> {
    let preview = app_state
        .reminder_use_cases
        .preview(user.id, query.subscription_id, query.lead_days)
        .await?;
    Ok(Json(preview))
}

async fn send_reminder(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let result = app_state
        .reminder_use_cases
        .send_now(user.id, id, now())
        .await?;
    Ok(Json(result))
}

async fn delete_reminder(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    app_state.reminder_use_cases.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
