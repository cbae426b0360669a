use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use subsentry_engine::{SubscriptionDraft, SubscriptionPatch};
use uuid::Uuid;

use super::today;
use crate::{
    adapters::http::{app_state::AppState, auth::CurrentUser},
    app_error::AppResult,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_subscriptions).post(create_subscription))
        .route("/stats", get(get_stats))
        .route(
            "/{id}",
            get(get_subscription)
                .patch(update_subscription)
                .delete(delete_subscription),
        )
}

async fn list_subscriptions(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<impl IntoResponse> {
    let views = app_state
        .subscription_use_cases
        .list_views(user.id, today())
        .await?;
    Ok(Json(views))
}

async fn create_subscription(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(draft): Json<SubscriptionDraft>,
) -> AppResult<impl IntoResponse> {
    let view = app_state
        .subscription_use_cases
        .create(user.id, draft, today())
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn get_stats(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<impl IntoResponse> {
    let stats = app_state
        .subscription_use_cases
        .stats(user.id, today())
        .await?;
    Ok(Json(stats))
}

async fn get_subscription(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let view = app_state
        .subscription_use_cases
        .get_view(user.id, id, today())
        .await?;
    Ok(Json(view))
}

async fn update_subscription(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<SubscriptionPatch>,
) -> AppResult<impl IntoResponse> {
    let view = app_state
        .subscription_use_cases
        .update(user.id, id, patch, today())
        .await?;
    Ok(Json(view))
}

async fn delete_subscription(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    app_state.subscription_use_cases.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
