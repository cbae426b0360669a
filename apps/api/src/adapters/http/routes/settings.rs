use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use subsentry_engine::SettingsPatch;

use crate::{
    adapters::http::{app_state::AppState, auth::CurrentUser},
    app_error::AppResult,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_settings).patch(update_settings))
}

async fn get_settings(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<impl IntoResponse> {
    let settings = app_state.settings_use_cases.get(user.id).await?;
    Ok(Json(settings))
}

async fn update_settings(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(patch): Json<SettingsPatch>,
) -> AppResult<impl IntoResponse> {
    let settings = app_state.settings_use_cases.update(user.id, patch).await?;
    Ok(Json(settings))
}
