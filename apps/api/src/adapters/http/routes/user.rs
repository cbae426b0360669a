use axum::{Json, Router, response::IntoResponse, routing::get};

use crate::{
    adapters::http::{app_state::AppState, auth::CurrentUser},
    app_error::AppResult,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

async fn get_me(CurrentUser(user): CurrentUser) -> AppResult<impl IntoResponse> {
    Ok(Json(user))
}
