use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::CookieJar;

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    application::jwt,
    entities::user::UserProfile,
};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// The authenticated caller, resolved to (and created as) a local user row.
pub struct CurrentUser(pub UserProfile);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> AppResult<Self> {
        let token = access_token(&parts.headers).ok_or(AppError::InvalidCredentials)?;
        let claims = jwt::verify(
            &token,
            &state.config.jwt_secret,
            state.config.jwt_audience.as_deref(),
        )?;
        let profile = state
            .user_repo
            .upsert_by_auth_id(&claims.sub, claims.email.as_deref())
            .await?;
        Ok(CurrentUser(profile))
    }
}

/// Bearer header first, then the `access_token` cookie.
fn access_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(headers)
        .get(ACCESS_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}
