use std::net::{Ipv4Addr, SocketAddr};

use anyhow::Context;
use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use url::Url;

pub const DEFAULT_EMAIL_FROM: &str = "SubSentry <reminders@subsentry.app>";
pub const DEFAULT_CHANGE_CHANNEL: &str = "subscription_changes";

pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    /// HS256 secret shared with the hosted auth platform.
    pub jwt_secret: SecretString,
    /// Expected `aud` claim. Unset disables the audience check.
    pub jwt_audience: Option<String>,
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
    /// Frontend origin, used for links in reminder emails.
    pub app_origin: Url,
    /// Without a key, emails are logged instead of delivered.
    pub resend_api_key: Option<SecretString>,
    pub email_from: String,
    pub reminder_poll_secs: u64,
    pub status_refresh_secs: u64,
    /// Postgres channel the subscriptions trigger NOTIFYs on.
    pub change_channel: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url: String = get_env("DATABASE_URL");
        let db_max_connections: u32 = get_env_default("DB_MAX_CONNECTIONS", 5);
        let jwt_secret: SecretString = SecretString::new(get_env::<String>("JWT_SECRET").into());
        let jwt_audience = optional_env("JWT_AUDIENCE");

        let bind_addr: SocketAddr = get_env_default(
            "BIND_ADDR",
            SocketAddr::from((Ipv4Addr::LOCALHOST, 3001)),
        );
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .context("CORS_ORIGIN must be a valid header value")?;
        let app_origin: Url = get_env_default(
            "APP_ORIGIN",
            Url::parse("http://localhost:3000").context("default APP_ORIGIN")?,
        );

        let resend_api_key = optional_env("RESEND_API_KEY").map(|key| SecretString::new(key.into()));
        let email_from: String = get_env_default("EMAIL_FROM", DEFAULT_EMAIL_FROM.to_string());

        let reminder_poll_secs: u64 = get_env_default("REMINDER_POLL_SECS", 300);
        let status_refresh_secs: u64 = get_env_default("STATUS_REFRESH_SECS", 3600);
        let change_channel: String =
            get_env_default("CHANGE_CHANNEL", DEFAULT_CHANGE_CHANNEL.to_string());

        Ok(Self {
            database_url,
            db_max_connections,
            jwt_secret,
            jwt_audience,
            bind_addr,
            cors_origin,
            app_origin,
            resend_api_key,
            email_from,
            reminder_poll_secs,
            status_refresh_secs,
            change_channel,
        })
    }
}

/// Unset and blank are the same thing.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
