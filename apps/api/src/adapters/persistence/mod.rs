use std::str::FromStr;

use sqlx::PgPool;

use crate::app_error::AppError;

pub mod reminder;
pub mod settings;
pub mod subscription;
pub mod user;

/// Parse a text column into one of the engine's enums, logging a warning and
/// falling back to the default when the stored value is unknown.
pub fn parse_text_with_fallback<T: FromStr + Default>(
    raw: &str,
    field_name: &str,
    entity_type: &str,
    entity_id: &str,
) -> T {
    parse_text_or(raw, T::default(), field_name, entity_type, entity_id)
}

/// Like [`parse_text_with_fallback`] with an explicit fallback, for columns
/// where the enum default is the unsafe choice.
pub fn parse_text_or<T: FromStr>(
    raw: &str,
    fallback: T,
    field_name: &str,
    entity_type: &str,
    entity_id: &str,
) -> T {
    T::from_str(raw.trim()).unwrap_or_else(|_| {
        tracing::warn!(
            field = field_name,
            entity_type = entity_type,
            entity_id = entity_id,
            raw_value = %raw,
            "Unknown value in text column, using fallback"
        );
        fallback
    })
}

#[derive(Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    pub fn new(pool: PgPool) -> Self {
        PostgresPersistence { pool }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                // PostgreSQL unique violation
                if msg.contains("duplicate key") || msg.contains("unique constraint") {
                    AppError::InvalidInput("A record with this value already exists".into())
                }
                // PostgreSQL foreign key violation
                else if msg.contains("foreign key") || msg.contains("violates foreign key") {
                    AppError::InvalidInput("Referenced record not found".into())
                }
                // PostgreSQL not-null violation
                else if msg.contains("null value") && msg.contains("violates not-null") {
                    AppError::InvalidInput("Required field is missing".into())
                } else {
                    // Log the actual error for debugging, but don't expose details
                    tracing::error!(error = ?err, "Database error");
                    AppError::Database("Database operation failed".into())
                }
            }
            _ => {
                tracing::error!(error = ?err, "Database error");
                AppError::Database("Database operation failed".into())
            }
        }
    }
}
