use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::AppResult,
    entities::user::UserProfile,
    use_cases::user::UserRepo,
};

// User struct as stored in the db.
#[derive(sqlx::FromRow, Debug)]
pub struct UserDb {
    pub id: Uuid,
    pub auth_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

impl From<UserDb> for UserProfile {
    fn from(row: UserDb) -> Self {
        UserProfile {
            id: row.id,
            auth_id: row.auth_id,
            email: row.email,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserRepo for PostgresPersistence {
    async fn upsert_by_auth_id(
        &self,
        auth_id: &str,
        email: Option<&str>,
    ) -> AppResult<UserProfile> {
        let rec = sqlx::query_as::<_, UserDb>(
            r#"
                INSERT INTO users (id, auth_id, email)
                VALUES ($1, $2, $3)
                ON CONFLICT (auth_id) DO UPDATE
                SET email = COALESCE($3, users.email)
                RETURNING id, auth_id, email, name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(auth_id)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(rec.into())
    }

    async fn get_profile_by_id(&self, user_id: Uuid) -> AppResult<Option<UserProfile>> {
        let rec = sqlx::query_as::<_, UserDb>(
            "SELECT id, auth_id, email, name, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec.map(Into::into))
    }
}
