use crate::{adapters::persistence::PostgresPersistence, infra::db::init_db};

pub mod app;
pub mod change_listener;
pub mod config;
pub mod db;
pub mod reminder_dispatcher;
pub mod setup;
pub mod status_refresher;

pub async fn postgres_persistence(
    database_url: &str,
    max_connections: u32,
) -> anyhow::Result<PostgresPersistence> {
    let pool = init_db(database_url, max_connections).await?;
    let persistence = PostgresPersistence::new(pool);
    Ok(persistence)
}
