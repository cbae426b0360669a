use dotenvy::dotenv;
use tracing::info;

use std::net::SocketAddr;
use subsentry_api::infra::{
    app::create_app, change_listener::run_change_listener,
    reminder_dispatcher::run_reminder_dispatch_loop,
    setup::{init_app_state, init_tracing},
    status_refresher::run_status_refresh_loop,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let app_state = init_app_state().await?;

    let bind_addr = app_state.config.bind_addr;

    let app = create_app(app_state.clone());

    // Background workers
    tokio::spawn(run_reminder_dispatch_loop(
        app_state.reminder_use_cases.clone(),
        app_state.config.reminder_poll_secs,
    ));
    tokio::spawn(run_status_refresh_loop(
        app_state.subscription_use_cases.clone(),
        app_state.config.status_refresh_secs,
    ));
    tokio::spawn(run_change_listener(
        app_state.config.database_url.clone(),
        app_state.config.change_channel.clone(),
        app_state.subscription_use_cases.clone(),
    ));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Backend listening at {}", &listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
