use std::fs;
use std::net::SocketAddr;

use anyhow::Context;
use lms_service::static_service::get_database_connection;
use lms_service::{app, config::APP_CONFIG, utils::tracing::init_standard_tracing};
use migration::{Migrator, MigratorTrait};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    init_standard_tracing(env!("CARGO_CRATE_NAME"));

    tracing::info!("Starting application...");

    fs::create_dir_all(&APP_CONFIG.certificate_output_dir).with_context(|| {
        format!(
            "Failed to create certificate directory {}",
            APP_CONFIG.certificate_output_dir
        )
    })?;

    let db_connection = get_database_connection().await?;

    tracing::info!("Running database migrations...");
    Migrator::up(db_connection, None)
        .await
        .context("Failed to run database migrations")?;

    let app = app::create_app().await?;

    let http_address = format!("0.0.0.0:{}", APP_CONFIG.port);
    tracing::info!(env = %APP_CONFIG.app_env, "HTTP server listening on {}", &http_address);

    let listener = tokio::net::TcpListener::bind(&http_address)
        .await
        .with_context(|| format!("Failed to bind {http_address}"))?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("HTTP server stopped unexpectedly")?;

    Ok(())
}
