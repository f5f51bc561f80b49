use anyhow::Context;
use once_cell::sync::OnceCell;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::APP_CONFIG;
use crate::error::{AppError, AppResult};

pub static DATABASE_CONNECTION: OnceCell<DatabaseConnection> = OnceCell::new();

/// Connects once and caches the pool for the handlers.
pub async fn get_database_connection() -> anyhow::Result<&'static DatabaseConnection> {
    if let Some(db) = DATABASE_CONNECTION.get() {
        return Ok(db);
    }

    let mut options = ConnectOptions::new(APP_CONFIG.database_url.clone());
    options
        .max_connections(20)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .context("Failed to connect to database")?;

    Ok(DATABASE_CONNECTION.get_or_init(|| db))
}

pub fn database() -> AppResult<&'static DatabaseConnection> {
    DATABASE_CONNECTION
        .get()
        .ok_or_else(|| AppError::Internal("DATABASE_CONNECTION not set".to_string()))
}
