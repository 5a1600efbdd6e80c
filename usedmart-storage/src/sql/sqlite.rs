use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::{info, instrument, log::LevelFilter};
use usedmart_error::UMResult;
use usedmart_models::settings::{Sqlite, UMDbConfig};

/// Connects to the configured SQLite database.
///
/// `mode=rwc` in the URL creates the file when `auto_create` is on. An
/// in-memory database lives inside a single connection, so its pool is
/// pinned to one.
#[instrument(name = "init-sqlite-db", skip_all)]
pub async fn init_db(config: &Sqlite) -> UMResult<DatabaseConnection> {
    let database_url = config.to_url();

    let mut opts = ConnectOptions::new(&database_url);
    opts.connect_timeout(Duration::from_millis(config.timeout));
    if config.is_memory() {
        opts.max_connections(1).min_connections(1);
    } else {
        opts.idle_timeout(Duration::from_millis(config.idle_timeout))
            .max_lifetime(Duration::from_millis(config.max_lifetime))
            .max_connections(config.max_connections);
    }

    #[cfg(debug_assertions)]
    {
        opts.sqlx_logging(true)
            .sqlx_logging_level(LevelFilter::Debug);
    }
    #[cfg(not(debug_assertions))]
    {
        opts.sqlx_logging(false)
            .sqlx_logging_level(LevelFilter::Off);
    }

    info!(
        "Connecting to SQLite database at: {} (auto_create: {})",
        config.db_path(),
        config.auto_create
    );

    let db = Database::connect(opts).await?;

    #[cfg(not(debug_assertions))]
    {
        use sea_orm::{ConnectionTrait, DbBackend, Statement};
        for pragma in ["PRAGMA synchronous=NORMAL;", "PRAGMA temp_store=MEMORY;"] {
            if let Err(e) = db
                .execute(Statement::from_string(DbBackend::Sqlite, pragma.to_string()))
                .await
            {
                tracing::warn!("Failed to apply `{pragma}`: {e}");
            }
        }
    }

    info!("Successfully connected to SQLite database");
    Ok(db)
}
