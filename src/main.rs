//! Library Catalogue server

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    ConnectOptions,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use library_catalogue::{
    api,
    config::{AppConfig, SessionBackend},
    repository::Repository,
    services::Services,
    session::{MemorySessionStore, RedisSessionStore, SessionStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Keeps the file writer flushing until shutdown
    let _log_guard = init_tracing(&config);

    tracing::info!(
        "Starting Library Catalogue v{} ({:?})",
        env!("CARGO_PKG_VERSION"),
        config.environment
    );

    let mut connect_options: PgConnectOptions = config
        .database
        .url
        .parse()
        .context("Invalid database URL")?;
    if !config.log_statements() {
        connect_options = connect_options.disable_statement_logging();
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_with(connect_options)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    let sessions: Arc<dyn SessionStore> = match config.session.backend {
        SessionBackend::Memory => {
            tracing::info!("Sessions kept in memory");
            Arc::new(MemorySessionStore::new())
        }
        SessionBackend::Redis => {
            let store = RedisSessionStore::new(&config.session.redis_url)
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!("Sessions kept in Redis");
            Arc::new(store)
        }
    };

    let services = Services::new(Repository::new(pool), config.catalogue.clone());
    services
        .users
        .ensure_admin(config.catalogue.admin_password.as_deref())
        .await
        .context("Failed to prepare the administrator account")?;

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
        sessions,
    };
    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Console output in the configured format, plus a daily file when a log
/// directory is set
fn init_tracing(config: &AppConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_directives().into());

    let json = config.logging.format.eq_ignore_ascii_case("json");
    let (pretty_layer, json_layer) = if json {
        (None, Some(fmt::layer().json()))
    } else {
        (Some(fmt::layer()), None)
    };

    let (file_layer, guard) = match &config.logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "library-catalogue.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty_layer)
        .with(json_layer)
        .with(file_layer)
        .init();

    guard
}
