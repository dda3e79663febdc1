//! Configuration management for the library catalogue

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// When set, logs are also written to a daily rolling file in this directory
    pub directory: Option<String>,
}

/// Where session payloads are kept between requests
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    Memory,
    Redis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub backend: SessionBackend,
    pub redis_url: String,
    pub cookie_name: String,
    pub ttl_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogueConfig {
    pub books_per_page: i64,
    /// The single privileged account
    pub admin_username: String,
    /// Created at startup when no account named `admin_username` exists
    pub admin_password: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    Development,
    Production,
    Test,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: RunMode,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub catalogue: CatalogueConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .set_override("environment", run_mode.as_str())?
            // Add environment variables (e.g. CATALOGUE_SERVER__PORT=9000)
            .add_source(
                Environment::with_prefix("CATALOGUE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("session.redis_url", env::var("REDIS_URL").ok())?
            .build()?;

        config.try_deserialize()
    }

    /// Executed statements go to the log sink everywhere except under test
    pub fn log_statements(&self) -> bool {
        self.environment != RunMode::Test
    }

    /// Default `EnvFilter` directives when `RUST_LOG` is not set.
    ///
    /// sqlx reports each statement at debug level under `sqlx::query`.
    pub fn log_directives(&self) -> String {
        let mut directives = format!("library_catalogue={},tower_http=debug", self.logging.level);
        if self.log_statements() {
            directives.push_str(",sqlx::query=debug");
        }
        directives
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: RunMode::default(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
            session: SessionConfig::default(),
            catalogue: CatalogueConfig::default(),
        }
    }
}

impl Default for RunMode {
    fn default() -> Self {
        RunMode::Development
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4567,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432/library".to_string(),
            max_connections: 10,
            min_connections: 1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            directory: None,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::Memory,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            cookie_name: "catalogue_session".to_string(),
            ttl_seconds: 7 * 24 * 3600,
        }
    }
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            books_per_page: 5,
            admin_username: "admin".to_string(),
            admin_password: None,
        }
    }
}
