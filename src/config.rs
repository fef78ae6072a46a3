use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_connect_timeout_seconds: u64,
    pub db_sqlx_logging: bool,
    pub run_migrations: bool,

    // Domain settings
    /// Prefix of the note attached to notifications derived from breakages
    pub breakage_note_label: String,
    pub default_page_size: u64,
    pub max_page_size: u64,

    // Application metadata
    pub log_format: LogFormat,
    pub deployment: Deployment,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if required environment variables are not set,
    /// and `ConfigError::Invalid` if a set value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Self {
            // Database
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 20)?,
            db_min_connections: parse_var("DB_MIN_CONNECTIONS", 2)?,
            db_connect_timeout_seconds: parse_var("DB_CONNECT_TIMEOUT_SECONDS", 10)?,
            db_sqlx_logging: parse_var("DB_SQLX_LOGGING", false)?,
            run_migrations: parse_var("RUN_MIGRATIONS", true)?,

            // Domain settings
            breakage_note_label: env::var("BREAKAGE_NOTE_LABEL")
                .unwrap_or_else(|_| "Breakage reported: ".to_string()),
            default_page_size: parse_var("DEFAULT_PAGE_SIZE", 20)?,
            max_page_size: parse_var("MAX_PAGE_SIZE", 200)?,

            // Application metadata
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_default()
                .to_lowercase()
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            deployment: Deployment::from_str(
                &env::var("DEPLOYMENT").unwrap_or_else(|_| "local".to_string()),
            ),
        };

        if config.db_min_connections > config.db_max_connections {
            return Err(ConfigError::Invalid {
                var: "DB_MIN_CONNECTIONS",
                value: config.db_min_connections.to_string(),
            });
        }

        Ok(config)
    }

    /// Configuration for tests and embedders that bypass the environment.
    #[must_use]
    pub fn with_database_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            db_max_connections: 20,
            db_min_connections: 2,
            db_connect_timeout_seconds: 10,
            db_sqlx_logging: false,
            run_migrations: true,
            breakage_note_label: "Breakage reported: ".to_string(),
            default_page_size: 20,
            max_page_size: 200,
            log_format: LogFormat::Pretty,
            deployment: Deployment::Local,
        }
    }
}

fn parse_var<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value '{value}' for environment variable {var}")]
    Invalid { var: &'static str, value: String },
}
