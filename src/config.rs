use crate::error::{config::ConfigError, AppError};

const DEFAULT_LOG_FILTER: &str = "info";

pub struct Config {
    pub database_url: String,

    /// `tracing_subscriber` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?,
            log_filter: std::env::var("LOG_FILTER")
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}
