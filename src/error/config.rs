use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is not set.
    ///
    /// The engine requires this environment variable to be defined. Check the
    /// `.env` file or the deployment environment for required configuration variables.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}
