use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid configuration value for `{key}`: {reason}")]
    Invalid {
        key: &'static str,
        reason: &'static str,
    },
}
