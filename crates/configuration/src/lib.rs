use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{ApiConfig, Config, LoggingConfig, ReportConfig, WindowFailurePolicy};

/// Environment variables with this prefix override file values,
/// e.g. `ASSET_REPORT__API__TIMEOUT_SECS=10`.
pub const ENV_PREFIX: &str = "ASSET_REPORT";

/// Loads the application configuration.
///
/// Sources are layered: built-in defaults, then the TOML file at `path` (optional,
/// skipped when missing), then `ASSET_REPORT__*` environment variables.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    tracing::debug!(path = %path.display(), "Loading configuration.");

    let builder = config::Config::builder()
        .add_source(
            config::File::from(path)
                .format(config::FileFormat::Toml)
                .required(false),
        )
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

/// Rejects settings that would only fail later, at request time.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let api = &config.api;
    let required = [
        ("api.search_url", &api.search_url),
        ("api.chart_url", &api.chart_url),
        ("api.user_agent", &api.user_agent),
    ];
    for (key, value) in required {
        if value.trim().is_empty() {
            return Err(ConfigError::Invalid { key, reason: "must not be empty" });
        }
    }
    if api.timeout_secs == 0 {
        return Err(ConfigError::Invalid {
            key: "api.timeout_secs",
            reason: "must be positive",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config.api.user_agent, "Mozilla/5.0");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.report.on_window_error, WindowFailurePolicy::Abort);
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[api]
chart_url = "http://localhost:8080/chart"
timeout_secs = 5

[report]
on_window_error = "report"
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.api.chart_url, "http://localhost:8080/chart");
        assert_eq!(config.api.timeout_secs, 5);
        // Untouched keys keep their defaults.
        assert_eq!(config.api.search_url, ApiConfig::default().search_url);
        assert_eq!(config.report.on_window_error, WindowFailurePolicy::Report);
    }

    #[test]
    fn test_file_without_toml_extension_is_read_as_toml() {
        let mut file = tempfile::Builder::new().suffix(".conf").tempfile().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_validation_rejects_blank_user_agent() {
        let mut config = Config::default();
        config.api.user_agent = "  ".to_string();

        assert!(matches!(
            validate(&config),
            Err(ConfigError::Invalid { key: "api.user_agent", .. })
        ));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;

        assert!(matches!(
            validate(&config),
            Err(ConfigError::Invalid { key: "api.timeout_secs", .. })
        ));
    }
}
