use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/pipebridge/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("pipebridge").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from an explicit path.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The poll interval is non-zero
    /// - The separator is not a line terminator
    /// - The inbox and both sinks are three distinct files
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.polling.interval_ms == 0 {
            return Err(ConfigError::ValidationError {
                message: "polling.interval_ms must be greater than zero".to_string(),
            });
        }

        if matches!(self.polling.separator, '\n' | '\r') {
            return Err(ConfigError::ValidationError {
                message: "polling.separator must not be a line terminator".to_string(),
            });
        }

        let inbox = &self.inbox.path;
        for sink in [&self.sinks.outbox, &self.sinks.mirror] {
            if sink == inbox {
                return Err(ConfigError::ValidationError {
                    message: format!(
                        "Sink '{}' must not be the same file as the inbox",
                        sink.display()
                    ),
                });
            }
        }

        if self.sinks.outbox == self.sinks.mirror {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Outbox and mirror must be different files, both are '{}'",
                    self.sinks.outbox.display()
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CursorMode;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[inbox]
cursor = "rescan"

[polling]
interval_ms = 50
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.inbox.cursor, CursorMode::Rescan);
        assert_eq!(config.inbox.path, PathBuf::from("test.pipe.topy"));
        assert_eq!(config.polling.interval_ms, 50);
        assert_eq!(config.polling.separator, '\t');
        assert!(config.echo);
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "invalid { toml }").unwrap();

        match Config::load_from(&path) {
            Err(ConfigError::ParseError { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut config = Config::default();
        config.polling.interval_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn newline_separator_is_rejected() {
        let mut config = Config::default();
        config.polling.separator = '\n';
        assert!(config.validate().is_err());
    }

    #[test]
    fn sink_sharing_inbox_is_rejected() {
        let mut config = Config::default();
        config.sinks.mirror = config.inbox.path.clone();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("inbox"));
    }

    #[test]
    fn identical_sinks_are_rejected() {
        let mut config = Config::default();
        config.sinks.mirror = config.sinks.outbox.clone();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Outbox and mirror"));
    }
}
