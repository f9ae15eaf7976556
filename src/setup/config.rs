//! Configuration for running this bot.

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;

/// The path to the config file
const CONFIG_PATH: &str = "config.toml";

/// Settings read from [CONFIG_PATH] that modify bot behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Token needed to use a bot account.
    discord_token: String,

    /// Prefix used when a guild has none configured, and in direct messages.
    default_prefix: String,

    /// Shown by the `about` command.
    description: String,

    /// See [DatabaseConfig]
    database: DatabaseConfig,

    /// See [LoggingConfig]
    logging: LoggingConfig,
}

impl Config {
    /// Tries to read [CONFIG_PATH] to extract a [Config].
    pub fn read() -> Result<Config, ConfigError> {
        Self::read_from(CONFIG_PATH)
    }

    /// Tries to read `path` to extract a [Config].
    /// If a file doesn't exists, create the default config file and returns error.
    /// If a file exists but is empty, re-write the default values and return error.
    /// If a file exists but is incomplete, show error and don't change files.
    /// If a file exists and is complete, read file to create a config.
    /// If file existance is indeterminent (e.g. missing permissions), return error.
    pub fn read_from(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let shown = path.display();

        match std::fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => {
                write_file(path, &Config::default())?;
                Err(ConfigError::InvalidConfig {
                    reason: format!("Empty config file! Rewriting {shown} ..."),
                })
            }
            Ok(content) => {
                // If deserialization fails, return error describing the mistake.
                let to_toml = toml::Deserializer::new(&content);
                let config: Config =
                    serde_path_to_error::deserialize(to_toml).map_err(|error| {
                        ConfigError::InvalidConfig {
                            reason: error.to_string(),
                        }
                    })?;
                config.validate()?;
                Ok(config)
            }
            Err(file_error) if file_error.kind() == std::io::ErrorKind::NotFound => {
                write_file(path, &Config::default())?;
                Err(ConfigError::MissingConfig {
                    action_msg: format!("Creating {shown}..."),
                })
            }
            Err(file_error) => Err(ConfigError::IoError(file_error)),
        }
    }

    /// Checks values that deserialize fine but can't be used.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_prefix.trim().is_empty() {
            return Err(ConfigError::InvalidConfig {
                reason: "default_prefix can't be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Basic sanity check for if a token was given.
    pub fn token(&self) -> Result<&String, ConfigError> {
        let default_token = Config::default().discord_token;
        let given_token = &self.discord_token;

        if given_token.is_empty() || given_token.contains(&default_token) {
            Err(ConfigError::InvalidConfig {
                reason: "Missing discord token".to_string(),
            })
        } else {
            Ok(given_token)
        }
    }

    pub fn default_prefix(&self) -> &str {
        &self.default_prefix
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Location of the prefix database, as an sqlx connection url.
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Getter for log_dir.
    pub fn log_dir(&self) -> &str {
        &self.logging.log_dir
    }

    /// Is debug mode enabled for console logs
    pub fn console_debug(&self) -> bool {
        self.logging.console_debug
    }

    /// Is file logging enabled.
    pub fn logs_enabled(&self) -> bool {
        self.logging.logs_enabled
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            discord_token: "put_token_here".to_string(),
            default_prefix: "!".to_string(),
            description: "A guild administration bot.".to_string(),

            database: DatabaseConfig {
                url: "sqlite://guild-bot.db".to_string(),
            },

            logging: LoggingConfig {
                console_debug: false,
                logs_enabled: true,
                log_dir: "logs".to_string(),
            },
        }
    }
}

/// Where guild prefixes are stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DatabaseConfig {
    /// sqlx connection url, e.g. `sqlite://guild-bot.db`
    url: String,
}

/// Configs for logging
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    /// Print debug traces to console?
    console_debug: bool,
    /// Enable writing to log file?
    logs_enabled: bool,
    /// Directory to store log files
    log_dir: String,
}

/// Write the given config to `path`.
fn write_file(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidConfig {
        reason: e.to_string(),
    })?;
    std::fs::write(path, content).map_err(ConfigError::IoError)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
discord_token = "abc.def.ghi"
default_prefix = "$"
description = "Test bot"

[database]
url = "sqlite::memory:"

[logging]
console_debug = true
logs_enabled = false
log_dir = "test-logs"
"#;

    #[test]
    fn reads_complete_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, VALID).unwrap();

        let config = Config::read_from(&path).unwrap();

        assert_eq!(config.token().unwrap(), "abc.def.ghi");
        assert_eq!(config.default_prefix(), "$");
        assert_eq!(config.description(), "Test bot");
        assert_eq!(config.database_url(), "sqlite::memory:");
        assert!(config.console_debug());
        assert!(!config.logs_enabled());
        assert_eq!(config.log_dir(), "test-logs");
    }

    #[test]
    fn missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let error = Config::read_from(&path).unwrap_err();
        assert!(matches!(error, ConfigError::MissingConfig { .. }));

        // The written defaults parse, but the placeholder token is rejected.
        let config = Config::read_from(&path).unwrap();
        assert_eq!(config.default_prefix(), "!");
        assert!(config.token().is_err());
    }

    #[test]
    fn empty_file_is_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "  \n").unwrap();

        let error = Config::read_from(&path).unwrap_err();
        assert!(matches!(error, ConfigError::InvalidConfig { .. }));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("default_prefix"));
    }

    #[test]
    fn incomplete_file_names_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let incomplete = VALID.replace("log_dir = \"test-logs\"", "");
        std::fs::write(&path, &incomplete).unwrap();

        let error = Config::read_from(&path).unwrap_err();

        match error {
            ConfigError::InvalidConfig { reason } => assert!(reason.contains("log_dir")),
            other => panic!("unexpected error: {other}"),
        }
        // File is left untouched.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), incomplete);
    }

    #[test]
    fn empty_default_prefix_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, VALID.replace("\"$\"", "\"\"")).unwrap();

        let error = Config::read_from(&path).unwrap_err();
        assert!(matches!(error, ConfigError::InvalidConfig { .. }));
    }
}
