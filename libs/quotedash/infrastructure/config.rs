use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse {path}: {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Credentials used when no config file exists
pub const SIMULATION_PERSON_ID: &str = "PAPIUSER01";
pub const SIMULATION_PASSWORD: &str = "2222";

/// Environment variables overriding the configured credentials
pub const PERSON_ID_ENV: &str = "SJ_PERSON_ID";
pub const PASSWORD_ENV: &str = "SJ_PASSWORD";

/// Dashboard configuration, read from a JSON key-value file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Connect to the simulation environment
    pub simulation: bool,
    pub person_id: String,
    pub password: String,
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// File receiving logs while the terminal is in the alternate screen
    #[serde(default = "default_log_file")]
    pub log_file: String,
    /// Rows kept by the trade tape
    #[serde(default = "default_tape_capacity")]
    pub tape_capacity: usize,
    /// Upper bound for the historical tick query
    #[serde(default = "default_history_timeout")]
    pub history_timeout_secs: u64,
    /// Contract code selected at startup
    #[serde(default)]
    pub default_contract: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "sjtop.log".to_string()
}

fn default_tape_capacity() -> usize {
    15
}

fn default_history_timeout() -> u64 {
    5
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            simulation: true,
            person_id: SIMULATION_PERSON_ID.to_string(),
            password: SIMULATION_PASSWORD.to_string(),
            log_level: default_log_level(),
            log_file: default_log_file(),
            tape_capacity: default_tape_capacity(),
            history_timeout_secs: default_history_timeout(),
            default_contract: None,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a JSON file and .env.
    ///
    /// A missing file yields the simulation defaults; a present but malformed
    /// file is an error.
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let path = config_path.as_ref();

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_json(&content, &path.display().to_string())?
        } else {
            info!("Config file {} not found, using simulation defaults", path.display());
            Self::default()
        };

        // Don't fail if .env doesn't exist
        dotenv::dotenv().ok();
        config.apply_credential_overrides(|key| std::env::var(key).ok());

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration text; `origin` names the source in error messages
    pub fn from_json(content: &str, origin: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|source| ConfigError::JsonError {
            path: origin.to_string(),
            source,
        })
    }

    /// Replace credentials with values found by `lookup`
    pub fn apply_credential_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(person_id) = lookup(PERSON_ID_ENV).filter(|v| !v.is_empty()) {
            info!("Overriding person_id from environment variable");
            self.person_id = person_id;
        }
        if let Some(password) = lookup(PASSWORD_ENV).filter(|v| !v.is_empty()) {
            info!("Overriding password from environment variable");
            self.password = password;
        }
    }

    pub fn history_timeout(&self) -> Duration {
        Duration::from_secs(self.history_timeout_secs)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.person_id.is_empty() {
            return Err(ConfigError::ValidationError(
                "person_id cannot be empty".to_string(),
            ));
        }

        if self.password.is_empty() {
            return Err(ConfigError::ValidationError(
                "password cannot be empty".to_string(),
            ));
        }

        if self.tape_capacity == 0 || self.tape_capacity > 500 {
            return Err(ConfigError::ValidationError(
                "tape_capacity must be between 1 and 500".to_string(),
            ));
        }

        if self.history_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "history_timeout_secs must be greater than 0".to_string(),
            ));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            )));
        }

        Ok(())
    }

    /// Log configuration summary
    pub fn log(&self) {
        info!("Configuration loaded:");
        info!("  Simulation: {}", self.simulation);
        info!("  Person ID: {}", self.person_id);
        info!("  Tape capacity: {}", self.tape_capacity);
        info!("  History timeout: {} seconds", self.history_timeout_secs);
        info!(
            "  Default contract: {}",
            self.default_contract.as_deref().unwrap_or("(smallest symbol)")
        );
        info!("  Log level: {}", self.log_level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_simulation() {
        let config = DashboardConfig::default();
        assert!(config.simulation);
        assert_eq!(config.person_id, "PAPIUSER01");
        assert_eq!(config.password, "2222");
        assert_eq!(config.tape_capacity, 15);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_file_fills_defaults() {
        let config = DashboardConfig::from_json(
            r#"{"simulation": false, "person_id": "A123456789", "password": "secret"}"#,
            "sjtop.json",
        )
        .unwrap();

        assert!(!config.simulation);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.history_timeout(), Duration::from_secs(5));
        assert!(config.default_contract.is_none());
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let err = DashboardConfig::from_json(
            r#"{"simulation": "yes", "person_id": "A", "password": "B"}"#,
            "sjtop.json",
        )
        .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("sjtop.json"));
        assert!(msg.contains("invalid type"));
    }

    #[test]
    fn test_credential_overrides() {
        let mut config = DashboardConfig::default();
        config.apply_credential_overrides(|key| match key {
            PERSON_ID_ENV => Some("F100000000".to_string()),
            PASSWORD_ENV => Some(String::new()),
            _ => None,
        });

        assert_eq!(config.person_id, "F100000000");
        // empty values are ignored
        assert_eq!(config.password, SIMULATION_PASSWORD);
    }

    #[test]
    fn test_config_validation() {
        let mut config = DashboardConfig::default();

        config.tape_capacity = 0;
        assert!(config.validate().is_err());
        config.tape_capacity = 15;

        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());
        config.log_level = "debug".to_string();

        config.history_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
