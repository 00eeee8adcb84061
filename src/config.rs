use std::{env, path::PathBuf};

use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILE: &str = "add_numbers_mcp.log";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone)]
pub struct Config {
    pub log_file: Option<PathBuf>,
    pub log_filter: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("RUST_LOG must be a valid tracing filter directive")]
    InvalidLogFilter,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_file = match lookup("MCP_LOG_FILE") {
            None => Some(PathBuf::from(DEFAULT_LOG_FILE)),
            Some(value) if value.trim().is_empty() => None,
            Some(value) => Some(PathBuf::from(value.trim())),
        };

        let log_filter = lookup("RUST_LOG")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        EnvFilter::try_new(&log_filter).map_err(|_| ConfigError::InvalidLogFilter)?;

        Ok(Self {
            log_file,
            log_filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn parse(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn parse_defaults() {
        let config = parse(&[]).expect("config should parse");
        assert_eq!(config.log_file, Some(PathBuf::from(DEFAULT_LOG_FILE)));
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn empty_log_file_disables_file_sink() {
        let config = parse(&[("MCP_LOG_FILE", "  ")]).expect("config should parse");
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn custom_log_file_and_filter() {
        let config = parse(&[
            ("MCP_LOG_FILE", "/tmp/calc.log"),
            ("RUST_LOG", "add_numbers_mcp=debug"),
        ])
        .expect("config should parse");

        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/calc.log")));
        assert_eq!(config.log_filter, "add_numbers_mcp=debug");
    }

    #[test]
    fn invalid_log_filter_fails() {
        let err = parse(&[("RUST_LOG", "add_numbers_mcp=loud")])
            .expect_err("expected invalid filter error");
        assert!(matches!(err, ConfigError::InvalidLogFilter));
    }
}
