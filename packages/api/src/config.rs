use std::path::PathBuf;
use std::str::FromStr;

use shared::services::game_service::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// DynamoDB table for games; in-memory storage when unset.
    pub games_table: Option<String>,
    pub game_content_table: Option<String>,
    /// JSON seed for the in-memory store.
    pub seed_file: Option<PathBuf>,
    pub port: u16,
    pub default_page_size: usize,
    pub max_page_size: usize,
    /// Running inside the Lambda runtime rather than as a local listener.
    pub lambda: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(AppConfig {
            games_table: text("GAMES_TABLE"),
            game_content_table: text("GAME_CONTENT_TABLE"),
            seed_file: text("GAMES_SEED_FILE").map(PathBuf::from),
            port: parse(&text, "PORT", DEFAULT_PORT)?,
            default_page_size: parse(&text, "DEFAULT_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
            max_page_size: parse(&text, "MAX_PAGE_SIZE", MAX_PAGE_SIZE)?,
            lambda: text("AWS_LAMBDA_RUNTIME_API").is_some(),
        })
    }
}

fn parse<T, F>(text: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match text(key) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.games_table, None);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.default_page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.max_page_size, MAX_PAGE_SIZE);
        assert!(!config.lambda);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("GAMES_TABLE", "games-prod"),
            ("GAMES_SEED_FILE", "/tmp/seed.json"),
            ("PORT", "8080"),
            ("MAX_PAGE_SIZE", "50"),
            ("AWS_LAMBDA_RUNTIME_API", "127.0.0.1:9001"),
        ])
        .unwrap();

        assert_eq!(config.games_table.as_deref(), Some("games-prod"));
        assert_eq!(config.seed_file, Some(PathBuf::from("/tmp/seed.json")));
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_page_size, 50);
        assert!(config.lambda);
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = config_from(&[("GAMES_TABLE", "  "), ("PORT", "")]).unwrap();

        assert_eq!(config.games_table, None);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_malformed_number() {
        let result = config_from(&[("DEFAULT_PAGE_SIZE", "lots")]);

        assert_eq!(
            result,
            Err(ConfigError::Invalid {
                key: "DEFAULT_PAGE_SIZE".to_string(),
                value: "lots".to_string(),
            })
        );
    }
}
