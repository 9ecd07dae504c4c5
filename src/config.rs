//! Configuration module
//!
//! Loads configuration from environment variables.

use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Ledger file path
    pub storage_path: PathBuf,

    /// Flush the ledger to disk after every committed transaction
    pub autosave: bool,

    /// Ingest API host
    pub host: String,

    /// Ingest API port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Prefix that marks a chat message as a command
    pub command_prefix: String,

    /// Usernames allowed to run restricted commands (canonical)
    pub operators: HashSet<String>,

    /// The bot's own account, which cannot be robbed (canonical)
    pub bot_username: String,

    /// Per-user cooldown for work and rob
    pub cooldown: Duration,

    /// Helix client id
    pub twitch_client_id: String,

    /// Helix bearer token
    pub twitch_access_token: String,

    /// Timeout for one user directory lookup
    pub directory_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let storage_path = env::var("STORAGE_PATH")
            .unwrap_or_else(|_| "storage.json".to_string())
            .into();

        let autosave = parse_bool("AUTOSAVE", true)?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        let command_prefix = env::var("COMMAND_PREFIX").unwrap_or_else(|_| ">".to_string());
        if command_prefix.is_empty() {
            return Err(ConfigError::InvalidValue("COMMAND_PREFIX"));
        }

        let operators = parse_user_list(
            &env::var("OPERATORS").unwrap_or_else(|_| "drunklockholmes,rinonkaru".to_string()),
        );

        let bot_username = env::var("BOT_USERNAME")
            .unwrap_or_else(|_| "drunklockbot".to_string())
            .to_lowercase();

        let cooldown_seconds: u64 = env::var("COOLDOWN_SECONDS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("COOLDOWN_SECONDS"))?;

        let twitch_client_id = env::var("TWITCH_CLIENT_ID")
            .map_err(|_| ConfigError::MissingEnv("TWITCH_CLIENT_ID"))?;

        let twitch_access_token = env::var("TWITCH_ACCESS_TOKEN")
            .map_err(|_| ConfigError::MissingEnv("TWITCH_ACCESS_TOKEN"))?;

        let directory_timeout_ms: u64 = env::var("DIRECTORY_TIMEOUT_MS")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DIRECTORY_TIMEOUT_MS"))?;

        Ok(Self {
            storage_path,
            autosave,
            host,
            port,
            environment,
            command_prefix,
            operators,
            bot_username,
            cooldown: Duration::from_secs(cooldown_seconds),
            twitch_client_id,
            twitch_access_token,
            directory_timeout: Duration::from_millis(directory_timeout_ms),
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_bool(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(key) {
        Err(_) => Ok(default),
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue(key)),
        },
    }
}

/// Split a comma-separated list of usernames into canonical names
pub fn parse_user_list(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(|name| name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
