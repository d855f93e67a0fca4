//! Environment configuration

use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

/// Runtime configuration, read once at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub db_path: String,
    pub session_ttl: Duration,
    pub seed_demo: bool,
    pub access_token: String,
    pub phone_number_id: String,
    pub verify_token: String,
}

impl Config {
    /// Read configuration from the environment, failing fast when the Meta
    /// credentials are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_token = require("META_ACCESS_TOKEN")?;
        let phone_number_id = require("WHATSAPP_PHONE_NUMBER_ID")?;
        let verify_token = require("WEBHOOK_VERIFY_TOKEN")?;

        let port = std::env::var("MEDLINK_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let db_path = std::env::var("MEDLINK_DB_PATH").unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            format!("{home}/.medlink/medlink.db")
        });

        let session_ttl = std::env::var("MEDLINK_SESSION_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map_or(Duration::from_secs(DEFAULT_SESSION_TTL_SECS), Duration::from_secs);

        let seed_demo = matches!(
            std::env::var("MEDLINK_SEED_DEMO").ok().as_deref(),
            Some("1" | "true")
        );

        Ok(Self {
            port,
            db_path,
            session_ttl,
            seed_demo,
            access_token,
            phone_number_id,
            verify_token,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::Missing(name))
}
