//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use college_path_core::LoadPolicy;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// Value of `STATE_PATH` that selects the in-memory store.
pub const IN_MEMORY_STATE: &str = ":memory:";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// File backing the session's key-value store, or [`IN_MEMORY_STATE`].
    pub state_path: PathBuf,
    pub state_quota_bytes: usize,
    pub catalog_path: PathBuf,
    pub otp_send_delay: Duration,
    pub otp_verify_delay: Duration,
    pub on_malformed_state: LoadPolicy,
    pub allowed_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Server Settings ---
        let bind_address = parse_var("BIND_ADDRESS", "127.0.0.1:3000")?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let allowed_origin =
            std::env::var("ALLOWED_ORIGIN").unwrap_or_else(|_| "http://localhost:8080".to_string());

        // --- Persistence Settings ---
        let state_path = std::env::var("STATE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./college_path_state.json"));
        let state_quota_bytes = parse_var("STATE_QUOTA_BYTES", "5242880")?;

        let on_malformed_state =
            match std::env::var("ON_MALFORMED_STATE").unwrap_or_else(|_| "abort".to_string()).as_str() {
                "abort" => LoadPolicy::Abort,
                "reset" => LoadPolicy::ResetToDefault,
                other => {
                    return Err(ConfigError::InvalidValue(
                        "ON_MALFORMED_STATE".to_string(),
                        format!("expected 'abort' or 'reset', got '{}'", other),
                    ))
                }
            };

        let catalog_path = std::env::var("CATALOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/catalog.json"));

        // --- Simulated OTP Pacing ---
        let otp_send_delay = Duration::from_millis(parse_var("OTP_SEND_DELAY_MS", "1500")?);
        let otp_verify_delay = Duration::from_millis(parse_var("OTP_VERIFY_DELAY_MS", "1000")?);

        Ok(Self {
            bind_address,
            log_level,
            state_path,
            state_quota_bytes,
            catalog_path,
            otp_send_delay,
            otp_verify_delay,
            on_malformed_state,
            allowed_origin,
        })
    }

    pub fn uses_in_memory_state(&self) -> bool {
        self.state_path.as_os_str() == IN_MEMORY_STATE
    }
}

fn parse_var<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string()))
}
