//! Service configuration, deserialized from TOML.
//!
//! Everything here has a working default so the service runs with no config
//! file at all (console sink, 10-entry recent log, 15-second poll). Secrets
//! never live in the file: the SMS gateway auth token comes from the
//! environment, loaded via dotenv at startup.
//!
//! Example `coastmon.toml`:
//!
//! ```toml
//! poll_interval_secs = 15
//! recent_log_cap = 10
//!
//! [log]
//! level = "info"
//! file = "coastmon.log"
//!
//! [sms_gateway]
//! url = "https://gateway.example.com/v1/messages"
//! from_number = "+911234567890"
//! ```

use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Default seconds between feed polls, matching the upstream store's
/// publish cadence.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Cap on the per-observer recent-notification log.
    #[serde(default = "default_recent_log_cap")]
    pub recent_log_cap: usize,
    #[serde(default)]
    pub log: LogConfig,
    /// When absent, notifications go to the console sink.
    #[serde(default)]
    pub sms_gateway: Option<SmsGatewayConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmsGatewayConfig {
    pub url: String,
    pub from_number: String,
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_recent_log_cap() -> usize {
    crate::notify::dedup::DEFAULT_RECENT_LOG_CAP
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            poll_interval_secs: default_poll_interval(),
            recent_log_cap: default_recent_log_cap(),
            log: LogConfig::default(),
            sms_gateway: None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
            file: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "failed to parse config file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
        }
    }
}

impl ServiceConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_toml(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(ConfigError::Parse)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
