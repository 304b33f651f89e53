//! Structured logging for the coastal threat monitoring service.
//!
//! Provides context-rich logging with component tags, entity identifiers
//! (alert or observer ids), timestamps, and severity levels. Supports both
//! console output and file-based logging for daemon operations.
//!
//! Delivery failures from the notification sink are reported through this
//! side channel; they are never propagated back through `reconcile`.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl LogLevel {
    /// Parses the config-file spelling of a level. Unknown values fall back
    /// to `Info` so a typo in the config cannot silence errors.
    pub fn from_config(s: &str) -> LogLevel {
        match s.to_ascii_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" | "warning" => LogLevel::Warning,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Which subsystem produced a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    /// Alert feed ingestion and normalization.
    Feed,
    /// Containment and severity evaluation.
    Geofence,
    /// Snapshot diffing and notification emission.
    Notify,
    /// Outbound SMS gateway.
    Sms,
    /// Service lifecycle (startup, config, shutdown).
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Feed => write!(f, "FEED"),
            Component::Geofence => write!(f, "GEO"),
            Component::Notify => write!(f, "NOTIFY"),
            Component::Sms => write!(f, "SMS"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>) {
        let logger = Logger {
            min_level,
            log_file,
        };
        *LOGGER.lock().unwrap() = Some(logger);
    }

    fn log(&self, level: LogLevel, component: Component, entity_id: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let entity_part = entity_id.map(|s| format!(" [{}]", s)).unwrap_or_default();
        let entry = format!(
            "{} {} {}{}: {}",
            timestamp, level, component, entity_part, message
        );

        match level {
            LogLevel::Error | LogLevel::Warning => eprintln!("{}", entry),
            LogLevel::Info | LogLevel::Debug => println!("{}", entry),
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>) {
    Logger::init(min_level, log_file.map(String::from));
}

/// Log a general informational message
pub fn info(component: Component, entity_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Info, component, entity_id, message);
    }
}

/// Log a warning message
pub fn warn(component: Component, entity_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Warning, component, entity_id, message);
    }
}

/// Log an error message
pub fn error(component: Component, entity_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Error, component, entity_id, message);
    }
}

/// Log a debug message
pub fn debug(component: Component, entity_id: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Debug, component, entity_id, message);
    }
}

// ---------------------------------------------------------------------------
// Reconcile Summary Logging
// ---------------------------------------------------------------------------

/// Log a one-line summary of a reconcile pass.
pub fn log_reconcile_summary(snapshot_size: usize, observers: usize, emitted: usize) {
    let message = format!(
        "reconcile complete: {} alert(s) in snapshot, {} observer(s), {} notification(s) emitted",
        snapshot_size, observers, emitted
    );
    if emitted == 0 {
        debug(Component::Notify, None, &message);
    } else {
        info(Component::Notify, None, &message);
    }
}
