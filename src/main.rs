//! Service entry point.
//!
//! Loads configuration, wires a notification sink, and drives the notifier
//! from the scripted development feed on a fixed poll cadence. Snapshots
//! are processed serially from this single thread, which is the ordering
//! the deduplicator requires.

use std::path::Path;
use std::thread;
use std::time::Duration;

use chrono::Utc;

use coastmon_service::config::ServiceConfig;
use coastmon_service::dev_mode::DevFeed;
use coastmon_service::logging::{self, Component, LogLevel};
use coastmon_service::model::{Observer, Point, Role};
use coastmon_service::notify::dedup::Notifier;
use coastmon_service::notify::sink::{ConsoleSink, NotificationSink, SmsGatewaySink};

const CONFIG_PATH: &str = "coastmon.toml";

fn main() {
    dotenv::dotenv().ok();

    let config = load_config();
    logging::init_logger(
        LogLevel::from_config(&config.log.level),
        config.log.file.as_deref(),
    );
    logging::info(Component::System, None, "coastmon service starting");

    let sink = build_sink(&config);
    let mut notifier = Notifier::with_recent_cap(config.recent_log_cap);
    let mut feed = DevFeed::new();
    let observers = dev_observers();

    loop {
        let now = Utc::now();
        let snapshot = feed.next_snapshot(now);
        let emitted = notifier.reconcile(&snapshot, &observers, sink.as_ref(), now);
        logging::log_reconcile_summary(snapshot.len(), observers.len(), emitted.len());

        thread::sleep(Duration::from_secs(config.poll_interval_secs));
    }
}

fn load_config() -> ServiceConfig {
    let path = Path::new(CONFIG_PATH);
    if !path.exists() {
        return ServiceConfig::default();
    }
    match ServiceConfig::from_file(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", CONFIG_PATH, e);
            std::process::exit(1);
        }
    }
}

/// SMS gateway when configured and credentialed, console otherwise.
fn build_sink(config: &ServiceConfig) -> Box<dyn NotificationSink> {
    if let Some(gateway) = &config.sms_gateway {
        match SmsGatewaySink::new(&gateway.url, &gateway.from_number) {
            Ok(sink) => {
                logging::info(Component::Sms, None, "SMS gateway sink configured");
                return Box::new(sink);
            }
            Err(e) => {
                logging::error(
                    Component::Sms,
                    None,
                    &format!("gateway unusable, falling back to console: {}", e),
                );
            }
        }
    }
    Box::new(ConsoleSink)
}

/// Fixed observer roster for development runs: a coordinating authority
/// plus citizens in and out of the scripted hazard zones.
fn dev_observers() -> Vec<Observer> {
    vec![
        Observer {
            id: "authority-control-room".to_string(),
            role: Role::Authority,
            location: None,
            contact: Some("+911112223334".to_string()),
        },
        Observer {
            id: "citizen-surat".to_string(),
            role: Role::Public,
            location: Some(Point::new(21.12, 72.78)),
            contact: Some("+918734095603".to_string()),
        },
        Observer {
            id: "citizen-inland".to_string(),
            role: Role::Public,
            location: Some(Point::new(23.03, 72.58)), // Ahmedabad, outside every zone
            contact: Some("+919900112233".to_string()),
        },
    ]
}
