//! End-to-end notification flow: raw feed JSON through ingest, geofence
//! relevance, and the deduplicator, across a realistic snapshot sequence.

use chrono::{DateTime, TimeZone, Utc};
use std::sync::Mutex;

use coastmon_service::ingest::feed::parse_snapshot;
use coastmon_service::model::{DeliveryError, Observer, Point, Role, Severity};
use coastmon_service::notify::dedup::Notifier;
use coastmon_service::notify::sink::NotificationSink;

/// Sink that records delivered texts, shared-state safe for completeness.
struct CapturingSink {
    deliveries: Mutex<Vec<(String, String)>>,
}

impl CapturingSink {
    fn new() -> Self {
        CapturingSink {
            deliveries: Mutex::new(Vec::new()),
        }
    }

    fn texts(&self) -> Vec<String> {
        self.deliveries
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }
}

impl NotificationSink for CapturingSink {
    fn send(&self, contact: &str, text: &str) -> Result<(), DeliveryError> {
        self.deliveries
            .lock()
            .unwrap()
            .push((contact.to_string(), text.to_string()));
        Ok(())
    }
}

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap()
}

/// The 5 km circle alert from the coastal scenario, as raw feed JSON.
fn snapshot_json(ids: &[&str]) -> String {
    let records: Vec<String> = ids
        .iter()
        .map(|id| {
            format!(
                r#"{{
                    "id": "{}",
                    "type": "Cyclone Alert",
                    "level": "Alert",
                    "location": {{ "type": "circle", "coords": [21.0, 72.0], "radius": 5000 }},
                    "timestamp": 1714568400000,
                    "message": "Heavy rains expected.",
                    "createdBy": "authority-1"
                }}"#,
                id
            )
        })
        .collect();
    format!("[{}]", records.join(","))
}

fn observers() -> Vec<Observer> {
    vec![
        Observer {
            id: "auth-1".to_string(),
            role: Role::Authority,
            location: None,
            contact: Some("+911112223334".to_string()),
        },
        // ~3.3 km from the circle center: inside.
        Observer {
            id: "cit-near".to_string(),
            role: Role::Public,
            location: Some(Point::new(21.03, 72.0)),
            contact: Some("+918734095603".to_string()),
        },
        // ~11 km away: outside.
        Observer {
            id: "cit-far".to_string(),
            role: Role::Public,
            location: Some(Point::new(21.10, 72.0)),
            contact: Some("+919900112233".to_string()),
        },
    ]
}

#[test]
fn snapshot_sequence_notifies_only_for_appearances() {
    let mut notifier = Notifier::new();
    let sink = CapturingSink::new();
    let observers = observers();

    // Bootstrap: {A1} exists before the service starts. No notifications.
    let snapshot1 = parse_snapshot(&snapshot_json(&["A1"])).expect("snapshot1 parses");
    let events = notifier.reconcile(&snapshot1, &observers, &sink, fixed_now());
    assert!(events.is_empty(), "bootstrap must be silent");

    // {A1, A2}: only A2 appeared. Authority and the nearby citizen match;
    // the far citizen does not.
    let snapshot2 = parse_snapshot(&snapshot_json(&["A1", "A2"])).expect("snapshot2 parses");
    let events = notifier.reconcile(&snapshot2, &observers, &sink, fixed_now());
    assert_eq!(events.len(), 2, "A2 notifies auth-1 and cit-near only");
    assert!(events.iter().all(|e| e.alert_id == "A2"));
    let mut notified: Vec<_> = events.iter().map(|e| e.observer_id.as_str()).collect();
    notified.sort_unstable();
    assert_eq!(notified, ["auth-1", "cit-near"]);
    assert_eq!(events[0].severity, Severity::Alert);

    // {A2}: A1 vanished, nothing appeared. No events; A1's dedup record is
    // purged.
    let snapshot3 = parse_snapshot(&snapshot_json(&["A2"])).expect("snapshot3 parses");
    let events = notifier.reconcile(&snapshot3, &observers, &sink, fixed_now());
    assert!(events.is_empty(), "a vanish-only snapshot must emit nothing");

    // A1 returns under the same id: a fresh appearance, so it notifies.
    let snapshot4 = parse_snapshot(&snapshot_json(&["A1", "A2"])).expect("snapshot4 parses");
    let events = notifier.reconcile(&snapshot4, &observers, &sink, fixed_now());
    assert_eq!(events.len(), 2, "purged A1 must notify again on reappearance");
    assert!(events.iter().all(|e| e.alert_id == "A1"));
}

#[test]
fn delivered_sms_text_carries_level_type_and_call_to_action() {
    let mut notifier = Notifier::new();
    let sink = CapturingSink::new();
    let observers = observers();

    notifier.reconcile(&[], &observers, &sink, fixed_now());
    let snapshot = parse_snapshot(&snapshot_json(&["A1"])).expect("snapshot parses");
    notifier.reconcile(&snapshot, &observers, &sink, fixed_now());

    let texts = sink.texts();
    assert_eq!(texts.len(), 2, "auth-1 and cit-near each get one SMS");
    for text in &texts {
        assert_eq!(
            text,
            "ALERT: Cyclone Alert - Heavy rains expected. Take immediate action."
        );
        assert!(text.len() <= 160, "SMS must fit one segment");
    }
}

#[test]
fn recent_log_reflects_emission_order_per_observer() {
    let mut notifier = Notifier::new();
    let sink = CapturingSink::new();
    let observers = observers();

    notifier.reconcile(&[], &observers, &sink, fixed_now());
    for ids in [
        vec!["A1"],
        vec!["A1", "A2"],
        vec!["A1", "A2", "A3"],
    ] {
        let snapshot = parse_snapshot(&snapshot_json(&ids)).expect("snapshot parses");
        notifier.reconcile(&snapshot, &observers, &sink, fixed_now());
    }

    let log: Vec<_> = notifier
        .recent_events("auth-1")
        .iter()
        .map(|e| e.alert_id.clone())
        .collect();
    assert_eq!(log, ["A1", "A2", "A3"], "oldest first, in emission order");

    let far_log = notifier.recent_events("cit-far");
    assert!(
        far_log.is_empty(),
        "an observer outside every region accumulates no history"
    );
}

#[test]
fn emitted_timestamps_come_from_the_injected_clock() {
    let mut notifier = Notifier::new();
    let sink = CapturingSink::new();
    let observers = observers();

    notifier.reconcile(&[], &observers, &sink, fixed_now());
    let later = Utc.with_ymd_and_hms(2024, 5, 1, 13, 15, 0).unwrap();
    let snapshot = parse_snapshot(&snapshot_json(&["A1"])).expect("snapshot parses");
    let events = notifier.reconcile(&snapshot, &observers, &sink, later);

    assert!(!events.is_empty());
    for event in &events {
        assert_eq!(event.emitted_at_ms, later.timestamp_millis());
    }
}
