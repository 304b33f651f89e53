//! Snapshot diffing and at-most-once notification emission.
//!
//! The alert feed delivers the complete current alert set on every update.
//! [`Notifier::reconcile`] diffs each snapshot against the previous one by
//! alert id, applies the per-observer relevance policy to the newly appeared
//! alerts, and emits at most one [`NotificationEvent`] per
//! `(alert, observer)` pair. Correctness rests on the seen-set; the capped
//! per-observer recent log exists only for display and replay.
//!
//! All state lives on the `Notifier` instance. Independent sessions run
//! independent notifiers without interference; there are no process-wide
//! singletons here.
//!
//! # Concurrency
//! Single-writer: the caller must deliver snapshots serially. `reconcile`
//! is synchronous over in-memory state and does not block on I/O beyond the
//! fire-and-forget sink call, whose failures are logged and contained.
//!
//! # Clock injection
//! `reconcile` takes `now: DateTime<Utc>` rather than reading the clock,
//! so emission timestamps are deterministic in tests.

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{DateTime, Utc};

use crate::geofence;
use crate::logging::{self, Component};
use crate::model::{Alert, NotificationEvent, Observer, Role};
use crate::notify::sink::NotificationSink;
use crate::notify::sms;

/// Default cap on the per-observer recent-notification log.
pub const DEFAULT_RECENT_LOG_CAP: usize = 10;

/// Relevance predicate: does this newly appeared alert warrant notifying
/// this observer? Pluggable for testability; the production policy is
/// [`role_based_relevance`].
pub type RelevancePolicy = Box<dyn Fn(&Observer, &Alert) -> bool + Send>;

/// The role-based production relevance policy.
///
/// Authorities are relevant for every new alert, location or not. Public
/// observers are relevant only when their current location is contained in
/// that specific alert's region; a public observer with no known location
/// is silently skipped.
pub fn role_based_relevance(observer: &Observer, alert: &Alert) -> bool {
    match observer.role {
        Role::Authority => true,
        Role::Public => {
            geofence::severity_at(observer.location, [(&alert.region, alert.severity)]).is_some()
        }
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Stateful notification deduplicator over a snapshot-delivering alert feed.
pub struct Notifier {
    /// Alert ids present in the previously observed snapshot. `None` until
    /// the first snapshot seeds the baseline.
    baseline: Option<HashSet<String>>,
    /// Seen-set: alert id to the observer ids already notified for it.
    /// Entries are purged when the alert vanishes from the feed, so memory
    /// is bounded by the live alert set.
    seen: HashMap<String, HashSet<String>>,
    /// Per-observer FIFO log of the most recent emitted events.
    recent: HashMap<String, VecDeque<NotificationEvent>>,
    recent_cap: usize,
    relevance: RelevancePolicy,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    /// Notifier with the role-based relevance policy and the default
    /// recent-log cap.
    pub fn new() -> Self {
        Self::with_policy(DEFAULT_RECENT_LOG_CAP, Box::new(role_based_relevance))
    }

    /// Notifier with the role-based policy and an explicit recent-log cap.
    pub fn with_recent_cap(recent_cap: usize) -> Self {
        Self::with_policy(recent_cap, Box::new(role_based_relevance))
    }

    /// Fully customized notifier; lets tests substitute the relevance
    /// policy.
    pub fn with_policy(recent_cap: usize, relevance: RelevancePolicy) -> Self {
        Notifier {
            baseline: None,
            seen: HashMap::new(),
            recent: HashMap::new(),
            recent_cap,
            relevance,
        }
    }

    /// Processes one feed snapshot and returns the events emitted for it.
    ///
    /// The very first call seeds the baseline from `snapshot` and emits
    /// nothing: alerts that were already active when the service started
    /// must not flood every observer at startup.
    ///
    /// For later calls:
    /// 1. alerts absent from the previous snapshot are "appeared";
    /// 2. previous ids absent from `snapshot` are "vanished" and their
    ///    seen-set entries are purged (a later reappearance of the same id
    ///    counts as a new alert);
    /// 3. each appeared alert is tested against each observer with the
    ///    relevance policy, and every relevant unseen pair emits exactly one
    ///    event, is recorded, appended to the observer's recent log, and
    ///    handed to `sink` when the observer has a contact.
    ///
    /// Sink failures are logged and swallowed; the pair stays marked seen
    /// either way, so a flaky gateway can drop a message but can never cause
    /// a duplicate.
    pub fn reconcile(
        &mut self,
        snapshot: &[Alert],
        observers: &[Observer],
        sink: &dyn NotificationSink,
        now: DateTime<Utc>,
    ) -> Vec<NotificationEvent> {
        let current_ids: HashSet<String> = snapshot.iter().map(|a| a.id.clone()).collect();

        let Some(previous_ids) = self.baseline.take() else {
            logging::info(
                Component::Notify,
                None,
                &format!(
                    "baseline seeded with {} pre-existing alert(s), no notifications",
                    current_ids.len()
                ),
            );
            self.baseline = Some(current_ids);
            return Vec::new();
        };

        // Vanished alerts are resolved/expired: retire their dedup records.
        for gone in previous_ids.difference(&current_ids) {
            if self.seen.remove(gone).is_some() {
                logging::debug(
                    Component::Notify,
                    Some(gone),
                    "alert left the feed, seen-set entry purged",
                );
            }
        }

        let mut emitted = Vec::new();
        for alert in snapshot {
            if previous_ids.contains(&alert.id) {
                continue; // same id as last snapshot: not "appeared"
            }
            for observer in observers {
                if !(self.relevance)(observer, alert) {
                    continue;
                }
                let notified = self.seen.entry(alert.id.clone()).or_default();
                if !notified.insert(observer.id.clone()) {
                    continue; // already notified for this pair
                }

                let event = NotificationEvent {
                    id: format!("notif-{}-{}", alert.id, observer.id),
                    alert_id: alert.id.clone(),
                    observer_id: observer.id.clone(),
                    severity: alert.severity,
                    emitted_at_ms: now.timestamp_millis(),
                };
                self.push_recent(&observer.id, event.clone());
                deliver(sink, observer, alert);
                emitted.push(event);
            }
        }

        self.baseline = Some(current_ids);
        emitted
    }

    /// The most recent events for an observer, oldest first, capped at the
    /// configured log size.
    pub fn recent_events(&self, observer_id: &str) -> Vec<&NotificationEvent> {
        self.recent
            .get(observer_id)
            .map(|log| log.iter().collect())
            .unwrap_or_default()
    }

    fn push_recent(&mut self, observer_id: &str, event: NotificationEvent) {
        let log = self.recent.entry(observer_id.to_string()).or_default();
        log.push_back(event);
        while log.len() > self.recent_cap {
            log.pop_front();
        }
    }
}

/// Best-effort sink invocation. Failure is reported through the logging
/// side channel only and never rolls back the seen marking.
fn deliver(sink: &dyn NotificationSink, observer: &Observer, alert: &Alert) {
    let Some(contact) = &observer.contact else {
        return;
    };
    let text = sms::format_alert_sms(alert);
    if let Err(err) = sink.send(contact, &text) {
        logging::warn(
            Component::Notify,
            Some(&alert.id),
            &format!(
                "delivery to observer {} failed, seen marking kept: {}",
                observer.id, err
            ),
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
