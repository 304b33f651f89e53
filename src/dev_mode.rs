//! Development mode: a scripted alert feed for running the service without
//! a live upstream store.
//!
//! Each tick yields the complete current alert set, exactly as the real
//! feed would, so the notifier's snapshot diffing is exercised end to end:
//! alerts appear over several ticks, then resolve and vanish, then the
//! cycle repeats. The script is deterministic so two runs produce the same
//! notification sequence.
//!
//! The catalogue and coordinates mirror the hazards this service is
//! deployed for on the Gujarat coast.

use chrono::{DateTime, Utc};

use crate::model::{Alert, HazardRegion, Point, Severity};

/// One scripted hazard that enters and leaves the feed on fixed ticks.
struct ScriptedHazard {
    id: &'static str,
    kind: &'static str,
    severity: Severity,
    /// Tick (within the cycle) on which the alert first appears.
    appears_at: usize,
    /// Tick on which the alert is resolved and vanishes.
    resolves_at: usize,
    region: fn() -> HazardRegion,
    message: &'static str,
}

const CYCLE_TICKS: usize = 8;

fn surat_cyclone_region() -> HazardRegion {
    HazardRegion::circle(Point::new(21.10, 72.75), 20_000.0).expect("scripted region is valid")
}

fn veraval_surf_region() -> HazardRegion {
    HazardRegion::circle(Point::new(20.91, 70.36), 8_000.0).expect("scripted region is valid")
}

fn kutch_spill_region() -> HazardRegion {
    // Slick drifting along the Gulf of Kutch shoreline, polygon fence.
    HazardRegion::polygon(vec![
        Point::new(22.40, 69.00),
        Point::new(22.55, 69.05),
        Point::new(22.52, 69.25),
        Point::new(22.38, 69.20),
    ])
    .expect("scripted region is valid")
}

fn bhavnagar_bloom_region() -> HazardRegion {
    HazardRegion::circle(Point::new(21.78, 72.20), 12_000.0).expect("scripted region is valid")
}

static SCRIPT: &[ScriptedHazard] = &[
    ScriptedHazard {
        id: "dev-cyclone-surat",
        kind: "Cyclone Alert",
        severity: Severity::Emergency,
        appears_at: 0,
        resolves_at: 6,
        region: surat_cyclone_region,
        message: "Heavy rains and strong winds expected. Evacuate low-lying areas.",
    },
    ScriptedHazard {
        id: "dev-surf-veraval",
        kind: "High Surf Advisory",
        severity: Severity::Warning,
        appears_at: 1,
        resolves_at: 5,
        region: veraval_surf_region,
        message: "Swells of 3-4 m near the fishing harbour.",
    },
    ScriptedHazard {
        id: "dev-spill-kutch",
        kind: "Oil Spill",
        severity: Severity::Alert,
        appears_at: 2,
        resolves_at: 7,
        region: kutch_spill_region,
        message: "Slick reported near Narara Marine Park.",
    },
    ScriptedHazard {
        id: "dev-bloom-bhavnagar",
        kind: "Algal Bloom",
        severity: Severity::Warning,
        appears_at: 3,
        resolves_at: 7,
        region: bhavnagar_bloom_region,
        message: "Discoloured water off the Ghogha coast.",
    },
];

/// Deterministic replay feed.
pub struct DevFeed {
    tick: usize,
}

impl DevFeed {
    pub fn new() -> Self {
        DevFeed { tick: 0 }
    }

    /// Returns the full alert set for the current tick and advances the
    /// script. `now` stamps the creation time of alerts appearing this tick.
    pub fn next_snapshot(&mut self, now: DateTime<Utc>) -> Vec<Alert> {
        let phase = self.tick % CYCLE_TICKS;
        let snapshot = SCRIPT
            .iter()
            .filter(|h| phase >= h.appears_at && phase < h.resolves_at)
            .map(|h| Alert {
                // Cycle index keeps ids unique across cycles, so a repeated
                // run of the script is a genuinely new set of alerts.
                id: format!("{}-{}", h.id, self.tick / CYCLE_TICKS),
                kind: h.kind.to_string(),
                severity: h.severity,
                region: (h.region)(),
                created_at_ms: now.timestamp_millis(),
                message: Some(h.message.to_string()),
                author_id: Some("dev-script".to_string()),
            })
            .collect();
        self.tick += 1;
        snapshot
    }
}

impl Default for DevFeed {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap()
    }

    #[test]
    fn test_script_grows_then_shrinks_within_a_cycle() {
        let mut feed = DevFeed::new();
        let sizes: Vec<usize> = (0..CYCLE_TICKS)
            .map(|_| feed.next_snapshot(fixed_now()).len())
            .collect();
        assert_eq!(sizes, [1, 2, 3, 4, 4, 3, 2, 0]);
    }

    #[test]
    fn test_ids_differ_between_cycles() {
        let mut feed = DevFeed::new();
        let first_cycle_first = feed.next_snapshot(fixed_now());
        for _ in 1..CYCLE_TICKS {
            feed.next_snapshot(fixed_now());
        }
        let second_cycle_first = feed.next_snapshot(fixed_now());
        assert_ne!(
            first_cycle_first[0].id, second_cycle_first[0].id,
            "a new cycle must publish fresh alert ids"
        );
    }

    #[test]
    fn test_two_feeds_replay_identically() {
        let mut a = DevFeed::new();
        let mut b = DevFeed::new();
        for _ in 0..2 * CYCLE_TICKS {
            assert_eq!(a.next_snapshot(fixed_now()), b.next_snapshot(fixed_now()));
        }
    }
}
