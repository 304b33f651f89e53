//! Alert feed snapshot parsing.
//!
//! The upstream store publishes alert documents shaped like:
//!
//! ```json
//! {
//!   "id": "a1",
//!   "type": "Cyclone Alert",
//!   "level": "Emergency",
//!   "location": { "type": "circle", "coords": [21.0, 72.0], "radius": 5000 },
//!   "timestamp": 1714568400000,
//!   "message": "Heavy rains expected.",
//!   "createdBy": "authority-1"
//! }
//! ```
//!
//! Historically the feed has carried coordinates both as `[lat, lng]` tuples
//! and as `{"lat": .., "lng": ..}` objects; both spellings are accepted here
//! and normalized to [`Point`] so nothing downstream ever sees the raw
//! shapes. Region geometry is validated during normalization: a record with
//! a non-positive radius or a degenerate polygon is rejected before it can
//! reach the evaluator.

use serde::Deserialize;

use crate::logging::{self, Component};
use crate::model::{Alert, FeedError, HazardRegion, Point, Severity};

// ---------------------------------------------------------------------------
// Raw feed document shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawAlert {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    level: String,
    location: RawRegion,
    timestamp: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "createdBy")]
    created_by: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRegion {
    #[serde(rename = "type")]
    kind: String,
    coords: RawCoords,
    #[serde(default)]
    radius: Option<f64>,
}

/// One coordinate in either feed spelling.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum RawPoint {
    Tuple([f64; 2]),
    Object { lat: f64, lng: f64 },
}

impl From<RawPoint> for Point {
    fn from(raw: RawPoint) -> Self {
        match raw {
            RawPoint::Tuple([lat, lng]) => Point::new(lat, lng),
            RawPoint::Object { lat, lng } => Point::new(lat, lng),
        }
    }
}

/// Circle documents carry a single coordinate, polygon documents a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCoords {
    One(RawPoint),
    Many(Vec<RawPoint>),
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parses a full snapshot (JSON array of alert documents) into validated
/// alerts. Strict: the first malformed record fails the whole snapshot.
pub fn parse_snapshot(json: &str) -> Result<Vec<Alert>, FeedError> {
    let raw: Vec<RawAlert> =
        serde_json::from_str(json).map_err(|e| FeedError::Parse(e.to_string()))?;
    raw.into_iter().map(normalize_alert).collect()
}

/// Lossy variant for live operation: malformed records are logged and
/// skipped so one bad document cannot blind the whole feed.
pub fn parse_snapshot_lossy(json: &str) -> Result<Vec<Alert>, FeedError> {
    let raw: Vec<RawAlert> =
        serde_json::from_str(json).map_err(|e| FeedError::Parse(e.to_string()))?;
    let mut alerts = Vec::with_capacity(raw.len());
    for record in raw {
        let id = record.id.clone();
        match normalize_alert(record) {
            Ok(alert) => alerts.push(alert),
            Err(err) => {
                logging::warn(
                    Component::Feed,
                    Some(&id),
                    &format!("rejected feed record: {}", err),
                );
            }
        }
    }
    Ok(alerts)
}

fn normalize_alert(raw: RawAlert) -> Result<Alert, FeedError> {
    let severity = parse_severity(&raw.level).ok_or_else(|| FeedError::UnknownSeverity {
        alert_id: raw.id.clone(),
        label: raw.level.clone(),
    })?;
    let region = normalize_region(&raw.id, raw.location)?;
    Ok(Alert {
        id: raw.id,
        kind: raw.kind,
        severity,
        region,
        created_at_ms: raw.timestamp,
        message: raw.message,
        author_id: raw.created_by,
    })
}

fn parse_severity(label: &str) -> Option<Severity> {
    match label {
        "Warning" => Some(Severity::Warning),
        "Alert" => Some(Severity::Alert),
        "Emergency" => Some(Severity::Emergency),
        _ => None,
    }
}

fn normalize_region(alert_id: &str, raw: RawRegion) -> Result<HazardRegion, FeedError> {
    match raw.kind.as_str() {
        "circle" => {
            let center: Point = match raw.coords {
                RawCoords::One(p) => p.into(),
                RawCoords::Many(_) => {
                    return Err(FeedError::CoordinateShape {
                        alert_id: alert_id.to_string(),
                        detail: "circle region carries a coordinate list".to_string(),
                    });
                }
            };
            let radius = raw.radius.ok_or_else(|| FeedError::CoordinateShape {
                alert_id: alert_id.to_string(),
                detail: "circle region is missing its radius".to_string(),
            })?;
            HazardRegion::circle(center, radius).map_err(|source| FeedError::InvalidRegion {
                alert_id: alert_id.to_string(),
                source,
            })
        }
        "polygon" => {
            let vertices: Vec<Point> = match raw.coords {
                RawCoords::Many(points) => points.into_iter().map(Point::from).collect(),
                RawCoords::One(_) => {
                    return Err(FeedError::CoordinateShape {
                        alert_id: alert_id.to_string(),
                        detail: "polygon region carries a single coordinate".to_string(),
                    });
                }
            };
            HazardRegion::polygon(vertices).map_err(|source| FeedError::InvalidRegion {
                alert_id: alert_id.to_string(),
                source,
            })
        }
        other => Err(FeedError::UnknownRegionType {
            alert_id: alert_id.to_string(),
            label: other.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
