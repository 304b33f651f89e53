//! Core data types for the coastal threat monitoring service.
//!
//! This module defines the shared domain model imported by all other modules.
//! It contains no I/O and no external service dependencies — only types,
//! their construction-time validation, and the error taxonomy.

use std::fmt;

// ---------------------------------------------------------------------------
// Geographic primitives
// ---------------------------------------------------------------------------

/// A WGS84 latitude/longitude pair, in degrees. No altitude.
///
/// The feed delivers coordinates in two spellings (`[lat, lng]` tuples and
/// `{lat, lng}` objects); both are normalized into this single value type by
/// `ingest::feed` before anything reaches the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub fn new(lat: f64, lng: f64) -> Self {
        Point { lat, lng }
    }
}

/// A geofenced hazard zone: a circle around a center point, or a closed
/// polygon over ≥3 distinct vertices.
///
/// Regions can only be built through [`HazardRegion::circle`] and
/// [`HazardRegion::polygon`], which reject malformed geometry up front.
/// Downstream containment tests (`geofence`) therefore never have to defend
/// against a zero-radius circle or a degenerate polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct HazardRegion {
    kind: RegionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RegionKind {
    Circle { center: Point, radius_m: f64 },
    Polygon { vertices: Vec<Point> },
}

impl HazardRegion {
    /// Builds a circular region.
    ///
    /// Fails with [`ValidationError::NonPositiveRadius`] unless
    /// `radius_m > 0`, and with [`ValidationError::NonFiniteCoordinate`] if
    /// the center contains NaN or infinity.
    pub fn circle(center: Point, radius_m: f64) -> Result<Self, ValidationError> {
        if !center.lat.is_finite() || !center.lng.is_finite() {
            return Err(ValidationError::NonFiniteCoordinate);
        }
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(ValidationError::NonPositiveRadius(radius_m));
        }
        Ok(HazardRegion {
            kind: RegionKind::Circle { center, radius_m },
        })
    }

    /// Builds a polygonal region from an implicitly-closed vertex ring.
    ///
    /// Fails with [`ValidationError::DegeneratePolygon`] unless the ring has
    /// at least 3 distinct vertices. A trailing vertex equal to the first is
    /// tolerated (common in exported ring data) and dropped.
    pub fn polygon(vertices: Vec<Point>) -> Result<Self, ValidationError> {
        let mut ring = vertices;
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.iter().any(|p| !p.lat.is_finite() || !p.lng.is_finite()) {
            return Err(ValidationError::NonFiniteCoordinate);
        }
        let mut distinct: Vec<Point> = Vec::with_capacity(ring.len());
        for p in &ring {
            if !distinct.contains(p) {
                distinct.push(*p);
            }
        }
        if distinct.len() < 3 {
            return Err(ValidationError::DegeneratePolygon(distinct.len()));
        }
        Ok(HazardRegion {
            kind: RegionKind::Polygon { vertices: ring },
        })
    }

    pub(crate) fn kind(&self) -> &RegionKind {
        &self.kind
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Threat severity levels, in ascending order.
///
/// The derived `Ord` carries the escalation order used everywhere:
///   Warning < Alert < Emergency
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum Severity {
    Warning,
    Alert,
    Emergency,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "Warning"),
            Severity::Alert => write!(f, "Alert"),
            Severity::Emergency => write!(f, "Emergency"),
        }
    }
}

// ---------------------------------------------------------------------------
// Alerts and observers
// ---------------------------------------------------------------------------

/// A published threat alert covering a hazard region.
///
/// Alerts are immutable once created. They leave the system by vanishing
/// from a later feed snapshot, which the deduplicator treats as
/// resolved/expired.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub id: String,
    /// Free-form hazard type label, e.g. "Cyclone Alert" or "Oil Spill".
    pub kind: String,
    pub severity: Severity,
    pub region: HazardRegion,
    pub created_at_ms: i64,
    pub message: Option<String>,
    pub author_id: Option<String>,
}

/// Observer role, which selects the relevance policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Role {
    /// Authorities are notified of every new alert regardless of location.
    Authority,
    /// Citizens are notified only when their current location falls inside
    /// the alert's region.
    Public,
}

/// A notification recipient.
///
/// `location` may change between reconciliations; the deduplicator always
/// reads the value supplied on the current call, never a cached one. An
/// observer with no `contact` still receives events in its recent log — it
/// just has nowhere to deliver an SMS.
#[derive(Debug, Clone, PartialEq)]
pub struct Observer {
    pub id: String,
    pub role: Role,
    pub location: Option<Point>,
    /// Contact reference for the external sink, e.g. a phone number.
    pub contact: Option<String>,
}

// ---------------------------------------------------------------------------
// Notification events
// ---------------------------------------------------------------------------

/// One emitted notification, append-only.
///
/// At most one event is ever emitted for a given `(alert_id, observer_id)`
/// pair for the lifetime of that alert in the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationEvent {
    pub id: String,
    pub alert_id: String,
    pub observer_id: String,
    pub severity: Severity,
    pub emitted_at_ms: i64,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Malformed region geometry, rejected at construction time.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Circle radius was zero, negative, or not finite.
    NonPositiveRadius(f64),
    /// Polygon had fewer than 3 distinct vertices (count given).
    DegeneratePolygon(usize),
    /// A latitude or longitude was NaN or infinite.
    NonFiniteCoordinate,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NonPositiveRadius(r) => {
                write!(f, "circle radius must be positive, got {}", r)
            }
            ValidationError::DegeneratePolygon(n) => {
                write!(f, "polygon needs at least 3 distinct vertices, got {}", n)
            }
            ValidationError::NonFiniteCoordinate => {
                write!(f, "coordinate is NaN or infinite")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// External notification sink failure.
///
/// Contained within the deduplicator: logged, never propagated through
/// `reconcile`, and never rolls back the seen-set marking.
#[derive(Debug)]
pub enum DeliveryError {
    /// Non-2xx response from the gateway.
    Http(u16),
    /// Request could not be sent at all.
    Transport(String),
    /// Sink is not configured (e.g. missing credentials).
    NotConfigured(String),
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::Http(code) => write!(f, "gateway HTTP error: {}", code),
            DeliveryError::Transport(msg) => write!(f, "delivery transport error: {}", msg),
            DeliveryError::NotConfigured(msg) => write!(f, "sink not configured: {}", msg),
        }
    }
}

impl std::error::Error for DeliveryError {}

/// Errors arising while parsing a feed snapshot into validated alerts.
#[derive(Debug)]
pub enum FeedError {
    /// The snapshot body could not be deserialized.
    Parse(String),
    /// A record carried an unknown severity label.
    UnknownSeverity { alert_id: String, label: String },
    /// A record carried an unknown region type label.
    UnknownRegionType { alert_id: String, label: String },
    /// A record's coordinates did not match its declared region type.
    CoordinateShape { alert_id: String, detail: String },
    /// A record's region failed geometric validation.
    InvalidRegion {
        alert_id: String,
        source: ValidationError,
    },
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedError::Parse(msg) => write!(f, "snapshot parse error: {}", msg),
            FeedError::UnknownSeverity { alert_id, label } => {
                write!(f, "alert {}: unknown severity '{}'", alert_id, label)
            }
            FeedError::UnknownRegionType { alert_id, label } => {
                write!(f, "alert {}: unknown region type '{}'", alert_id, label)
            }
            FeedError::CoordinateShape { alert_id, detail } => {
                write!(f, "alert {}: {}", alert_id, detail)
            }
            FeedError::InvalidRegion { alert_id, source } => {
                write!(f, "alert {}: invalid region: {}", alert_id, source)
            }
        }
    }
}

impl std::error::Error for FeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FeedError::InvalidRegion { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering_is_warning_alert_emergency() {
        assert!(Severity::Warning < Severity::Alert);
        assert!(Severity::Alert < Severity::Emergency);
        assert_eq!(
            [Severity::Emergency, Severity::Warning, Severity::Alert]
                .iter()
                .max(),
            Some(&Severity::Emergency)
        );
    }

    #[test]
    fn test_circle_with_positive_radius_is_valid() {
        let region = HazardRegion::circle(Point::new(21.0, 72.0), 5000.0);
        assert!(region.is_ok());
    }

    #[test]
    fn test_circle_with_zero_radius_is_rejected() {
        let err = HazardRegion::circle(Point::new(21.0, 72.0), 0.0)
            .expect_err("zero radius must fail validation");
        assert_eq!(err, ValidationError::NonPositiveRadius(0.0));
    }

    #[test]
    fn test_circle_with_negative_radius_is_rejected() {
        let err = HazardRegion::circle(Point::new(21.0, 72.0), -250.0)
            .expect_err("negative radius must fail validation");
        assert_eq!(err, ValidationError::NonPositiveRadius(-250.0));
    }

    #[test]
    fn test_circle_with_nan_center_is_rejected() {
        let err = HazardRegion::circle(Point::new(f64::NAN, 72.0), 100.0)
            .expect_err("NaN latitude must fail validation");
        assert_eq!(err, ValidationError::NonFiniteCoordinate);
    }

    #[test]
    fn test_polygon_with_three_distinct_vertices_is_valid() {
        let region = HazardRegion::polygon(vec![
            Point::new(21.0, 72.0),
            Point::new(21.1, 72.0),
            Point::new(21.0, 72.1),
        ]);
        assert!(region.is_ok());
    }

    #[test]
    fn test_polygon_with_two_vertices_is_rejected() {
        let err = HazardRegion::polygon(vec![Point::new(21.0, 72.0), Point::new(21.1, 72.0)])
            .expect_err("two-vertex polygon must fail validation");
        assert_eq!(err, ValidationError::DegeneratePolygon(2));
    }

    #[test]
    fn test_polygon_with_repeated_vertices_is_rejected() {
        // Three vertices on paper but only two distinct — still degenerate.
        let p = Point::new(21.0, 72.0);
        let err = HazardRegion::polygon(vec![p, p, Point::new(21.1, 72.0)])
            .expect_err("duplicate vertices must not count toward the minimum");
        assert_eq!(err, ValidationError::DegeneratePolygon(2));
    }

    #[test]
    fn test_polygon_tolerates_explicitly_closed_ring() {
        // GeoJSON-style rings repeat the first vertex at the end; that
        // trailing duplicate must not trip the distinct-vertex check.
        let region = HazardRegion::polygon(vec![
            Point::new(21.0, 72.0),
            Point::new(21.1, 72.0),
            Point::new(21.0, 72.1),
            Point::new(21.0, 72.0),
        ]);
        assert!(region.is_ok(), "closed ring should be accepted: {:?}", region);
    }

    #[test]
    fn test_validation_error_messages_are_descriptive() {
        let msg = ValidationError::DegeneratePolygon(1).to_string();
        assert!(msg.contains("3 distinct vertices"), "got '{}'", msg);
    }
}
