//! Coastal threat monitoring service.
//!
//! Authorities publish geofenced threat alerts; citizens are notified when
//! their location intersects an active hazard zone. This crate holds the
//! containment and notification engine behind that flow:
//!
//! - [`geofence`] decides whether a point lies inside a hazard region and
//!   resolves the highest severity at a location.
//! - [`notify`] diffs successive alert-feed snapshots and emits at most one
//!   notification per (alert, observer) pair, delivering through a
//!   pluggable sink.
//! - [`ingest`] normalizes raw feed documents into validated model types.
//!
//! Persistence, authentication, and rendering are external collaborators;
//! the crate consumes alert snapshots plus observer records and produces
//! notification events.

pub mod config;
pub mod dev_mode;
pub mod geofence;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod notify;
