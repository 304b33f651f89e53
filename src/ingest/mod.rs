//! Feed ingestion adapters.
//!
//! The core consumes validated [`crate::model::Alert`] values only. This
//! module owns the boundary where raw feed documents are deserialized,
//! their coordinate spellings unified, and malformed records rejected.
//!
//! Submodules:
//! - `feed` — JSON snapshot parsing and normalization.

pub mod feed;
