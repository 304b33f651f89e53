//! Notification pipeline for the coastal threat monitoring service.
//!
//! Submodules:
//! - `dedup` — snapshot diffing and at-most-once notification emission.
//! - `sink` — the outbound delivery boundary (console, SMS gateway).
//! - `sms` — SMS text formatting (truncation, call-to-action suffixes).

pub mod dedup;
pub mod sink;
pub mod sms;
