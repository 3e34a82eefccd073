//! Drift policy definitions.

pub mod v1;
pub mod scoring;

pub use v1::{DriftPolicy, DRIFT_MIN_OVERLAP, MUST_PRESERVE_TOKENS};
pub use scoring::{DriftReport, too_much_drift, too_much_drift_with};
