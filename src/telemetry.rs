//! Telemetry metric name constants.
//!
//! Centralised metric names for eir operations. Consumers install their own
//! `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `eir_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `status`: "ok" or "error"
//! - `outcome`: precaution lookup, "matched" or "unmatched"

/// Total `predict` calls.
///
/// Labels: `status` ("ok" | "error").
pub const PREDICTIONS_TOTAL: &str = "eir_predictions_total";

/// End-to-end `predict` duration in seconds.
pub const PREDICTION_DURATION_SECONDS: &str = "eir_prediction_duration_seconds";

/// Total precaution table lookups.
///
/// Labels: `outcome` ("matched" | "unmatched").
pub const PRECAUTION_LOOKUPS_TOTAL: &str = "eir_precaution_lookups_total";
