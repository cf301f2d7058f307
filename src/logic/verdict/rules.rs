//! Explanation Rule Thresholds
//!
//! Constants for the ordered reason rules; the rule evaluation itself lives
//! in `classifier.rs`. Reasons are informational only and never feed back
//! into the verdict.

/// URL length above which the length reason fires
pub const LONG_URL_THRESHOLD: f64 = 75.0;

/// '&' count above which the parameter reason fires
pub const AMPERSAND_THRESHOLD: f64 = 4.0;

/// External-resource ratio above which the resource reason fires
pub const EXTERNAL_RESOURCE_THRESHOLD: f64 = 0.7;

/// Reason reported when the model flags a page but no single rule fires
pub const FALLBACK_REASON: &str = "Model score is high";
