//! Verdict Module - classification and explanation
//!
//! `types` holds the data shapes, `rules` the explanation thresholds,
//! `classifier` the decision logic.

pub mod classifier;
pub mod rules;
pub mod types;

// Re-export common types
pub use classifier::{classify, explain};
pub use types::{Verdict, VerdictLabel};
