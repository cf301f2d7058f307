//! Features Module - Feature Extraction Engine
//!
//! Lexical (URL) and structural (DOM) feature extraction, plus the shared
//! schema both sides write through. Extractors are pure functions with no
//! shared state; fusion is a record merge.

pub mod dom;
pub mod layout;
pub mod record;
pub mod url;

#[cfg(test)]
mod tests;

// Re-export common types
pub use dom::{extract_dom_features, DomElement, DomSnapshot};
pub use layout::{feature_index, feature_name, FEATURE_COUNT, FEATURE_LAYOUT, URL_FEATURE_COUNT};
pub use record::FeatureRecord;
pub use url::{extract_url_features, UrlFeatureSet};
