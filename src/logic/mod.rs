//! Logic Module - Classification Pipeline
//!
//! - `features/` - feature schema and the URL/DOM extractors
//! - `model/` - model description, evaluation, and the config repository
//! - `verdict/` - classification and explanation
//! - `trust` - trusted-domain allow-list
//! - `dispatcher` - per-page orchestration and the sink seam

pub mod dispatcher;
pub mod features;
pub mod model;
pub mod trust;
pub mod verdict;
