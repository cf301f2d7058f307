//! Model Module - statistical model description and evaluation
//!
//! The two model families share one descriptor type; evaluation is selected
//! by variant, once, at load. The repository owns the resolve-once loads.

pub mod descriptor;
pub mod evaluate;
pub mod repository;

// Re-export common types
pub use descriptor::{ForestModel, LinearModel, ModelDescriptor, TreeNode};
pub use evaluate::sigmoid;
pub use repository::{get_status, ModelStatus};
