//! Central Configuration Constants
//!
//! Single source of truth for configuration defaults. The embedding process
//! points the core at its packaged resources through the environment
//! overrides; the defaults match the extension bundle layout.

use std::path::PathBuf;

/// Default model file (relative to the working directory)
pub const DEFAULT_MODEL_PATH: &str = "resources/model.json";

/// Default allow-list file
pub const DEFAULT_ALLOWLIST_PATH: &str = "resources/allowlist.json";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Phishing Guard";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model file path from environment or use default
pub fn model_path() -> PathBuf {
    std::env::var("PHISHGUARD_MODEL_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH))
}

/// Get allow-list file path from environment or use default
pub fn allowlist_path() -> PathBuf {
    std::env::var("PHISHGUARD_ALLOWLIST_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_ALLOWLIST_PATH))
}
