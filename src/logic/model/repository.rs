//! Model Repository - resolve-once configuration loads
//!
//! The model and the allow-list load lazily on first use; concurrent first
//! callers share the single in-flight load. Load failures degrade rather
//! than propagate: no model means every page classifies safe, no allow-list
//! means no domain is trusted.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

use crate::constants;
use crate::error::{ConfigError, ConfigResult};
use crate::logic::features::layout::{layout_hash, FEATURE_VERSION};
use crate::logic::trust::AllowList;

use super::descriptor::ModelDescriptor;

// ============================================================================
// STATE
// ============================================================================

static MODEL: OnceCell<Option<Arc<ModelDescriptor>>> = OnceCell::const_new();
static ALLOWLIST: OnceCell<Arc<AllowList>> = OnceCell::const_new();

/// Model status for the UI surface
static MODEL_STATUS: RwLock<Option<ModelStatus>> = RwLock::new(None);

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Repository status for UI/diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStatus {
    pub model_loaded: bool,
    pub model_kind: String,
    pub feature_version: u8,
    pub layout_hash: u32,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Default for ModelStatus {
    fn default() -> Self {
        Self {
            model_loaded: false,
            model_kind: "none".to_string(),
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            loaded_at: None,
        }
    }
}

// ============================================================================
// SHARED HANDLES
// ============================================================================

/// The active model, if one loaded. First call triggers the load; later and
/// concurrent callers await the same resolution.
pub async fn model() -> Option<Arc<ModelDescriptor>> {
    MODEL
        .get_or_init(|| async {
            let path = constants::model_path();
            match load_model(&path).await {
                Ok(descriptor) => {
                    *MODEL_STATUS.write() = Some(ModelStatus {
                        model_loaded: true,
                        model_kind: descriptor.kind().to_string(),
                        loaded_at: Some(Utc::now()),
                        ..Default::default()
                    });
                    Some(Arc::new(descriptor))
                }
                Err(e) => {
                    log::warn!("model unavailable ({}), classification fails open to safe", e);
                    *MODEL_STATUS.write() = Some(ModelStatus::default());
                    None
                }
            }
        })
        .await
        .clone()
}

/// The trusted-domain allow-list; empty when the load failed.
pub async fn allowlist() -> Arc<AllowList> {
    ALLOWLIST
        .get_or_init(|| async {
            let path = constants::allowlist_path();
            match load_allowlist(&path).await {
                Ok(list) => Arc::new(list),
                Err(e) => {
                    log::warn!("allow-list unavailable ({}), trusting no domain", e);
                    Arc::new(AllowList::empty())
                }
            }
        })
        .await
        .clone()
}

/// Current repository status (defaults to "not loaded" before first use).
pub fn get_status() -> ModelStatus {
    MODEL_STATUS.read().clone().unwrap_or_default()
}

// ============================================================================
// LOADERS
// ============================================================================

/// Read, parse, and validate a model file.
pub async fn load_model(path: &Path) -> ConfigResult<ModelDescriptor> {
    let bytes = tokio::fs::read(path).await.map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let descriptor: ModelDescriptor =
        serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    descriptor.validate().map_err(ConfigError::InvalidModel)?;

    let unknown = descriptor.unknown_columns();
    if !unknown.is_empty() {
        log::warn!(
            "model references {} column(s) outside the feature schema (they read as 0): {:?}",
            unknown.len(),
            unknown
        );
    }

    log::info!(
        "model loaded from {}: type={}, schema v{} ({:08x})",
        path.display(),
        descriptor.kind(),
        FEATURE_VERSION,
        layout_hash()
    );
    Ok(descriptor)
}

/// Read an allow-list file: a flat JSON array of domain strings.
pub async fn load_allowlist(path: &Path) -> ConfigResult<AllowList> {
    let bytes = tokio::fs::read(path).await.map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let domains: Vec<String> =
        serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let list = AllowList::from_domains(domains);
    log::info!(
        "allow-list loaded from {}: {} domain(s)",
        path.display(),
        list.len()
    );
    Ok(list)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_model_ok() {
        let file = write_temp(
            r#"{
                "type": "lr",
                "coefficients": [1.0],
                "intercept": 0.0,
                "columns": ["url_len"]
            }"#,
        );
        let model = load_model(file.path()).await.unwrap();
        assert_eq!(model.kind(), "lr");
    }

    #[tokio::test]
    async fn test_load_model_missing_file() {
        let err = load_model(Path::new("/definitely/not/here.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[tokio::test]
    async fn test_load_model_malformed_json() {
        let file = write_temp("{ this is not json");
        let err = load_model(file.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_load_model_failing_validation() {
        // Two coefficients against the 31-name fallback order
        let file = write_temp(r#"{"type": "lr", "coefficients": [1.0, 2.0], "intercept": 0.0}"#);
        let err = load_model(file.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidModel(_)));
    }

    #[tokio::test]
    async fn test_load_allowlist_normalizes() {
        let file = write_temp(r#"["Example.COM", "google.com"]"#);
        let list = load_allowlist(file.path()).await.unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains("example.com"));
    }

    #[tokio::test]
    async fn test_load_allowlist_rejects_non_array() {
        let file = write_temp(r#"{"domains": []}"#);
        assert!(load_allowlist(file.path()).await.is_err());
    }

    #[tokio::test]
    async fn test_shared_handles_resolve_once() {
        // Default paths do not exist in the test environment: the handles
        // resolve to the fail-open defaults, once, shared by all callers.
        let (a, b) = tokio::join!(allowlist(), allowlist());
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.is_empty());

        let m1 = model().await;
        let m2 = model().await;
        assert!(m1.is_none());
        assert!(m2.is_none());
        assert!(!get_status().model_loaded);
    }
}
