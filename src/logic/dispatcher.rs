//! Verdict Dispatcher - per-page-load orchestration
//!
//! Holds the in-flight scratch state for each page load until both feature
//! halves have arrived, applies the allow-list short-circuit, invokes the
//! classifier, and emits exactly one verdict per page load.
//!
//! Staleness: every `begin_navigation` issues a fresh generation token and
//! replaces any pending state for that page. Events quoting an older token
//! (or a page that already produced its verdict) are dropped, so a slow
//! extractor from a superseded load can never fuse with a fresh one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::logic::features::record::FeatureRecord;
use crate::logic::features::url::{extract_url_features, UrlFeatureSet};
use crate::logic::model::descriptor::ModelDescriptor;
use crate::logic::model::repository;
use crate::logic::trust::{root_domain, AllowList};
use crate::logic::verdict::classifier::classify;
use crate::logic::verdict::types::Verdict;

/// Page identifier assigned by the host (tab id).
pub type PageId = u32;

/// Generation token for one navigation of a page.
pub type Generation = u64;

// ============================================================================
// SINK SEAM
// ============================================================================

/// Receiver for dispatcher output; the UI collaborator implements this.
pub trait VerdictSink: Send + Sync {
    /// Exactly one call per completed page load.
    fn verdict_ready(&self, page: PageId, verdict: &Verdict);

    /// A navigation started and a verdict will follow; lets the UI show its
    /// pending state. Default ignores it.
    fn analysis_started(&self, _page: PageId) {}
}

// ============================================================================
// DISPATCHER
// ============================================================================

/// Per-page scratch record; lives from `begin_navigation` until the verdict.
#[derive(Debug, Default)]
struct PageState {
    generation: Generation,
    url: Option<UrlFeatureSet>,
    dom: Option<FeatureRecord>,
}

/// Where the dispatcher finds its model and allow-list.
enum ConfigSource {
    /// The process-wide repository handles (production).
    Shared,
    /// A fixed configuration (tests, embedding without the repository).
    Fixed {
        model: Option<Arc<ModelDescriptor>>,
        allowlist: Arc<AllowList>,
    },
}

pub struct VerdictDispatcher {
    pages: Mutex<HashMap<PageId, PageState>>,
    navigations: AtomicU64,
    sink: Arc<dyn VerdictSink>,
    config: ConfigSource,
}

enum Half {
    Url(UrlFeatureSet),
    Dom(FeatureRecord),
}

impl VerdictDispatcher {
    /// Dispatcher backed by the shared model repository.
    pub fn new(sink: Arc<dyn VerdictSink>) -> Self {
        Self {
            pages: Mutex::new(HashMap::new()),
            navigations: AtomicU64::new(0),
            sink,
            config: ConfigSource::Shared,
        }
    }

    /// Dispatcher with a fixed model and allow-list.
    pub fn with_config(
        model: Option<Arc<ModelDescriptor>>,
        allowlist: Arc<AllowList>,
        sink: Arc<dyn VerdictSink>,
    ) -> Self {
        Self {
            pages: Mutex::new(HashMap::new()),
            navigations: AtomicU64::new(0),
            sink,
            config: ConfigSource::Fixed { model, allowlist },
        }
    }

    /// Number of page loads still awaiting a feature half.
    pub fn pending(&self) -> usize {
        self.pages.lock().len()
    }

    /// Start (or supersede) a navigation for a page. Returns the generation
    /// token the extractor events must quote.
    pub fn begin_navigation(&self, page: PageId) -> Generation {
        let generation = self.navigations.fetch_add(1, Ordering::SeqCst) + 1;
        let previous = self.pages.lock().insert(
            page,
            PageState {
                generation,
                ..Default::default()
            },
        );
        if previous.is_some() {
            log::debug!("page {page}: pending navigation superseded by generation {generation}");
        }
        self.sink.analysis_started(page);
        generation
    }

    /// The page's absolute URL is known. Extraction never fails: an invalid
    /// URL contributes the neutral feature set.
    pub async fn url_ready(&self, page: PageId, generation: Generation, raw_url: &str) {
        let features = extract_url_features(raw_url);
        self.populate(page, generation, Half::Url(features)).await;
    }

    /// The page's DOM features arrived from the page-context collaborator.
    pub async fn dom_features_ready(
        &self,
        page: PageId,
        generation: Generation,
        features: FeatureRecord,
    ) {
        self.populate(page, generation, Half::Dom(features)).await;
    }

    /// Store one half; when the second half lands, take the state out and
    /// finish the page load.
    async fn populate(&self, page: PageId, generation: Generation, half: Half) {
        let complete = {
            let mut pages = self.pages.lock();
            let Some(state) = pages.get_mut(&page) else {
                log::debug!("page {page}: dropping event for finished or unknown load");
                return;
            };
            if state.generation != generation {
                log::debug!(
                    "page {page}: dropping stale event (generation {generation}, current {})",
                    state.generation
                );
                return;
            }

            match half {
                Half::Url(features) => state.url = Some(features),
                Half::Dom(record) => state.dom = Some(record),
            }

            if state.url.is_some() && state.dom.is_some() {
                // Both halves present: this load is terminal, drop the entry
                // before the (await-bearing) classification.
                pages.remove(&page)
            } else {
                None
            }
        };

        if let Some(PageState {
            url: Some(url),
            dom: Some(dom),
            ..
        }) = complete
        {
            self.finish(page, url, dom).await;
        }
    }

    /// Allow-list check, classification, and the single emission.
    async fn finish(&self, page: PageId, url: UrlFeatureSet, dom: FeatureRecord) {
        let (model, allowlist) = self.resolve_config().await;

        let https_valid = url.record.get_or_zero("https_valid") > 0.0;
        if allowlist.is_trusted(&url.host, https_valid) {
            log::info!(
                "page {page}: {} is allow-listed over https, safe",
                root_domain(&url.host)
            );
            self.sink.verdict_ready(page, &Verdict::safe());
            return;
        }

        let fused = url.record.merge(dom);
        let verdict = classify(model.as_deref(), &fused);
        log::info!(
            "page {page}: classified {} ({} reason(s))",
            verdict.label,
            verdict.reasons.len()
        );
        self.sink.verdict_ready(page, &verdict);
    }

    async fn resolve_config(&self) -> (Option<Arc<ModelDescriptor>>, Arc<AllowList>) {
        match &self.config {
            ConfigSource::Shared => (repository::model().await, repository::allowlist().await),
            ConfigSource::Fixed { model, allowlist } => (model.clone(), allowlist.clone()),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
