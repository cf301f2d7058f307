//! DOM Feature Extraction
//!
//! Structural features computed from a page-document snapshot: the element
//! list, visible body text, and handler flags that the page-context script
//! serializes out of the live document. Everything after that serialization
//! happens here, so the extraction is deterministic and testable.
//!
//! Every external-resource ratio resolves relative URLs against the page's
//! own location first; an element whose URL cannot be parsed is excluded
//! from both the numerator and the denominator of its ratio.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

use super::record::FeatureRecord;

/// Fixed phishing vocabulary. Each term contributes at most 1 to `kw_score`,
/// matched as a substring of the lowercased body text.
const PHISHING_KEYWORDS: &[&str] = &[
    "login", "verify", "password", "urgent", "bank", "account", "confirm", "update", "secure",
    "click",
];

// ============================================================================
// DOCUMENT SNAPSHOT
// ============================================================================

/// One element of the snapshot: tag name plus inline attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomElement {
    pub tag: String,
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
}

impl DomElement {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// Attribute lookup, case-insensitive on the attribute name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn is_tag(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }
}

/// Serialized view of a fully-loaded document, shipped in by the
/// page-context collaborator once per load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomSnapshot {
    /// Visible body text (innerText equivalent).
    #[serde(default)]
    pub body_text: String,
    /// Flat element list with tag names and inline attributes.
    #[serde(default)]
    pub elements: Vec<DomElement>,
    /// Document-level right-click suppression (oncontextmenu on document or
    /// body), which the element scan below cannot see.
    #[serde(default)]
    pub context_menu_blocked: bool,
}

// ============================================================================
// EXTERNAL-RATIO TALLY
// ============================================================================

/// Running external/total count for one ratio feature. Elements whose URL is
/// missing, empty, or unparsable contribute to neither side.
#[derive(Debug, Default)]
struct ExternalTally {
    external: usize,
    counted: usize,
}

impl ExternalTally {
    fn add(&mut self, base: Option<&Url>, page_host: &str, value: Option<&str>) {
        let Some(value) = value else { return };
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return;
        }
        let Some(resolved) = resolve(base, trimmed) else {
            return;
        };
        self.counted += 1;
        if let Some(host) = resolved.host_str() {
            if !host.eq_ignore_ascii_case(page_host) {
                self.external += 1;
            }
        }
        // A resolved URL without a host (data:, javascript:) loads nothing
        // remote and stays internal.
    }

    fn ratio(&self) -> f64 {
        self.external as f64 / self.counted.max(1) as f64
    }
}

/// Resolve an attribute value against the page location; absolute values
/// parse on their own when the page location itself did not.
fn resolve(base: Option<&Url>, value: &str) -> Option<Url> {
    match base {
        Some(b) => b.join(value).ok(),
        None => Url::parse(value).ok(),
    }
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Extract the 13 structural features from a document snapshot.
pub fn extract_dom_features(page_url: &str, doc: &DomSnapshot) -> FeatureRecord {
    let base = Url::parse(page_url).ok();
    let page_host = base
        .as_ref()
        .and_then(|u| u.host_str())
        .map(|h| h.to_ascii_lowercase())
        .unwrap_or_default();

    let mut form_cnt = 0usize;
    let mut num_imgs = 0usize;
    let mut num_hlinks = 0usize;
    let mut num_iframes = 0usize;

    let mut resources = ExternalTally::default();
    let mut anchors = ExternalTally::default();
    let mut meta_links = ExternalTally::default();

    let mut onmouseover = false;
    let mut right_click_blocked = doc.context_menu_blocked;
    let mut mailto_anchor = false;
    let mut blank_form_action = false;

    for el in &doc.elements {
        if el.attr("onmouseover").is_some() {
            onmouseover = true;
        }
        if el.attr("oncontextmenu").is_some() {
            right_click_blocked = true;
        }

        if el.is_tag("form") {
            form_cnt += 1;
            if let Some(action) = el.attr("action") {
                let action = action.trim();
                if action.is_empty() || action.eq_ignore_ascii_case("about:blank") {
                    blank_form_action = true;
                }
            }
        } else if el.is_tag("img") {
            num_imgs += 1;
            resources.add(base.as_ref(), &page_host, el.attr("src"));
        } else if el.is_tag("script") {
            resources.add(base.as_ref(), &page_host, el.attr("src"));
        } else if el.is_tag("iframe") {
            num_iframes += 1;
            resources.add(base.as_ref(), &page_host, el.attr("src"));
        } else if el.is_tag("link") {
            resources.add(base.as_ref(), &page_host, el.attr("href"));
            meta_links.add(base.as_ref(), &page_host, el.attr("href"));
        } else if el.is_tag("meta") {
            // Only an absolute content value is URL-bearing; resolving every
            // viewport/charset declaration against the base would count
            // plain text as an internal URL.
            if let Some(content) = el.attr("content") {
                if Url::parse(content.trim()).is_ok() {
                    meta_links.add(None, &page_host, Some(content));
                }
            }
        } else if el.is_tag("a") {
            num_hlinks += 1;
            anchors.add(base.as_ref(), &page_host, el.attr("href"));
            if let Some(href) = el.attr("href") {
                if href.trim().to_ascii_lowercase().starts_with("mailto:") {
                    mailto_anchor = true;
                }
            }
        }
    }

    let mut record = FeatureRecord::new();
    record.set("form_cnt", form_cnt as f64);
    record.set("kw_score", keyword_score(&doc.body_text) as f64);
    record.set("ext_res_ratio", resources.ratio());
    record.set("anchor_ext_ratio", anchors.ratio());
    record.set("meta_link_ext", meta_links.ratio());
    record.set("iframe_flag", if num_iframes > 0 { 1.0 } else { 0.0 });
    record.set("onmouseover_flag", if onmouseover { 1.0 } else { 0.0 });
    record.set("no_rclick", if right_click_blocked { 1.0 } else { 0.0 });
    record.set("mailto_action", if mailto_anchor { 1.0 } else { 0.0 });
    record.set("sfh_blank", if blank_form_action { 1.0 } else { 0.0 });
    record.set("num_imgs", num_imgs as f64);
    record.set("num_hlinks", num_hlinks as f64);
    record.set("num_iframes", num_iframes as f64);
    record
}

/// Count of distinct vocabulary terms present in the body text.
fn keyword_score(body_text: &str) -> usize {
    let lowered = body_text.to_lowercase();
    PHISHING_KEYWORDS
        .iter()
        .filter(|kw| lowered.contains(*kw))
        .count()
}

// ============================================================================
// TESTS
// ============================================================================
