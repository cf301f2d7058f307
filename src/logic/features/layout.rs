//! Feature Layout - Centralized Feature Schema
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! The layout is the single source of truth for both extractors and for the
//! linear model's fallback column order. A model file may declare its own
//! column order; that declaration wins over this layout (see
//! `model::descriptor`).

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in the exact order the linear model expects them.
/// Indices 0-17 are URL-derived, 18-30 are DOM-derived.
pub const FEATURE_LAYOUT: &[&str] = &[
    // === URL (0-17) ===
    "url_len",            // 0: Total URL length in characters
    "has_ip",             // 1: Host is a bare IPv4 literal
    "is_shortened",       // 2: Host matches a known URL shortener
    "has_at",             // 3: '@' anywhere in the URL
    "dbl_slash",          // 4: Second "//" after the scheme separator
    "dash_in_domain",     // 5: '-' in the host
    "subdomain_lvl",      // 6: max(host label count - 2, 0)
    "https_token",        // 7: Literal "https" inside the host
    "https_valid",        // 8: Actual scheme is https
    "num_dots",           // 9: '.' count in host
    "num_hyphens",        // 10: '-' count in host
    "num_ampersand",      // 11: '&' count in the full URL
    "special_char_ratio", // 12: {@ % _ -} chars over URL length
    "digit_ratio",        // 13: Digits over host length
    "letter_ratio",       // 14: ASCII letters over host length
    "path_level",         // 15: Non-empty path segment count
    "query_length",       // 16: Query length including '?'
    "fragment_length",    // 17: Fragment length including '#'

    // === DOM (18-30) ===
    "form_cnt",           // 18: <form> element count
    "kw_score",           // 19: Distinct phishing keywords in body text
    "ext_res_ratio",      // 20: External img/script/link/iframe ratio
    "anchor_ext_ratio",   // 21: External <a> ratio
    "meta_link_ext",      // 22: External meta/link ratio
    "iframe_flag",        // 23: Any <iframe> present
    "onmouseover_flag",   // 24: Any inline onmouseover handler
    "no_rclick",          // 25: Right-click suppression handler present
    "mailto_action",      // 26: Any mailto:-targeted anchor
    "sfh_blank",          // 27: Any form action empty or about:blank
    "num_imgs",           // 28: <img> count
    "num_hlinks",         // 29: <a> count (hyperlink count)
    "num_iframes",        // 30: <iframe> count
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 31;

/// Number of URL-derived features at the front of the layout
pub const URL_FEATURE_COUNT: usize = 18;

/// URL-derived slice of the layout
pub fn url_features() -> &'static [&'static str] {
    &FEATURE_LAYOUT[..URL_FEATURE_COUNT]
}

/// DOM-derived slice of the layout
pub fn dom_features() -> &'static [&'static str] {
    &FEATURE_LAYOUT[URL_FEATURE_COUNT..]
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
/// Used to detect layout mismatches between a serialized model and this build
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    // Include version in hash
    hasher.update(&[FEATURE_VERSION]);

    // Hash all feature names in order
    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Get layout hash
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for status reporting/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// FEATURE LOOKUP
// ============================================================================

/// Get feature index by name (O(n) but features are few)
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

/// Check whether a name belongs to the schema
pub fn is_known_feature(name: &str) -> bool {
    feature_index(name).is_some()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 31);
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
        assert_eq!(url_features().len(), URL_FEATURE_COUNT);
        assert_eq!(dom_features().len(), FEATURE_COUNT - URL_FEATURE_COUNT);
    }

    #[test]
    fn test_layout_split() {
        assert_eq!(url_features()[0], "url_len");
        assert_eq!(url_features()[URL_FEATURE_COUNT - 1], "fragment_length");
        assert_eq!(dom_features()[0], "form_cnt");
        assert_eq!(dom_features().last(), Some(&"num_iframes"));
    }

    #[test]
    fn test_layout_hash_consistency() {
        // Hash should be consistent across calls
        let hash1 = compute_layout_hash();
        let hash2 = compute_layout_hash();
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_layout_hash_non_zero() {
        let hash = layout_hash();
        assert_ne!(hash, 0);
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("url_len"), Some(0));
        assert_eq!(feature_index("https_valid"), Some(8));
        assert_eq!(feature_index("form_cnt"), Some(18));
        assert_eq!(feature_index("num_iframes"), Some(30));
        assert_eq!(feature_index("nonexistent"), None);
    }

    #[test]
    fn test_feature_name() {
        assert_eq!(feature_name(0), Some("url_len"));
        assert_eq!(feature_name(30), Some("num_iframes"));
        assert_eq!(feature_name(100), None);
    }

    #[test]
    fn test_no_duplicate_names() {
        for (i, a) in FEATURE_LAYOUT.iter().enumerate() {
            for b in &FEATURE_LAYOUT[i + 1..] {
                assert_ne!(a, b, "duplicate feature name {a}");
            }
        }
    }

    #[test]
    fn test_layout_info() {
        let info = LayoutInfo::current();
        assert_eq!(info.version, FEATURE_VERSION);
        assert_eq!(info.feature_count, FEATURE_COUNT);
        assert_eq!(info.feature_names.len(), FEATURE_COUNT);
    }
}
