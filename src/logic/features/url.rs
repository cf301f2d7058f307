//! URL Feature Extraction
//!
//! Lexical features computed from the page's absolute URL string. Parsing
//! failures never propagate: a syntactically invalid URL yields the neutral
//! all-zero feature set so the page still flows through classification.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::layout::url_features;
use super::record::FeatureRecord;

/// Hosts of known URL-shortener services, matched case-insensitively as
/// substrings of the page host.
const SHORTENER_DOMAINS: &[&str] = &[
    "bit.ly", "t.co", "goo.gl", "tinyurl.com", "is.gd", "ow.ly", "buff.ly", "bitly.com",
];

/// Bare IPv4 literal, e.g. "192.168.0.1"
static IPV4_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}(?:\.\d{1,3}){3}$").expect("static regex"));

/// URL-derived features plus the lowercase hostname.
///
/// The host is metadata for the allow-list lookup, not a classifier feature.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlFeatureSet {
    pub record: FeatureRecord,
    pub host: String,
}

impl UrlFeatureSet {
    /// Neutral set for unparsable input: every URL feature present at 0, no
    /// host (so the allow-list can never trust it).
    pub fn neutral() -> Self {
        let mut record = FeatureRecord::new();
        for name in url_features() {
            record.set(name, 0.0);
        }
        Self {
            record,
            host: String::new(),
        }
    }
}

/// Extract the 18 lexical features from a raw URL string.
pub fn extract_url_features(raw: &str) -> UrlFeatureSet {
    let parsed = match Url::parse(raw) {
        Ok(u) => u,
        Err(e) => {
            log::debug!("URL did not parse ({}), using neutral features", e);
            return UrlFeatureSet::neutral();
        }
    };

    let host = parsed
        .host_str()
        .map(|h| h.to_ascii_lowercase())
        .unwrap_or_default();

    let url_chars = raw.chars().count();
    let host_chars = host.chars().count();

    let count_in = |s: &str, pred: fn(char) -> bool| s.chars().filter(|&c| pred(c)).count();

    let mut record = FeatureRecord::new();

    record.set("url_len", url_chars as f64);
    record.set("has_ip", bool_feature(IPV4_LITERAL.is_match(&host)));
    record.set(
        "is_shortened",
        bool_feature(SHORTENER_DOMAINS.iter().any(|d| host.contains(d))),
    );
    record.set("has_at", bool_feature(raw.contains('@')));
    record.set("dbl_slash", bool_feature(has_double_slash(raw)));
    record.set("dash_in_domain", bool_feature(host.contains('-')));
    record.set("subdomain_lvl", subdomain_level(&host) as f64);
    record.set("https_token", bool_feature(host.contains("https")));
    record.set("https_valid", bool_feature(parsed.scheme() == "https"));
    record.set("num_dots", count_in(&host, |c| c == '.') as f64);
    record.set("num_hyphens", count_in(&host, |c| c == '-') as f64);
    record.set("num_ampersand", count_in(raw, |c| c == '&') as f64);
    record.set(
        "special_char_ratio",
        ratio(count_in(raw, |c| matches!(c, '@' | '%' | '_' | '-')), url_chars),
    );
    record.set(
        "digit_ratio",
        ratio(count_in(&host, |c| c.is_ascii_digit()), host_chars),
    );
    record.set(
        "letter_ratio",
        ratio(count_in(&host, |c| c.is_ascii_alphabetic()), host_chars),
    );
    record.set(
        "path_level",
        parsed.path().split('/').filter(|s| !s.is_empty()).count() as f64,
    );
    record.set(
        "query_length",
        parsed.query().map(|q| q.chars().count() + 1).unwrap_or(0) as f64,
    );
    record.set(
        "fragment_length",
        parsed.fragment().map(|f| f.chars().count() + 1).unwrap_or(0) as f64,
    );

    UrlFeatureSet { record, host }
}

fn bool_feature(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Guarded ratio: an empty denominator yields 0, never NaN.
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// A second "//" occurring after the scheme separator (protocol-relative
/// redirect trickery).
fn has_double_slash(raw: &str) -> bool {
    match raw.find("://") {
        Some(i) => raw[i + 3..].contains("//"),
        None => false,
    }
}

/// max(label count - 2, 0); an empty host has no labels.
fn subdomain_level(host: &str) -> usize {
    if host.is_empty() {
        return 0;
    }
    host.split('.').count().saturating_sub(2)
}

// ============================================================================
// TESTS
// ============================================================================
