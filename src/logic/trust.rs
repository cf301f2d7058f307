//! Trusted-Domain Allow List
//!
//! A flat set of lowercase root domains used as a fast-path trust signal.
//! Membership alone is never sufficient: the page must also have a valid
//! HTTPS origin, otherwise the classifier still runs.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Immutable set of trusted root domains.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList {
    domains: HashSet<String>,
}

impl AllowList {
    /// Empty list: no domain is trusted. This is the fail-open load default.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from raw domain strings, normalizing to lowercase.
    pub fn from_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| d.as_ref().trim().to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn contains(&self, root_domain: &str) -> bool {
        self.domains.contains(root_domain)
    }

    /// Fast-path trust check: the host's root domain is listed AND the page
    /// came over HTTPS.
    pub fn is_trusted(&self, host: &str, https_valid: bool) -> bool {
        if !https_valid || host.is_empty() {
            return false;
        }
        self.contains(&root_domain(host))
    }
}

/// Root domain of a hostname: the last two dot-separated labels, or the
/// whole host when it has two or fewer.
pub fn root_domain(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 {
        host.to_string()
    } else {
        labels[labels.len() - 2..].join(".")
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_domain() {
        assert_eq!(root_domain("example.com"), "example.com");
        assert_eq!(root_domain("www.example.com"), "example.com");
        assert_eq!(root_domain("a.b.c.example.com"), "example.com");
        assert_eq!(root_domain("localhost"), "localhost");
        assert_eq!(root_domain(""), "");
    }

    #[test]
    fn test_from_domains_normalizes() {
        let list = AllowList::from_domains(["Example.COM", "  paypal.com ", ""]);
        assert_eq!(list.len(), 2);
        assert!(list.contains("example.com"));
        assert!(list.contains("paypal.com"));
    }

    #[test]
    fn test_trust_requires_https() {
        let list = AllowList::from_domains(["example.com"]);
        assert!(list.is_trusted("www.example.com", true));
        assert!(!list.is_trusted("www.example.com", false));
    }

    #[test]
    fn test_trust_matches_root_domain_only() {
        let list = AllowList::from_domains(["example.com"]);
        assert!(list.is_trusted("example.com", true));
        assert!(list.is_trusted("deep.sub.example.com", true));
        assert!(!list.is_trusted("example.com.evil.test", true));
        assert!(!list.is_trusted("", true));
    }

    #[test]
    fn test_empty_list_trusts_nothing() {
        let list = AllowList::empty();
        assert!(!list.is_trusted("example.com", true));
    }
}
