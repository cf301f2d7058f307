//! Verdict Types
//!
//! Data structures only; classification logic lives in `classifier.rs`.

use serde::{Deserialize, Serialize};

// ============================================================================
// VERDICT
// ============================================================================

/// Binary page verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictLabel {
    Safe,
    Unsafe,
}

impl VerdictLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictLabel::Safe => "safe",
            VerdictLabel::Unsafe => "unsafe",
        }
    }
}

impl std::fmt::Display for VerdictLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The final decision plus its supporting reasons.
///
/// Invariant: `reasons` is non-empty exactly when the label is unsafe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub label: VerdictLabel,
    pub reasons: Vec<String>,
}

impl Verdict {
    pub fn safe() -> Self {
        Self {
            label: VerdictLabel::Safe,
            reasons: vec![],
        }
    }

    /// Unsafe verdict; callers provide at least one reason (the explanation
    /// path guarantees a fallback).
    pub fn unsafe_with(reasons: Vec<String>) -> Self {
        debug_assert!(!reasons.is_empty(), "unsafe verdict without reasons");
        Self {
            label: VerdictLabel::Unsafe,
            reasons,
        }
    }

    pub fn is_safe(&self) -> bool {
        self.label == VerdictLabel::Safe
    }

    pub fn is_unsafe(&self) -> bool {
        self.label == VerdictLabel::Unsafe
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_strings() {
        assert_eq!(VerdictLabel::Safe.as_str(), "safe");
        assert_eq!(VerdictLabel::Unsafe.to_string(), "unsafe");
    }

    #[test]
    fn test_serde_wire_form() {
        let verdict = Verdict::unsafe_with(vec!["Uses <iframe>".to_string()]);
        let json = serde_json::to_string(&verdict).unwrap();
        assert!(json.contains(r#""label":"unsafe""#));

        let back: Verdict = serde_json::from_str(&json).unwrap();
        assert_eq!(back, verdict);
    }

    #[test]
    fn test_safe_has_no_reasons() {
        let verdict = Verdict::safe();
        assert!(verdict.is_safe());
        assert!(verdict.reasons.is_empty());
    }
}
