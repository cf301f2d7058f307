//! Verdict Classifier
//!
//! Pure function from the loaded model and a fused feature record to a
//! Verdict. No model means safe (fail-open). Reasons are generated only for
//! unsafe verdicts, in fixed rule order, and never influence the decision.

use crate::logic::features::record::FeatureRecord;
use crate::logic::model::descriptor::ModelDescriptor;

use super::rules::{
    AMPERSAND_THRESHOLD, EXTERNAL_RESOURCE_THRESHOLD, FALLBACK_REASON, LONG_URL_THRESHOLD,
};
use super::types::Verdict;

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Classify a fused feature record against the active model.
pub fn classify(model: Option<&ModelDescriptor>, record: &FeatureRecord) -> Verdict {
    let Some(model) = model else {
        log::debug!("no model loaded, classifying safe");
        return Verdict::safe();
    };

    if model.is_unsafe(record) {
        Verdict::unsafe_with(explain(record))
    } else {
        Verdict::safe()
    }
}

// ============================================================================
// EXPLANATION
// ============================================================================

/// Evaluate the fixed reason rules in declaration order. Always returns at
/// least one reason.
pub fn explain(record: &FeatureRecord) -> Vec<String> {
    let mut reasons = Vec::new();

    let url_len = record.get_or_zero("url_len");
    if url_len > LONG_URL_THRESHOLD {
        reasons.push(format!("URL is very long ({})", url_len as i64));
    }
    if record.get_or_zero("has_ip") > 0.0 {
        reasons.push("URL contains IP address".to_string());
    }
    if record.get_or_zero("is_shortened") > 0.0 {
        reasons.push("Shortened URL service".to_string());
    }
    if record.get_or_zero("num_ampersand") > AMPERSAND_THRESHOLD {
        reasons.push("Too many '&' parameters".to_string());
    }
    let form_cnt = record.get_or_zero("form_cnt");
    if form_cnt > 0.0 {
        reasons.push(format!("{} suspicious form(s)", form_cnt as i64));
    }
    if record.get_or_zero("kw_score") > 0.0 {
        reasons.push("Phishing keywords detected".to_string());
    }
    if record.get_or_zero("ext_res_ratio") > EXTERNAL_RESOURCE_THRESHOLD {
        reasons.push("High external resource ratio".to_string());
    }
    if record.get_or_zero("iframe_flag") > 0.0 {
        reasons.push("Uses <iframe>".to_string());
    }
    if record.get_or_zero("onmouseover_flag") > 0.0 {
        reasons.push("Contains onmouseover events".to_string());
    }
    if record.get_or_zero("no_rclick") > 0.0 {
        reasons.push("Right-click disabled".to_string());
    }

    if reasons.is_empty() {
        reasons.push(FALLBACK_REASON.to_string());
    }
    reasons
}

// ============================================================================
// TESTS
// ============================================================================
