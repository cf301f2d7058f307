//! Integration tests for the feature extraction pipeline
//!
//! Exercises URL extraction, DOM extraction, and fusion together the way the
//! dispatcher drives them.

#[cfg(test)]
mod integration_tests {
    use crate::logic::features::{
        dom::{extract_dom_features, DomElement, DomSnapshot},
        layout::{FEATURE_COUNT, FEATURE_LAYOUT},
        url::extract_url_features,
    };

    const PAGE: &str = "http://secure-login.bank-update.test/account/verify?id=1&token=2";

    fn phishing_page_snapshot() -> DomSnapshot {
        DomSnapshot {
            body_text: "Urgent: verify your account password to avoid suspension".to_string(),
            elements: vec![
                DomElement::new("form").with_attr("action", ""),
                DomElement::new("img").with_attr("src", "https://cdn.clone.test/bank-logo.png"),
                DomElement::new("img").with_attr("src", "https://cdn.clone.test/lock.png"),
                DomElement::new("a").with_attr("href", "https://real-bank.test/help"),
                DomElement::new("iframe").with_attr("src", "https://tracker.test/f"),
                DomElement::new("div").with_attr("onmouseover", "hideStatus()"),
            ],
            context_menu_blocked: true,
        }
    }

    /// Fusing the two extractor outputs covers the whole schema.
    #[test]
    fn test_fused_record_covers_full_layout() {
        let url_side = extract_url_features(PAGE);
        let dom_side = extract_dom_features(PAGE, &phishing_page_snapshot());

        let fused = url_side.record.merge(dom_side);
        assert_eq!(fused.len(), FEATURE_COUNT);
        for name in FEATURE_LAYOUT {
            assert!(fused.get(name).is_some(), "{name} missing after fusion");
        }
    }

    /// The fused record carries both halves unchanged.
    #[test]
    fn test_fusion_preserves_both_sides() {
        let url_side = extract_url_features(PAGE);
        let dom_side = extract_dom_features(PAGE, &phishing_page_snapshot());

        let expected_len = PAGE.chars().count() as f64;
        let fused = url_side.record.merge(dom_side);

        // URL half
        assert_eq!(fused.get_or_zero("url_len"), expected_len);
        assert_eq!(fused.get_or_zero("dash_in_domain"), 1.0);
        assert_eq!(fused.get_or_zero("https_valid"), 0.0);
        assert_eq!(fused.get_or_zero("num_ampersand"), 1.0);

        // DOM half
        assert_eq!(fused.get_or_zero("form_cnt"), 1.0);
        assert_eq!(fused.get_or_zero("sfh_blank"), 1.0);
        assert_eq!(fused.get_or_zero("iframe_flag"), 1.0);
        assert_eq!(fused.get_or_zero("no_rclick"), 1.0);
        assert_eq!(fused.get_or_zero("ext_res_ratio"), 1.0);
        assert!(fused.get_or_zero("kw_score") >= 4.0);
    }

    /// Every ratio feature stays within [0, 1] across both extractors.
    #[test]
    fn test_all_ratio_features_bounded() {
        let url_side = extract_url_features(PAGE);
        let dom_side = extract_dom_features(PAGE, &phishing_page_snapshot());
        let fused = url_side.record.merge(dom_side);

        for name in [
            "special_char_ratio",
            "digit_ratio",
            "letter_ratio",
            "ext_res_ratio",
            "anchor_ext_ratio",
            "meta_link_ext",
        ] {
            let v = fused.get_or_zero(name);
            assert!(v.is_finite(), "{name} not finite");
            assert!((0.0..=1.0).contains(&v), "{name}={v} out of range");
        }
    }

    /// A benign page produces low-signal features end to end.
    #[test]
    fn test_benign_page_is_low_signal() {
        let page = "https://example.com/";
        let doc = DomSnapshot {
            body_text: "Welcome to our documentation".to_string(),
            elements: vec![
                DomElement::new("img").with_attr("src", "/logo.svg"),
                DomElement::new("a").with_attr("href", "/docs"),
            ],
            context_menu_blocked: false,
        };

        let fused = extract_url_features(page)
            .record
            .merge(extract_dom_features(page, &doc));

        assert_eq!(fused.get_or_zero("has_ip"), 0.0);
        assert_eq!(fused.get_or_zero("kw_score"), 0.0);
        assert_eq!(fused.get_or_zero("ext_res_ratio"), 0.0);
        assert_eq!(fused.get_or_zero("anchor_ext_ratio"), 0.0);
        assert_eq!(fused.get_or_zero("https_valid"), 1.0);
    }
}
