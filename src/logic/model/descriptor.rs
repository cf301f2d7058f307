//! Model Descriptor - serialized classifier description
//!
//! The model file is a tagged JSON document: `"type": "lr"` for the linear
//! logistic model, `"type": "rf"` for the additive decision forest. A
//! descriptor is validated once at load and never mutated afterwards; a
//! descriptor that fails validation is treated as absent (fail-open).

use serde::{Deserialize, Serialize};

use crate::logic::features::layout::{is_known_feature, FEATURE_COUNT};

// ============================================================================
// DESCRIPTOR
// ============================================================================

/// The two interchangeable model families.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ModelDescriptor {
    #[serde(rename = "lr")]
    Linear(LinearModel),
    #[serde(rename = "rf")]
    Forest(ForestModel),
}

impl ModelDescriptor {
    pub fn kind(&self) -> &'static str {
        match self {
            ModelDescriptor::Linear(_) => "lr",
            ModelDescriptor::Forest(_) => "rf",
        }
    }

    /// Structural validation, run once at load.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ModelDescriptor::Linear(m) => m.validate(),
            ModelDescriptor::Forest(m) => m.validate(),
        }
    }

    /// Column names the descriptor references that are outside the feature
    /// schema. They evaluate as 0; the repository warns about them at load.
    pub fn unknown_columns(&self) -> Vec<&str> {
        let columns: &[String] = match self {
            ModelDescriptor::Linear(m) => m.columns.as_deref().unwrap_or(&[]),
            ModelDescriptor::Forest(m) => &m.columns,
        };
        columns
            .iter()
            .map(String::as_str)
            .filter(|c| !is_known_feature(c))
            .collect()
    }
}

// ============================================================================
// LINEAR MODEL
// ============================================================================

/// Logistic regression over the canonical feature order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Probability cut; at or above means unsafe.
    #[serde(default = "default_lr_threshold")]
    pub threshold: f64,
    /// Feature order the coefficients were trained against. When absent the
    /// baked layout order applies and the coefficient count must match it.
    #[serde(default)]
    pub columns: Option<Vec<String>>,
}

fn default_lr_threshold() -> f64 {
    0.5
}

impl LinearModel {
    fn validate(&self) -> Result<(), String> {
        let expected = match &self.columns {
            Some(cols) => cols.len(),
            None => FEATURE_COUNT,
        };
        if self.coefficients.len() != expected {
            return Err(format!(
                "coefficient count {} does not match feature order length {}",
                self.coefficients.len(),
                expected
            ));
        }
        if !self.intercept.is_finite() || !self.threshold.is_finite() {
            return Err("intercept/threshold must be finite".to_string());
        }
        if let Some(c) = self.coefficients.iter().find(|c| !c.is_finite()) {
            return Err(format!("non-finite coefficient {c}"));
        }
        Ok(())
    }
}

// ============================================================================
// FOREST MODEL
// ============================================================================

/// Additive decision forest: unweighted leaf votes summed over all trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    /// Each tree is a node array; index 0 is the root.
    pub trees: Vec<Vec<TreeNode>>,
    /// Model-local feature index → feature name.
    pub columns: Vec<String>,
    /// Vote cut; strictly above means unsafe.
    #[serde(default)]
    pub threshold: f64,
}

/// One node of a serialized tree: either an internal split or a leaf vote.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split { f: usize, th: f64, l: usize, r: usize },
    Leaf { leaf: bool, val: f64 },
}

impl ForestModel {
    fn validate(&self) -> Result<(), String> {
        if !self.threshold.is_finite() {
            return Err("threshold must be finite".to_string());
        }
        for (t, nodes) in self.trees.iter().enumerate() {
            if nodes.is_empty() {
                return Err(format!("tree {t} has no nodes"));
            }
            for (i, node) in nodes.iter().enumerate() {
                match node {
                    TreeNode::Split { f, th, l, r } => {
                        if *f >= self.columns.len() {
                            return Err(format!(
                                "tree {t} node {i}: feature index {f} out of range (columns: {})",
                                self.columns.len()
                            ));
                        }
                        if *l >= nodes.len() || *r >= nodes.len() {
                            return Err(format!(
                                "tree {t} node {i}: child index out of range ({l}/{r} of {})",
                                nodes.len()
                            ));
                        }
                        if !th.is_finite() {
                            return Err(format!("tree {t} node {i}: non-finite threshold"));
                        }
                    }
                    TreeNode::Leaf { leaf, val } => {
                        if !*leaf {
                            return Err(format!("tree {t} node {i}: leaf flag not set"));
                        }
                        if !val.is_finite() {
                            return Err(format!("tree {t} node {i}: non-finite leaf value"));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_linear_with_default_threshold() {
        let json = r#"{
            "type": "lr",
            "coefficients": [0.8, -0.2],
            "intercept": 0.1,
            "columns": ["url_len", "has_ip"]
        }"#;
        let model: ModelDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(model.kind(), "lr");
        assert!(model.validate().is_ok());
        match model {
            ModelDescriptor::Linear(m) => {
                assert_eq!(m.threshold, 0.5);
                assert_eq!(m.columns.as_deref().map(|c| c.len()), Some(2));
            }
            _ => panic!("expected linear"),
        }
    }

    #[test]
    fn test_parse_forest_wire_format() {
        let json = r#"{
            "type": "rf",
            "columns": ["url_len", "has_ip"],
            "trees": [
                [
                    {"f": 0, "th": 54.0, "l": 1, "r": 2},
                    {"leaf": true, "val": -1.0},
                    {"leaf": true, "val": 2.0}
                ]
            ]
        }"#;
        let model: ModelDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(model.kind(), "rf");
        assert!(model.validate().is_ok());
        match model {
            ModelDescriptor::Forest(m) => assert_eq!(m.threshold, 0.0),
            _ => panic!("expected forest"),
        }
    }

    #[test]
    fn test_linear_coefficient_count_mismatch_is_flagged() {
        let json = r#"{
            "type": "lr",
            "coefficients": [0.5, 0.5],
            "intercept": 0.0
        }"#;
        // No declared columns: the 31-name layout applies and 2 != 31
        let model: ModelDescriptor = serde_json::from_str(json).unwrap();
        let err = model.validate().unwrap_err();
        assert!(err.contains("does not match"), "{err}");
    }

    #[test]
    fn test_forest_child_index_out_of_range() {
        let json = r#"{
            "type": "rf",
            "columns": ["url_len"],
            "trees": [[{"f": 0, "th": 1.0, "l": 1, "r": 9}]]
        }"#;
        let model: ModelDescriptor = serde_json::from_str(json).unwrap();
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_forest_feature_index_out_of_range() {
        let json = r#"{
            "type": "rf",
            "columns": ["url_len"],
            "trees": [[
                {"f": 3, "th": 1.0, "l": 1, "r": 1},
                {"leaf": true, "val": 1.0}
            ]]
        }"#;
        let model: ModelDescriptor = serde_json::from_str(json).unwrap();
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_empty_tree_rejected() {
        let json = r#"{"type": "rf", "columns": [], "trees": [[]]}"#;
        let model: ModelDescriptor = serde_json::from_str(json).unwrap();
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_unknown_columns_reported() {
        let json = r#"{
            "type": "rf",
            "columns": ["url_len", "made_up_signal"],
            "trees": [[{"leaf": true, "val": 0.0}]]
        }"#;
        let model: ModelDescriptor = serde_json::from_str(json).unwrap();
        assert!(model.validate().is_ok());
        assert_eq!(model.unknown_columns(), vec!["made_up_signal"]);
    }

    #[test]
    fn test_unknown_type_tag_fails_parse() {
        let json = r#"{"type": "svm", "coefficients": []}"#;
        assert!(serde_json::from_str::<ModelDescriptor>(json).is_err());
    }
}
