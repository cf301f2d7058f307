//! Model Evaluation - deterministic scoring of a fused feature record
//!
//! One evaluation path per descriptor variant behind a common surface.
//! Evaluation is a pure function of the descriptor and the record; any
//! feature the record does not carry reads as 0.

use crate::logic::features::record::FeatureRecord;

use super::descriptor::{ForestModel, LinearModel, ModelDescriptor, TreeNode};

/// Standard logistic function. Saturates toward 0/1 for large |z|, never
/// overflows.
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl ModelDescriptor {
    /// Raw model score: logistic probability for the linear family, summed
    /// leaf votes for the forest family.
    pub fn score(&self, record: &FeatureRecord) -> f64 {
        match self {
            ModelDescriptor::Linear(m) => m.probability(record),
            ModelDescriptor::Forest(m) => m.vote_sum(record),
        }
    }

    /// Threshold decision. The linear cut is inclusive (at or above), the
    /// forest cut is strict (above).
    pub fn is_unsafe(&self, record: &FeatureRecord) -> bool {
        match self {
            ModelDescriptor::Linear(m) => m.probability(record) >= m.threshold,
            ModelDescriptor::Forest(m) => m.vote_sum(record) > m.threshold,
        }
    }
}

impl LinearModel {
    /// Feature order the coefficients apply to: the model's own declaration
    /// when present, the baked layout otherwise.
    fn ordered_values<'a>(&'a self, record: &'a FeatureRecord) -> impl Iterator<Item = f64> + 'a {
        let names: Box<dyn Iterator<Item = &str> + 'a> = match &self.columns {
            Some(cols) => Box::new(cols.iter().map(String::as_str)),
            None => Box::new(crate::logic::features::layout::FEATURE_LAYOUT.iter().copied()),
        };
        names.map(move |name| record.get_or_zero(name))
    }

    fn probability(&self, record: &FeatureRecord) -> f64 {
        let z = self
            .coefficients
            .iter()
            .zip(self.ordered_values(record))
            .fold(self.intercept, |acc, (c, v)| acc + c * v);
        sigmoid(z)
    }
}

impl ForestModel {
    fn vote_sum(&self, record: &FeatureRecord) -> f64 {
        self.trees
            .iter()
            .map(|nodes| tree_vote(nodes, &self.columns, record))
            .sum()
    }
}

/// Root-to-leaf descent; at a split, less-or-equal goes left. The step count
/// is bounded by the node count so a malformed (cyclic) tree terminates with
/// a neutral vote instead of spinning.
fn tree_vote(nodes: &[TreeNode], columns: &[String], record: &FeatureRecord) -> f64 {
    let mut idx = 0usize;
    for _ in 0..=nodes.len() {
        match nodes.get(idx) {
            Some(TreeNode::Leaf { val, .. }) => return *val,
            Some(TreeNode::Split { f, th, l, r }) => {
                let value = columns
                    .get(*f)
                    .map(|name| record.get_or_zero(name))
                    .unwrap_or(0.0);
                idx = if value <= *th { *l } else { *r };
            }
            None => break,
        }
    }
    log::debug!("tree descent did not reach a leaf, voting 0");
    0.0
}

// ============================================================================
// TESTS
// ============================================================================
