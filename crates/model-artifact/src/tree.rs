//! Decision Tree Evaluation

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// One node of a decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    /// Interior split: `row[feature] <= threshold` goes left, else right
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Terminal node carrying one value per model output
    Leaf { values: Vec<f64> },
}

/// A single decision tree with its root at index 0.
///
/// Invariant: child indices point forward in the node array, so every walk
/// terminates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<Node>,
}

impl DecisionTree {
    /// Total node count
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Leaf count
    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Longest root-to-leaf path, in edges
    pub fn depth(&self) -> usize {
        self.depth_from(0)
    }

    fn depth_from(&self, idx: usize) -> usize {
        match self.nodes.get(idx) {
            Some(Node::Split { left, right, .. }) => {
                1 + self.depth_from(*left).max(self.depth_from(*right))
            }
            _ => 0,
        }
    }

    /// Walk the tree for one row and return the reached leaf's values
    pub fn evaluate(&self, row: &[f64]) -> Result<&[f64], ModelError> {
        let mut idx = 0;
        loop {
            match self.nodes.get(idx) {
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = row.get(*feature).ok_or_else(|| {
                        ModelError::Malformed(format!("split references feature {}", feature))
                    })?;
                    idx = if *value <= *threshold { *left } else { *right };
                }
                Some(Node::Leaf { values }) => return Ok(values),
                None => {
                    return Err(ModelError::Malformed(format!(
                        "node index {} out of bounds",
                        idx
                    )))
                }
            }
        }
    }

    /// Check structural invariants against the owning artifact's shape
    pub(crate) fn validate(&self, n_features: usize, n_outputs: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Malformed("tree has no nodes".to_string()));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(ModelError::Malformed(format!(
                            "node {} splits on feature {} of {}",
                            idx, feature, n_features
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ModelError::Malformed(format!(
                            "node {} has non-finite threshold",
                            idx
                        )));
                    }
                    for child in [left, right] {
                        if *child <= idx || *child >= self.nodes.len() {
                            return Err(ModelError::Malformed(format!(
                                "node {} has non-forward child {}",
                                idx, child
                            )));
                        }
                    }
                }
                Node::Leaf { values } => {
                    if values.len() != n_outputs {
                        return Err(ModelError::Malformed(format!(
                            "node {} has {} outputs, expected {}",
                            idx,
                            values.len(),
                            n_outputs
                        )));
                    }
                    if values.iter().any(|v| !v.is_finite()) {
                        return Err(ModelError::Malformed(format!(
                            "node {} has non-finite output",
                            idx
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}
