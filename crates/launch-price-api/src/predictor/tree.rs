//! Regression tree evaluated from its exported array form.
//!
//! Layout mirrors the parallel arrays a fitted tree exposes: node `i` is a leaf
//! when `children_left[i] == -1`, otherwise samples with
//! `f32(x[feature[i]]) <= threshold[i]` go left.

use serde::Deserialize;
use thiserror::Error;

use super::Scorer;
use crate::error::PredictorError;
use crate::features::FeatureVector;

const LEAF: i64 = -1;

#[derive(Debug, Clone, Deserialize)]
pub struct RawTree {
    pub n_features: usize,
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TreeError {
    #[error("tree has no nodes")]
    Empty,
    #[error("array '{name}' has {got} entries, expected {expected}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("node {node}: leaf must have children_right == -1 (got {right})")]
    HalfLeaf { node: usize, right: i64 },
    #[error("node {node}: child {child} must point past the node and inside the tree")]
    BadChild { node: usize, child: i64 },
    #[error("node {node}: feature {feature} outside 0..{n_features}")]
    BadFeature {
        node: usize,
        feature: i64,
        n_features: usize,
    },
    #[error("node {node}: threshold {threshold} is not finite")]
    BadThreshold { node: usize, threshold: f64 },
    #[error("node {node}: leaf value {value} is not finite")]
    BadLeafValue { node: usize, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(f64),
}

/// Immutable regression tree.
#[derive(Debug, Clone)]
pub struct DecisionTreeScorer {
    nodes: Vec<Node>,
    n_features: usize,
}

impl DecisionTreeScorer {
    pub fn from_raw(raw: RawTree) -> Result<Self, TreeError> {
        let n = raw.children_left.len();
        if n == 0 {
            return Err(TreeError::Empty);
        }
        for (name, got) in [
            ("children_right", raw.children_right.len()),
            ("feature", raw.feature.len()),
            ("threshold", raw.threshold.len()),
            ("value", raw.value.len()),
        ] {
            if got != n {
                return Err(TreeError::LengthMismatch {
                    name,
                    expected: n,
                    got,
                });
            }
        }

        // Children must have larger indices than their parent, which rules out
        // cycles and makes every walk terminate.
        let child = |node: usize, c: i64| -> Result<usize, TreeError> {
            usize::try_from(c)
                .ok()
                .filter(|&c| c > node && c < n)
                .ok_or(TreeError::BadChild { node, child: c })
        };

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let (left, right) = (raw.children_left[i], raw.children_right[i]);
            if left == LEAF {
                if right != LEAF {
                    return Err(TreeError::HalfLeaf { node: i, right });
                }
                let value = raw.value[i];
                if !value.is_finite() {
                    return Err(TreeError::BadLeafValue { node: i, value });
                }
                nodes.push(Node::Leaf(value));
                continue;
            }
            let feature = usize::try_from(raw.feature[i])
                .ok()
                .filter(|&f| f < raw.n_features)
                .ok_or(TreeError::BadFeature {
                    node: i,
                    feature: raw.feature[i],
                    n_features: raw.n_features,
                })?;
            let threshold = raw.threshold[i];
            if !threshold.is_finite() {
                return Err(TreeError::BadThreshold { node: i, threshold });
            }
            nodes.push(Node::Split {
                feature,
                threshold,
                left: child(i, left)?,
                right: child(i, right)?,
            });
        }

        Ok(Self {
            nodes,
            n_features: raw.n_features,
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf(_)))
            .count()
    }
}

impl Scorer for DecisionTreeScorer {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: &FeatureVector) -> Result<f64, PredictorError> {
        let x = features.as_slice();
        if x.len() != self.n_features {
            return Err(PredictorError::FeatureCount {
                expected: self.n_features,
                got: x.len(),
            });
        }
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf(value) => return Ok(value),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    // Inputs are compared in single precision.
                    let v = f64::from(x[feature] as f32);
                    idx = if v <= threshold { left } else { right };
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::RawTree;

    /// Splits on scaled year, then on organisation code.
    pub fn sample_raw_tree() -> RawTree {
        RawTree {
            n_features: 5,
            children_left: vec![1, 3, -1, -1, -1],
            children_right: vec![2, 4, -1, -1, -1],
            feature: vec![0, 1, -2, -2, -2],
            threshold: vec![0.5, 3.5, -2.0, -2.0, -2.0],
            value: vec![0.0, 0.0, 62.0, 120.0, 45.5],
        }
    }
}
