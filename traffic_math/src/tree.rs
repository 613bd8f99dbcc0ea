//! CART regression tree
//!
//! Splits minimize the summed squared error of the two children. Every
//! feature is considered at every node and thresholds sit halfway between
//! adjacent distinct values. Nodes are stored in a flat vector so the fitted
//! tree serializes compactly.

use crate::{matrix_width, MathError, Result};
use serde::{Deserialize, Serialize};

/// Growth limits for a regression tree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// Maximum depth of the tree, unlimited when `None`
    pub max_depth: Option<usize>,
    /// Minimum number of samples a node needs before it may be split
    pub min_samples_split: usize,
    /// Minimum number of samples each child of a split must keep
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

/// A single node of a fitted tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Internal node: rows with `feature <= threshold` go left
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Terminal node holding the mean target of its samples
    Leaf { value: f64 },
}

/// Fitted regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    n_features: usize,
    nodes: Vec<Node>,
}

/// Best split found for a node
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    sse: f64,
}

impl RegressionTree {
    /// Fit a tree on every row of `features`
    pub fn fit(features: &[Vec<f64>], targets: &[f64], params: &TreeParams) -> Result<Self> {
        let samples: Vec<usize> = (0..features.len()).collect();
        Self::fit_samples(features, targets, samples, params)
    }

    /// Fit a tree on the given row indices, which may repeat
    pub fn fit_samples(
        features: &[Vec<f64>],
        targets: &[f64],
        samples: Vec<usize>,
        params: &TreeParams,
    ) -> Result<Self> {
        let n_features = matrix_width(features)?;
        if features.len() != targets.len() {
            return Err(MathError::InvalidInput(format!(
                "Feature rows ({}) don't match target length ({})",
                features.len(),
                targets.len()
            )));
        }
        if samples.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot fit a tree without samples".to_string(),
            ));
        }
        if let Some(&bad) = samples.iter().find(|&&i| i >= features.len()) {
            return Err(MathError::InvalidInput(format!(
                "Sample index {} out of range",
                bad
            )));
        }

        let mut tree = Self {
            n_features,
            nodes: Vec::new(),
        };
        tree.grow(features, targets, samples, 0, params);
        Ok(tree)
    }

    /// Number of features the tree expects
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Fitted nodes, root first
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Depth of the deepest leaf, with a lone root leaf at depth 0
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], index: usize) -> usize {
            match nodes[index] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }

        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    /// Check that the node arena describes a well-formed tree
    ///
    /// Every split must name a feature below `n_features` and point at
    /// children stored after itself, which also rules out cycles.
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(MathError::InvalidInput("Tree has no nodes".to_string()));
        }

        for (index, node) in self.nodes.iter().enumerate() {
            if let Node::Split {
                feature,
                threshold,
                left,
                right,
            } = node
            {
                if *feature >= self.n_features {
                    return Err(MathError::InvalidInput(format!(
                        "Node {} splits on feature {} of {}",
                        index, feature, self.n_features
                    )));
                }
                if threshold.is_nan() {
                    return Err(MathError::InvalidInput(format!(
                        "Node {} has a NaN threshold",
                        index
                    )));
                }
                for child in [*left, *right] {
                    if child <= index || child >= self.nodes.len() {
                        return Err(MathError::InvalidInput(format!(
                            "Node {} points at invalid child {}",
                            index, child
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Predict the target for a single feature vector
    pub fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.n_features {
            return Err(MathError::DimensionMismatch {
                expected: self.n_features,
                actual: row.len(),
            });
        }

        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(Node::Leaf { value }) => return Ok(*value),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = row.get(*feature).ok_or(MathError::DimensionMismatch {
                        expected: *feature + 1,
                        actual: row.len(),
                    })?;
                    index = if *value <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                None => {
                    return Err(MathError::InvalidInput(format!(
                        "Tree node {} does not exist",
                        index
                    )))
                }
            }
        }
    }

    /// Grow the subtree for `samples` and return the index of its root
    fn grow(
        &mut self,
        features: &[Vec<f64>],
        targets: &[f64],
        samples: Vec<usize>,
        depth: usize,
        params: &TreeParams,
    ) -> usize {
        let index = self.nodes.len();
        let value = samples.iter().map(|&i| targets[i]).sum::<f64>() / samples.len() as f64;
        self.nodes.push(Node::Leaf { value });

        let depth_reached = params.max_depth.map_or(false, |max| depth >= max);
        if depth_reached || samples.len() < params.min_samples_split.max(2) {
            return index;
        }

        let split = match best_split(features, targets, &samples, self.n_features, params) {
            Some(split) => split,
            None => return index,
        };

        let (left_samples, right_samples): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&i| features[i][split.feature] <= split.threshold);

        let left = self.grow(features, targets, left_samples, depth + 1, params);
        let right = self.grow(features, targets, right_samples, depth + 1, params);
        self.nodes[index] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };

        index
    }
}

/// Search every feature for the split with the lowest child squared error
fn best_split(
    features: &[Vec<f64>],
    targets: &[f64],
    samples: &[usize],
    n_features: usize,
    params: &TreeParams,
) -> Option<SplitCandidate> {
    let n = samples.len();
    let min_leaf = params.min_samples_leaf.max(1);

    let total_sum: f64 = samples.iter().map(|&i| targets[i]).sum();
    let total_sq: f64 = samples.iter().map(|&i| targets[i] * targets[i]).sum();
    let parent_sse = total_sq - total_sum * total_sum / n as f64;

    // Pure node
    if parent_sse <= 1e-12 {
        return None;
    }

    let mut best: Option<SplitCandidate> = None;
    let mut order = samples.to_vec();

    for feature in 0..n_features {
        order.sort_by(|&a, &b| features[a][feature].total_cmp(&features[b][feature]));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;

        for position in 1..n {
            let moved = targets[order[position - 1]];
            left_sum += moved;
            left_sq += moved * moved;

            let previous = features[order[position - 1]][feature];
            let current = features[order[position]][feature];
            if current <= previous {
                continue;
            }

            let left_count = position;
            let right_count = n - position;
            if left_count < min_leaf || right_count < min_leaf {
                continue;
            }

            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum * left_sum / left_count as f64)
                + (right_sq - right_sum * right_sum / right_count as f64);

            if best.as_ref().map_or(true, |b| sse < b.sse) {
                let mut threshold = previous + (current - previous) / 2.0;
                // Midpoint of adjacent floats can round up to the larger one
                if threshold >= current {
                    threshold = previous;
                }
                best = Some(SplitCandidate {
                    feature,
                    threshold,
                    sse,
                });
            }
        }
    }

    best
}
