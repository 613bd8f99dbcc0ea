//! Random forest regression
//!
//! Each tree is fitted on a bootstrap resample of the training rows and the
//! forest predicts the mean of its trees. Resampling draws from a ChaCha8
//! stream seeded by [`ForestParams::seed`], so a given seed always produces
//! the same forest.

use crate::tree::{RegressionTree, TreeParams};
use crate::{matrix_width, MathError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Hyperparameters for a random forest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    /// Number of trees in the ensemble
    pub n_trees: usize,
    /// Draw a bootstrap resample for each tree instead of using every row
    pub bootstrap: bool,
    /// Seed for the resampling stream
    pub seed: u64,
    /// Growth limits applied to every tree
    pub tree: TreeParams,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            bootstrap: true,
            seed: 42,
            tree: TreeParams::default(),
        }
    }
}

/// Fitted random forest regressor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    params: ForestParams,
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl RandomForestRegressor {
    /// Fit a forest on a row-major feature matrix
    pub fn fit(features: &[Vec<f64>], targets: &[f64], params: ForestParams) -> Result<Self> {
        if params.n_trees == 0 {
            return Err(MathError::InvalidInput(
                "A forest needs at least one tree".to_string(),
            ));
        }

        let n_features = matrix_width(features)?;
        if features.len() != targets.len() {
            return Err(MathError::InvalidInput(format!(
                "Feature rows ({}) don't match target length ({})",
                features.len(),
                targets.len()
            )));
        }
        if targets.iter().any(|t| !t.is_finite()) {
            return Err(MathError::InvalidInput(
                "Targets contain non-finite values".to_string(),
            ));
        }

        let n_rows = features.len();
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_trees);

        for _ in 0..params.n_trees {
            let samples: Vec<usize> = if params.bootstrap {
                (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect()
            } else {
                (0..n_rows).collect()
            };
            trees.push(RegressionTree::fit_samples(
                features,
                targets,
                samples,
                &params.tree,
            )?);
        }

        Ok(Self {
            params,
            n_features,
            trees,
        })
    }

    /// Hyperparameters the forest was fitted with
    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    /// Number of features the forest expects
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Fitted trees
    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// Check that every tree is well formed and agrees on the feature count
    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(MathError::InsufficientData(
                "Forest has no trees".to_string(),
            ));
        }

        for (index, tree) in self.trees.iter().enumerate() {
            if tree.n_features() != self.n_features {
                return Err(MathError::InvalidInput(format!(
                    "Tree {} expects {} features, forest has {}",
                    index,
                    tree.n_features(),
                    self.n_features
                )));
            }
            tree.validate()?;
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
        if self.trees.is_empty() {
            return Err(MathError::InsufficientData(
                "Forest has no trees".to_string(),
            ));
        }

        let mut total = 0.0;
        for tree in &self.trees {
            total += tree.predict_row(row)?;
        }
        Ok(total / self.trees.len() as f64)
    }

    /// Predict the target for every row of a feature matrix
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        rows.iter().map(|row| self.predict_row(row)).collect()
    }
}
