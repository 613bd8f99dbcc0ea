//! Standard scaling of numeric feature vectors
//!
//! Each feature is centered on its training mean and divided by its
//! population standard deviation. Constant features keep a scale of 1.0 so
//! transforming them yields zero rather than NaN.

use crate::{matrix_width, MathError, Result};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Per-feature standardization fitted on a training matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Mean of each feature column
    mean: Vec<f64>,
    /// Population variance of each feature column
    variance: Vec<f64>,
    /// Divisor applied to each centered feature
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Fit a scaler on a row-major feature matrix
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self> {
        let width = matrix_width(rows)?;

        let mut mean = Vec::with_capacity(width);
        let mut variance = Vec::with_capacity(width);
        let mut scale = Vec::with_capacity(width);

        for feature in 0..width {
            let column: Vec<f64> = rows.iter().map(|row| row[feature]).collect();
            if column.iter().any(|v| !v.is_finite()) {
                return Err(MathError::InvalidInput(format!(
                    "Feature {} contains non-finite values",
                    feature
                )));
            }

            let column_mean = column.iter().mean();
            let column_variance = column.iter().population_variance();
            let std_dev = column_variance.sqrt();

            mean.push(column_mean);
            variance.push(column_variance);
            scale.push(if std_dev > f64::EPSILON { std_dev } else { 1.0 });
        }

        Ok(Self {
            mean,
            variance,
            scale,
        })
    }

    /// Number of features the scaler was fitted on
    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Fitted feature means
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Fitted feature variances
    pub fn variance(&self) -> &[f64] {
        &self.variance
    }

    /// Fitted feature scales
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Standardize a single feature vector
    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.n_features() {
            return Err(MathError::DimensionMismatch {
                expected: self.n_features(),
                actual: row.len(),
            });
        }

        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(value, (mean, scale))| (value - mean) / scale)
            .collect())
    }

    /// Standardize every row of a feature matrix
    pub fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter().map(|row| self.transform_row(row)).collect()
    }
}
