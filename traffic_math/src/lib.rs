//! # Traffic Math
//!
//! Preprocessing and regression primitives shared by the traffic flow trainer
//! and the prediction server. This crate provides:
//!
//! - A standard scaler (per-feature mean/variance standardization)
//! - A label encoder for categorical string features
//! - A CART regression tree and a bagged random forest built on it
//! - In-sample fit metrics

use thiserror::Error;

pub mod encoder;
pub mod forest;
pub mod metrics;
pub mod scaler;
pub mod tree;

pub use encoder::LabelEncoder;
pub use forest::{ForestParams, RandomForestRegressor};
pub use metrics::{fit_metrics, FitMetrics};
pub use scaler::StandardScaler;
pub use tree::{RegressionTree, TreeParams};

/// Errors that can occur while fitting or applying a model component
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Dimension mismatch: expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Unknown label: {0}")]
    UnknownLabel(String),
}

/// Result type for traffic math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Verify that every row of a feature matrix has the same width and return it
pub(crate) fn matrix_width(rows: &[Vec<f64>]) -> Result<usize> {
    let width = rows
        .first()
        .map(Vec::len)
        .ok_or_else(|| MathError::InsufficientData("Feature matrix is empty".to_string()))?;

    if width == 0 {
        return Err(MathError::InvalidInput(
            "Feature matrix has no columns".to_string(),
        ));
    }

    if let Some(row) = rows.iter().find(|row| row.len() != width) {
        return Err(MathError::DimensionMismatch {
            expected: width,
            actual: row.len(),
        });
    }

    Ok(width)
}
