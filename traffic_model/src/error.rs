//! Error types for the traffic_model crate

use std::path::PathBuf;
use thiserror::Error;
use traffic_math::MathError;

/// Custom error types for the traffic_model crate
#[derive(Debug, Error)]
pub enum ModelError {
    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error reading or writing an artifact
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    Polars(String),

    /// Error fitting or applying a model component
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    Data(String),

    /// The training dataset does not exist
    #[error("Dataset not found: {}", .0.display())]
    DatasetNotFound(PathBuf),

    /// The training dataset lacks required columns
    #[error("Missing required columns in data: {0:?}")]
    MissingColumns(Vec<String>),

    /// Loaded artifacts disagree with the feature schema
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ModelError>;

impl From<polars::prelude::PolarsError> for ModelError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        ModelError::Polars(err.to_string())
    }
}
