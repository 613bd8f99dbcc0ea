//! Error types for the traffic_server crate

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use traffic_data::DataError;
use traffic_model::ModelError;

/// Errors returned to HTTP clients as `{"error": message}`
#[derive(Debug, Error)]
pub enum ApiError {
    /// Artifacts failed to load at startup
    #[error("Model, scaler, or city encoder not loaded. Check server logs.")]
    ModelUnavailable,

    /// No dataset is loaded for the requested city and junction
    #[error("No data found for {city} - Junction {junction}")]
    DatasetNotFound { city: String, junction: String },

    /// Request body is not a JSON object
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// A field can't be cast to the type the model needs
    #[error("Invalid value for '{field}': {value}")]
    InvalidField { field: &'static str, value: String },

    /// The loaded pipeline rejected the request
    #[error("Prediction failed: {0}")]
    Prediction(#[from] ModelError),
}

impl ApiError {
    /// HTTP status reported for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ModelUnavailable | ApiError::Prediction(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::DatasetNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidBody(_) | ApiError::InvalidField { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Errors that stop the server from starting
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dataset error: {0}")]
    Data(#[from] DataError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::ModelUnavailable.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::DatasetNotFound {
                city: "Mysore".to_string(),
                junction: "1".to_string()
            }
            .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::InvalidField {
                field: "hour",
                value: "\"abc\"".to_string()
            }
            .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_messages() {
        let err = ApiError::DatasetNotFound {
            city: "Mysore".to_string(),
            junction: "7".to_string(),
        };
        assert_eq!(err.to_string(), "No data found for Mysore - Junction 7");
    }

    #[test]
    fn test_dataset_errors_stop_startup() {
        let err: ServerError = DataError::InvalidRecord("line 3".to_string()).into();
        assert!(matches!(err, ServerError::Data(_)));
        assert!(err.to_string().starts_with("Dataset error:"));
    }
}
