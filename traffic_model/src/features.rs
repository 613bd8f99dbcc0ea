//! Feature schema shared by training and inference

use serde::{Deserialize, Serialize};

/// Model features, in matrix column order
pub const FEATURE_NAMES: [&str; 5] = ["Hour", "Weekday", "Junction", "Temperature", "CityEncoded"];

/// Target column of the training dataset
pub const TARGET_NAME: &str = "TrafficFlow";

/// City column of the training dataset
pub const CITY_COLUMN: &str = "City";

/// Contextual features of a single prediction request
///
/// Values are taken as given; an hour of 99 is passed to the model as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureInput {
    pub hour: i64,
    pub weekday: i64,
    pub junction: i64,
    pub temperature: f64,
    pub city: String,
}

impl Default for FeatureInput {
    fn default() -> Self {
        Self {
            hour: 8,
            weekday: 2,
            junction: 1,
            temperature: 25.0,
            city: "Bangalore".to_string(),
        }
    }
}

impl FeatureInput {
    /// Unscaled feature vector with the given city encoding
    pub fn to_vector(&self, city_encoded: usize) -> Vec<f64> {
        vec![
            self.hour as f64,
            self.weekday as f64,
            self.junction as f64,
            self.temperature,
            city_encoded as f64,
        ]
    }
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
