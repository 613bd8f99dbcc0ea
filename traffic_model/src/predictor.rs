//! Single-request inference with persisted artifacts

use crate::artifacts::TrainedArtifacts;
use crate::error::Result;
use crate::features::{round_to, FeatureInput};
use std::path::Path;
use tracing::debug;

/// Encoding used for cities the encoder was not fitted on
pub const UNKNOWN_CITY_ENCODING: usize = 0;

/// Applies the trained encode, scale and predict pipeline to one request
#[derive(Debug, Clone)]
pub struct TrafficPredictor {
    artifacts: TrainedArtifacts,
}

impl TrafficPredictor {
    /// Load the artifacts written by the trainer into `dir`
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        TrainedArtifacts::load(dir).map(Self::new)
    }

    /// Wrap artifacts that are already in memory
    pub fn new(artifacts: TrainedArtifacts) -> Self {
        Self { artifacts }
    }

    /// The underlying artifacts
    pub fn artifacts(&self) -> &TrainedArtifacts {
        &self.artifacts
    }

    /// Cities the encoder knows, in encoding order
    pub fn known_cities(&self) -> &[String] {
        self.artifacts.city_encoder.classes()
    }

    /// Encode a city, silently using index 0 for unknown names
    pub fn encode_city(&self, city: &str) -> usize {
        match self.artifacts.city_encoder.transform(city) {
            Ok(encoded) => encoded,
            Err(_) => {
                debug!(city, "unknown city, using fallback encoding");
                UNKNOWN_CITY_ENCODING
            }
        }
    }

    /// Predicted traffic flow, rounded to 2 decimals
    pub fn predict(&self, input: &FeatureInput) -> Result<f64> {
        let encoded = self.encode_city(&input.city);
        let features = input.to_vector(encoded);
        let scaled = self.artifacts.scaler.transform_row(&features)?;
        let predicted = self.artifacts.model.forest.predict_row(&scaled)?;

        Ok(round_to(predicted, 2))
    }
}
