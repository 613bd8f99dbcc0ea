//! Read-only state shared by all request handlers

use crate::error::ServerError;
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};
use traffic_data::network::city_names;
use traffic_data::CityJunctionTable;
use traffic_model::TrafficPredictor;

/// State handed to handlers behind an `Arc`
pub type SharedState = Arc<AppState>;

/// Everything loaded at startup; never mutated afterwards
#[derive(Debug)]
pub struct AppState {
    /// `None` when the artifacts failed to load
    pub predictor: Option<TrafficPredictor>,
    /// Historical datasets keyed by `{city}_{junction}`
    pub datasets: CityJunctionTable,
    /// Served cities, in listing order
    pub cities: Vec<&'static str>,
    /// When the state was assembled
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Assemble state from already loaded parts
    pub fn new(predictor: Option<TrafficPredictor>, datasets: CityJunctionTable) -> Self {
        Self {
            predictor,
            datasets,
            cities: city_names(),
            started_at: Utc::now(),
        }
    }

    /// Load artifacts and datasets from `data_dir`
    ///
    /// Artifact failures are logged and leave the predictor unset so the
    /// other endpoints keep working.
    pub fn load(data_dir: &Path) -> Result<Self, ServerError> {
        let predictor = match TrafficPredictor::load(data_dir) {
            Ok(predictor) => {
                info!(
                    cities = ?predictor.known_cities(),
                    "loaded model, scaler, and city encoder"
                );
                Some(predictor)
            }
            Err(e) => {
                error!("Error loading model, scaler, or city encoder: {}", e);
                None
            }
        };

        let datasets = CityJunctionTable::load(data_dir)?;
        Ok(Self::new(predictor, datasets))
    }

    /// Whether predictions can be served
    pub fn model_loaded(&self) -> bool {
        self.predictor.is_some()
    }
}
