//! Fit-and-save training pipeline
//!
//! Encodes cities, scales the feature matrix and fits a random forest on all
//! rows. There is no held-out split; the in-sample fit is logged for the
//! operator and nothing else.

use crate::artifacts::{ModelArtifact, TrainedArtifacts};
use crate::data::TrainingFrame;
use crate::error::{ModelError, Result};
use crate::features::FEATURE_NAMES;
use chrono::Utc;
use std::env;
use std::str::FromStr;
use tracing::info;
use traffic_math::{
    fit_metrics, FitMetrics, ForestParams, LabelEncoder, RandomForestRegressor, StandardScaler,
};

/// Options controlling a training run
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrainOptions {
    /// Forest hyperparameters
    pub forest: ForestParams,
}

impl TrainOptions {
    /// Read options from `TRAFFIC_FOREST_TREES` and `TRAFFIC_FOREST_SEED`,
    /// falling back to the defaults for unset variables
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();
        if let Some(n_trees) = env_var::<usize>("TRAFFIC_FOREST_TREES")? {
            options.forest.n_trees = n_trees;
        }
        if let Some(seed) = env_var::<u64>("TRAFFIC_FOREST_SEED")? {
            options.forest.seed = seed;
        }
        Ok(options)
    }
}

fn env_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ModelError::Config(format!("{}={:?}: {}", name, raw, e))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ModelError::Config(format!("{}: {}", name, e))),
    }
}

/// Fit the encoder, scaler and forest on every row of the frame
pub fn train(frame: &TrainingFrame, options: &TrainOptions) -> Result<TrainedArtifacts> {
    if frame.is_empty() {
        return Err(ModelError::Data(
            "Cannot train on an empty dataset".to_string(),
        ));
    }

    let city_encoder = LabelEncoder::fit(&frame.cities)?;
    let city_encoded = city_encoder.transform_all(&frame.cities)?;

    let features = frame.feature_rows(&city_encoded)?;
    let scaler = StandardScaler::fit(&features)?;
    let scaled = scaler.transform(&features)?;

    info!(
        rows = frame.len(),
        trees = options.forest.n_trees,
        seed = options.forest.seed,
        "fitting random forest"
    );
    let forest = RandomForestRegressor::fit(&scaled, &frame.traffic_flow, options.forest)?;

    let artifacts = TrainedArtifacts {
        model: ModelArtifact {
            feature_names: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
            n_samples: frame.len(),
            trained_at: Utc::now(),
            forest,
        },
        scaler,
        city_encoder,
    };

    let fit = in_sample_fit(&artifacts, frame)?;
    info!("In-sample fit: {}", fit);

    Ok(artifacts)
}

/// Fit of the trained pipeline on the rows it was trained on
pub fn in_sample_fit(artifacts: &TrainedArtifacts, frame: &TrainingFrame) -> Result<FitMetrics> {
    let city_encoded = artifacts.city_encoder.transform_all(&frame.cities)?;
    let features = frame.feature_rows(&city_encoded)?;
    let scaled = artifacts.scaler.transform(&features)?;
    let predicted = artifacts.model.forest.predict(&scaled)?;

    Ok(fit_metrics(&predicted, &frame.traffic_flow)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use traffic_data::TrafficRecord;

    fn frame() -> TrainingFrame {
        let records: Vec<TrafficRecord> = ["Bidar", "Bangalore"]
            .iter()
            .flat_map(|city| {
                let base = if *city == "Bangalore" { 150 } else { 60 };
                (0..24u8).map(move |hour| TrafficRecord {
                    city: city.to_string(),
                    hour,
                    weekday: 2,
                    junction: 1,
                    temperature: 20.0 + f64::from(hour) / 2.0,
                    traffic_flow: base + u32::from(hour),
                })
            })
            .collect();
        TrainingFrame::from_records(&records)
    }

    fn small_options() -> TrainOptions {
        TrainOptions {
            forest: ForestParams {
                n_trees: 10,
                ..ForestParams::default()
            },
        }
    }

    #[test]
    fn test_train_produces_consistent_artifacts() {
        let artifacts = train(&frame(), &small_options()).unwrap();

        artifacts.validate().unwrap();
        assert_eq!(artifacts.model.n_samples, 48);
        assert_eq!(artifacts.city_encoder.classes(), &["Bangalore", "Bidar"]);
        assert_eq!(artifacts.model.forest.trees().len(), 10);
    }

    #[test]
    fn test_in_sample_fit_is_tight() {
        let frame = frame();
        let artifacts = train(&frame, &small_options()).unwrap();
        let fit = in_sample_fit(&artifacts, &frame).unwrap();

        assert!(fit.r2 > 0.9, "r2 was {}", fit.r2);
        assert!(fit.mae < 10.0, "mae was {}", fit.mae);
    }

    #[test]
    fn test_empty_frame() {
        assert!(matches!(
            train(&TrainingFrame::default(), &small_options()),
            Err(ModelError::Data(_))
        ));
    }
}
