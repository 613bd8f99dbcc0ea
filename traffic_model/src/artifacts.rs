//! Persistence of the fitted model, scaler and city encoder
//!
//! Each component is stored as its own JSON file in the data directory so
//! they can be inspected independently.

use crate::error::{ModelError, Result};
use crate::features::FEATURE_NAMES;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;
use traffic_math::{LabelEncoder, RandomForestRegressor, StandardScaler};

/// File holding the fitted forest
pub const MODEL_FILE_NAME: &str = "traffic_rf.json";

/// File holding the fitted scaler
pub const SCALER_FILE_NAME: &str = "scaler.json";

/// File holding the fitted city encoder
pub const CITY_ENCODER_FILE_NAME: &str = "city_encoder.json";

/// Fitted forest together with the schema it was trained on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Feature names, in matrix column order
    pub feature_names: Vec<String>,
    /// Rows the forest was fitted on
    pub n_samples: usize,
    /// When training finished
    pub trained_at: DateTime<Utc>,
    /// The fitted forest
    pub forest: RandomForestRegressor,
}

/// Everything the predictor needs, as produced by one training run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedArtifacts {
    pub model: ModelArtifact,
    pub scaler: StandardScaler,
    pub city_encoder: LabelEncoder,
}

impl TrainedArtifacts {
    /// Check that all components agree with the feature schema
    pub fn validate(&self) -> Result<()> {
        if self.model.feature_names != FEATURE_NAMES {
            return Err(ModelError::SchemaMismatch(format!(
                "model features {:?} differ from {:?}",
                self.model.feature_names, FEATURE_NAMES
            )));
        }

        let expected = FEATURE_NAMES.len();
        if self.model.forest.n_features() != expected {
            return Err(ModelError::SchemaMismatch(format!(
                "model expects {} features, schema has {}",
                self.model.forest.n_features(),
                expected
            )));
        }
        self.model
            .forest
            .validate()
            .map_err(|e| ModelError::SchemaMismatch(format!("model is malformed: {}", e)))?;
        if self.scaler.n_features() != expected {
            return Err(ModelError::SchemaMismatch(format!(
                "scaler was fitted on {} features, schema has {}",
                self.scaler.n_features(),
                expected
            )));
        }

        Ok(())
    }

    /// Write the three artifact files into `dir`, creating it if needed
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        write_json(&dir.join(MODEL_FILE_NAME), &self.model)?;
        write_json(&dir.join(SCALER_FILE_NAME), &self.scaler)?;
        write_json(&dir.join(CITY_ENCODER_FILE_NAME), &self.city_encoder)?;

        info!(dir = %dir.display(), "Model, scaler, and city encoder saved");
        Ok(())
    }

    /// Read and validate the three artifact files from `dir`
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let artifacts = Self {
            model: read_json(&dir.join(MODEL_FILE_NAME))?,
            scaler: read_json(&dir.join(SCALER_FILE_NAME))?,
            city_encoder: read_json(&dir.join(CITY_ENCODER_FILE_NAME))?,
        };
        artifacts.validate()?;
        Ok(artifacts)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use traffic_math::ForestParams;

    fn artifacts() -> TrainedArtifacts {
        let rows: Vec<Vec<f64>> = (0..8)
            .map(|i| vec![i as f64, 1.0, 2.0, 20.0 + i as f64, (i % 2) as f64])
            .collect();
        let targets: Vec<f64> = (0..8).map(|i| 10.0 * i as f64).collect();
        let params = ForestParams {
            n_trees: 3,
            ..ForestParams::default()
        };

        TrainedArtifacts {
            model: ModelArtifact {
                feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
                n_samples: rows.len(),
                trained_at: Utc::now(),
                forest: RandomForestRegressor::fit(&rows, &targets, params).unwrap(),
            },
            scaler: StandardScaler::fit(&rows).unwrap(),
            city_encoder: LabelEncoder::fit(["Bidar", "Bangalore"]).unwrap(),
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let original = artifacts();
        original.save(dir.path()).unwrap();

        assert!(dir.path().join(MODEL_FILE_NAME).exists());
        assert!(dir.path().join(SCALER_FILE_NAME).exists());
        assert!(dir.path().join(CITY_ENCODER_FILE_NAME).exists());

        let loaded = TrainedArtifacts::load(dir.path()).unwrap();
        assert_eq!(loaded.city_encoder, original.city_encoder);
        assert_eq!(loaded.model.forest, original.model.forest);
        assert_eq!(loaded.model.trained_at, original.model.trained_at);
    }

    #[test]
    fn test_schema_mismatch_is_rejected() {
        let mut bad = artifacts();
        bad.model.feature_names.swap(0, 1);
        assert!(matches!(bad.validate(), Err(ModelError::SchemaMismatch(_))));

        let mut narrow = artifacts();
        narrow.scaler = StandardScaler::fit(&[vec![1.0], vec![2.0]]).unwrap();
        assert!(matches!(narrow.validate(), Err(ModelError::SchemaMismatch(_))));
    }

    #[test]
    fn test_missing_files() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            TrainedArtifacts::load(dir.path()),
            Err(ModelError::Io(_))
        ));
    }

    #[test]
    fn test_tampered_model_file_is_rejected() {
        let dir = tempdir().unwrap();
        artifacts().save(dir.path()).unwrap();

        let path = dir.path().join(MODEL_FILE_NAME);
        let mut model: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let root = &mut model["forest"]["trees"][0]["nodes"][0];
        assert_eq!(root["kind"], "split");
        root["feature"] = serde_json::json!(9);
        fs::write(&path, model.to_string()).unwrap();

        assert!(matches!(
            TrainedArtifacts::load(dir.path()),
            Err(ModelError::SchemaMismatch(_))
        ));
    }
}
