//! # Traffic Model
//!
//! Training and inference for the traffic flow regressor.
//!
//! ## Features
//!
//! - Loading the combined training dataset and checking its schema
//! - Label encoding of cities and standard scaling of the feature matrix
//! - Random forest training with in-sample fit reporting
//! - JSON persistence of the model, scaler and city encoder
//! - A predictor that applies the persisted pipeline to a single request
//!
//! ## Feature schema
//!
//! Every prediction uses the five features `Hour, Weekday, Junction,
//! Temperature, CityEncoded`, in that order. Artifacts record the schema they
//! were trained on and are rejected on load if it differs.
//!
//! ## Quick Start
//!
//! ```no_run
//! use traffic_model::data::load_training_frame;
//! use traffic_model::features::FeatureInput;
//! use traffic_model::predictor::TrafficPredictor;
//! use traffic_model::trainer::{train, TrainOptions};
//!
//! let frame = load_training_frame("data/combined_traffic_all_cities.csv")?;
//! let artifacts = train(&frame, &TrainOptions::default())?;
//! artifacts.save("data")?;
//!
//! let predictor = TrafficPredictor::load("data")?;
//! let flow = predictor.predict(&FeatureInput::default())?;
//! println!("Predicted flow: {}", flow);
//! # Ok::<(), traffic_model::ModelError>(())
//! ```

pub mod artifacts;
pub mod data;
pub mod error;
pub mod features;
pub mod predictor;
pub mod trainer;

// Re-export commonly used types
pub use crate::artifacts::TrainedArtifacts;
pub use crate::data::{load_training_frame, TrainingFrame};
pub use crate::error::{ModelError, Result};
pub use crate::features::FeatureInput;
pub use crate::predictor::TrafficPredictor;
pub use crate::trainer::{train, TrainOptions};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
