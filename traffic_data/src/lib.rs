//! # Traffic Data
//!
//! `traffic_data` owns the traffic record format shared by the dataset
//! generator, the model trainer and the prediction server.
//!
//! ## Layout on disk
//!
//! Every (city, junction) pair is stored as
//! `{city_lowercase}_{junction_name}_traffic.csv`, and all pairs together as
//! `combined_traffic_all_cities.csv`. Each file has the header
//! `City,Hour,Weekday,Junction,Temperature,TrafficFlow`.
//!
//! ## Usage Example
//!
//! ```no_run
//! use traffic_data::generator::generate_all;
//! use traffic_data::io::write_datasets;
//! use traffic_data::table::CityJunctionTable;
//!
//! let datasets = generate_all();
//! write_datasets("data", &datasets).unwrap();
//!
//! let table = CityJunctionTable::load("data").unwrap();
//! let flow = table.lookup_flow("Bangalore", "1", 8, 2);
//! println!("Historical flow: {:?}", flow);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod generator;
pub mod io;
pub mod network;
pub mod table;

pub use generator::{generate_all, generate_city_junction, CityJunctionDataset};
pub use network::{CityProfile, Junction, CITIES, JUNCTIONS};
pub use table::CityJunctionTable;

/// Errors that can occur while producing or loading traffic datasets
#[derive(Error, Debug)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Result type for traffic data operations
pub type Result<T> = std::result::Result<T, DataError>;

/// One observation of traffic at a junction for an hour of the week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrafficRecord {
    /// City name, as listed in [`CITIES`]
    pub city: String,
    /// Hour of the day, 0-23
    pub hour: u8,
    /// Day of the week, 0 (Monday) to 6 (Sunday)
    pub weekday: u8,
    /// Junction id, 1-4
    pub junction: u8,
    /// Air temperature in degrees Celsius
    pub temperature: f64,
    /// Vehicles observed
    pub traffic_flow: u32,
}

impl TrafficRecord {
    /// Whether the record was observed at the given hour and weekday
    pub fn matches_slot(&self, hour: i64, weekday: i64) -> bool {
        i64::from(self.hour) == hour && i64::from(self.weekday) == weekday
    }
}
