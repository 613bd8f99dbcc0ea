//! # Traffic Flow
//!
//! Umbrella crate for the traffic flow prediction workspace.
//!
//! - [`math`]: label encoding, feature scaling and the random forest
//! - [`data`]: synthetic city junction datasets and their CSV files
//! - [`model`]: training, artifact persistence and inference
//! - [`server`]: the HTTP API
//!
//! ## Example
//!
//! ```
//! use traffic_flow_workspace::data::generator::generate_all;
//!
//! let datasets = generate_all();
//! assert_eq!(datasets.len(), 16);
//! assert!(datasets.iter().all(|dataset| dataset.records.len() == 168));
//! ```

pub use traffic_data as data;
pub use traffic_math as math;
pub use traffic_model as model;
pub use traffic_server as server;
