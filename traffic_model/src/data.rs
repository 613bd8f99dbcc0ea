//! Training dataset loading

use crate::error::{ModelError, Result};
use crate::features::{CITY_COLUMN, TARGET_NAME};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::info;
use traffic_data::TrafficRecord;

/// Columns the combined dataset must provide
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "City",
    "Hour",
    "Weekday",
    "Junction",
    "Temperature",
    "TrafficFlow",
];

/// Column-oriented training data extracted from the combined dataset
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrainingFrame {
    pub cities: Vec<String>,
    pub hours: Vec<f64>,
    pub weekdays: Vec<f64>,
    pub junctions: Vec<f64>,
    pub temperatures: Vec<f64>,
    pub traffic_flow: Vec<f64>,
}

impl TrainingFrame {
    /// Build a frame from in-memory records
    pub fn from_records(records: &[TrafficRecord]) -> Self {
        Self {
            cities: records.iter().map(|r| r.city.clone()).collect(),
            hours: records.iter().map(|r| f64::from(r.hour)).collect(),
            weekdays: records.iter().map(|r| f64::from(r.weekday)).collect(),
            junctions: records.iter().map(|r| f64::from(r.junction)).collect(),
            temperatures: records.iter().map(|r| r.temperature).collect(),
            traffic_flow: records.iter().map(|r| f64::from(r.traffic_flow)).collect(),
        }
    }

    /// Build a frame from a DataFrame holding the required columns
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        check_required_columns(df)?;

        Ok(Self {
            cities: string_column(df, CITY_COLUMN)?,
            hours: numeric_column(df, "Hour")?,
            weekdays: numeric_column(df, "Weekday")?,
            junctions: numeric_column(df, "Junction")?,
            temperatures: numeric_column(df, "Temperature")?,
            traffic_flow: numeric_column(df, TARGET_NAME)?,
        })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.traffic_flow.len()
    }

    /// Check if the frame has no rows
    pub fn is_empty(&self) -> bool {
        self.traffic_flow.is_empty()
    }

    /// Unscaled feature rows using the given city encodings
    pub fn feature_rows(&self, city_encoded: &[usize]) -> Result<Vec<Vec<f64>>> {
        if city_encoded.len() != self.len() {
            return Err(ModelError::Data(format!(
                "City encodings ({}) don't match row count ({})",
                city_encoded.len(),
                self.len()
            )));
        }

        Ok((0..self.len())
            .map(|i| {
                vec![
                    self.hours[i],
                    self.weekdays[i],
                    self.junctions[i],
                    self.temperatures[i],
                    city_encoded[i] as f64,
                ]
            })
            .collect())
    }
}

/// Load the combined training dataset from a CSV file
pub fn load_training_frame<P: AsRef<Path>>(path: P) -> Result<TrainingFrame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ModelError::DatasetNotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let df = CsvReader::new(file)
        .infer_schema(None)
        .has_header(true)
        .finish()?;

    let frame = TrainingFrame::from_dataframe(&df)?;
    info!("Loaded combined dataset with {} records", frame.len());
    Ok(frame)
}

/// Fail with the list of required columns absent from the DataFrame
fn check_required_columns(df: &DataFrame) -> Result<()> {
    let present = df.get_column_names();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !present.contains(*required))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ModelError::MissingColumns(missing))
    }
}

/// Helper to get a column as f64 values, rejecting nulls
fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df.column(name)?.cast(&DataType::Float64)?;
    let values: Option<Vec<f64>> = series.f64()?.into_iter().collect();

    values.ok_or_else(|| ModelError::Data(format!("Column '{}' has missing values", name)))
}

/// Helper to get a column as owned strings, rejecting nulls
fn string_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let series = df.column(name)?;
    let values: Option<Vec<String>> = series
        .utf8()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect();

    values.ok_or_else(|| ModelError::Data(format!("Column '{}' has missing values", name)))
}
