//! In-memory table of historical city junction datasets

use crate::io::read_records;
use crate::network::{dataset_file_name, dataset_key, CITIES, JUNCTIONS};
use crate::{Result, TrafficRecord};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Historical records keyed by `{city}_{junction}`
///
/// Loaded once and never refreshed.
#[derive(Debug, Clone, Default)]
pub struct CityJunctionTable {
    datasets: HashMap<String, Vec<TrafficRecord>>,
}

impl CityJunctionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every known city junction file found in `dir`
    ///
    /// Missing files are logged and skipped. A file that exists but can't be
    /// parsed is an error.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut table = Self::new();

        for city in &CITIES {
            for junction in &JUNCTIONS {
                let filename = dataset_file_name(city.name, junction);
                let path = dir.join(&filename);
                if !path.exists() {
                    warn!("{} not found", filename);
                    continue;
                }

                let records = read_records(&path)?;
                table.insert(dataset_key(city.name, junction.id), records);
            }
        }

        info!(
            datasets = table.len(),
            dir = %dir.display(),
            "loaded city junction datasets"
        );
        Ok(table)
    }

    /// Add or replace the dataset stored under `key`
    pub fn insert(&mut self, key: String, records: Vec<TrafficRecord>) {
        self.datasets.insert(key, records);
    }

    /// Records stored under a composite key such as `Bangalore_1`
    pub fn get(&self, key: &str) -> Option<&[TrafficRecord]> {
        self.datasets.get(key).map(Vec::as_slice)
    }

    /// Records for a city and junction as given in a request
    pub fn dataset(&self, city: &str, junction: &str) -> Option<&[TrafficRecord]> {
        self.get(&dataset_key(city, junction))
    }

    /// At most `limit` leading records of a city junction dataset
    pub fn head(&self, city: &str, junction: &str, limit: usize) -> Option<&[TrafficRecord]> {
        self.dataset(city, junction)
            .map(|records| &records[..records.len().min(limit)])
    }

    /// Traffic flow of the first record at the given hour and weekday
    pub fn lookup_flow(&self, city: &str, junction: &str, hour: i64, weekday: i64) -> Option<u32> {
        self.dataset(city, junction)?
            .iter()
            .find(|record| record.matches_slot(hour, weekday))
            .map(|record| record.traffic_flow)
    }

    /// Number of datasets held
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Whether no dataset was loaded
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(hour: u8, weekday: u8, flow: u32) -> TrafficRecord {
        TrafficRecord {
            city: "Bidar".to_string(),
            hour,
            weekday,
            junction: 2,
            temperature: 25.0,
            traffic_flow: flow,
        }
    }

    fn table() -> CityJunctionTable {
        let mut table = CityJunctionTable::new();
        table.insert(
            "Bidar_2".to_string(),
            vec![record(8, 2, 70), record(8, 2, 99), record(9, 2, 80)],
        );
        table
    }

    #[test]
    fn test_lookup_takes_first_match() {
        let table = table();
        assert_eq!(table.lookup_flow("Bidar", "2", 8, 2), Some(70));
        assert_eq!(table.lookup_flow("Bidar", "2", 9, 2), Some(80));
        assert_eq!(table.lookup_flow("Bidar", "2", 10, 2), None);
        assert_eq!(table.lookup_flow("Bidar", "3", 8, 2), None);
        assert_eq!(table.lookup_flow("Bidar", "2", 99, 2), None);
    }

    #[test]
    fn test_head_caps_length() {
        let table = table();
        assert_eq!(table.head("Bidar", "2", 2).unwrap().len(), 2);
        assert_eq!(table.head("Bidar", "2", 50).unwrap().len(), 3);
        assert!(table.head("Mysore", "2", 50).is_none());
    }

    #[test]
    fn test_key_is_verbatim() {
        let table = table();
        assert!(table.dataset("Bidar", "2").is_some());
        assert!(table.dataset("Bidar", "02").is_none());
        assert!(table.dataset("bidar", "2").is_none());
    }
}
