//! CSV storage of traffic datasets

use crate::generator::CityJunctionDataset;
use crate::network::COMBINED_FILE_NAME;
use crate::{DataError, Result, TrafficRecord};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

/// Files produced by a generator run
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    /// Per city junction files with their record counts
    pub files: Vec<(PathBuf, usize)>,
    /// Path of the combined training file
    pub combined_path: PathBuf,
    /// Records in the combined file
    pub total_records: usize,
}

/// Write records to a CSV file with a header row, replacing any existing file
pub fn write_records<P: AsRef<Path>>(path: P, records: &[TrafficRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read every record of a traffic CSV file
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<TrafficRecord>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<TrafficRecord>().enumerate() {
        let record = row.map_err(|e| {
            DataError::InvalidRecord(format!(
                "{} line {}: {}",
                path.display(),
                i + 2,
                e
            ))
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Write each dataset to its own file plus the combined file, creating `dir`
pub fn write_datasets<P: AsRef<Path>>(
    dir: P,
    datasets: &[CityJunctionDataset],
) -> Result<GenerationSummary> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut files = Vec::with_capacity(datasets.len());
    for dataset in datasets {
        let path = dir.join(dataset.file_name());
        write_records(&path, &dataset.records)?;
        info!(
            "Created: {} with {} records",
            dataset.file_name(),
            dataset.records.len()
        );
        files.push((path, dataset.records.len()));
    }

    let combined: Vec<TrafficRecord> = datasets
        .iter()
        .flat_map(|dataset| dataset.records.iter().cloned())
        .collect();
    let combined_path = dir.join(COMBINED_FILE_NAME);
    write_records(&combined_path, &combined)?;
    info!("Created combined dataset with {} records", combined.len());

    Ok(GenerationSummary {
        files,
        combined_path,
        total_records: combined.len(),
    })
}
