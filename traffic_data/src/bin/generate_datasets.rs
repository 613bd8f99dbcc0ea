use std::env;
use std::path::PathBuf;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use traffic_data::generator::generate_all;
use traffic_data::io::write_datasets;
use traffic_data::network::{city_names, JUNCTIONS};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let data_dir = env::var("TRAFFIC_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"));

    let datasets = generate_all();
    let summary = write_datasets(&data_dir, &datasets)
        .with_context(|| format!("writing datasets to {}", data_dir.display()))?;

    let junction_names: Vec<&str> = JUNCTIONS.iter().map(|junction| junction.name).collect();
    info!(
        "Wrote {} files and {} with {} records",
        summary.files.len(),
        summary.combined_path.display(),
        summary.total_records
    );
    info!("Cities: {:?}", city_names());
    info!("Junctions: {:?}", junction_names);

    Ok(())
}
