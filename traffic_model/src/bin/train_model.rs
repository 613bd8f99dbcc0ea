use std::env;
use std::path::PathBuf;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use traffic_data::network::COMBINED_FILE_NAME;
use traffic_model::{load_training_frame, train, ModelError, TrainOptions};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let data_dir = env::var("TRAFFIC_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"));
    let options = TrainOptions::from_env()?;

    let combined = data_dir.join(COMBINED_FILE_NAME);
    let frame = match load_training_frame(&combined) {
        Ok(frame) => frame,
        Err(ModelError::DatasetNotFound(path)) => {
            error!(
                "Combined dataset {} not found! Please run generate_datasets first",
                path.display()
            );
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("loading combined dataset"),
    };

    let artifacts = train(&frame, &options)?;
    artifacts
        .save(&data_dir)
        .with_context(|| format!("saving artifacts to {}", data_dir.display()))?;

    info!("Cities: {:?}", artifacts.city_encoder.classes());
    Ok(())
}
