//! Fit the preprocessing pipeline on the raw Ames table and persist its outputs.
//!
//! Writes the processed table, its train/test split, and the fitted
//! parameters (bincode for reloading, JSON for inspection). All outputs are
//! staged before any is replaced, so a failed run leaves the previous set
//! intact. Paths come from the JSON file named by `AMES_CONFIG`, or the
//! defaults under `data/`.
//!
//! Run with: RUST_LOG=debug cargo run --bin process

use ames_preprocessing::config::ProcessConfig;
use ames_preprocessing::preprocessing::{FittedTransformer, PreprocessingError, Preprocessor};
use ames_preprocessing::serialization::{write_all_atomic, SerializableParams};
use ames_preprocessing::table::{read_csv, train_test_split, Table};
use std::error::Error;
use std::time::Instant;
use tracing::info;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = ProcessConfig::from_env()?;
    let start = Instant::now();

    info!("Raw data:  {}", config.raw_csv.display());
    let raw = read_csv(&config.raw_csv)?;
    info!(rows = raw.n_rows(), columns = raw.n_cols(), "loaded raw table");

    let (processed, fitted) = Preprocessor::new(config.pipeline.clone()).fit_with_output(&raw)?;
    let (train, test) = train_test_split(&processed, config.test_size, config.seed)?;
    let params_json = fitted.to_json()?;
    let params_bin = fitted.extract_params().to_bytes()?;
    let processed_csv = csv_bytes(&processed)?;
    let train_csv = csv_bytes(&train)?;
    let test_csv = csv_bytes(&test)?;

    write_all_atomic(&[
        (&config.processed_csv, processed_csv.as_slice()),
        (&config.train_csv, train_csv.as_slice()),
        (&config.test_csv, test_csv.as_slice()),
        (&config.params_bin, params_bin.as_slice()),
        (&config.params_json, params_json.as_bytes()),
    ])?;

    info!("Processed: {}", config.processed_csv.display());
    info!("Params:    {}", config.params_bin.display());
    info!(
        rows = processed.n_rows(),
        features = fitted.feature_names().len(),
        train_rows = train.n_rows(),
        test_rows = test.n_rows(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "processing complete"
    );
    Ok(())
}

fn csv_bytes(table: &Table) -> Result<Vec<u8>, PreprocessingError> {
    let mut buffer = Vec::new();
    table.to_csv_writer(&mut buffer)?;
    Ok(buffer)
}
