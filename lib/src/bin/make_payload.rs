//! Build `payload.json` for testing the prediction service.
//!
//! Takes one row of the processed table (the first by default) and writes
//! every column with its value in the `{"columns": [...], "data": [[...]]}`
//! layout the service accepts.
//!
//! Run with: cargo run --bin make_payload

use ames_preprocessing::config::ProcessConfig;
use ames_preprocessing::payload::Payload;
use ames_preprocessing::preprocessing::{FittedPreprocessor, FittedTransformer};
use ames_preprocessing::serialization::write_atomic;
use ames_preprocessing::table::read_processed_csv;
use std::error::Error;
use tracing::info;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = ProcessConfig::from_env()?;
    let fitted = FittedPreprocessor::load_from_file(&config.params_bin)?;
    let processed = read_processed_csv(&config.processed_csv, fitted.output_schema())?;
    fitted.validate_features(&processed)?;

    let payload = Payload::from_table(&processed, &[config.payload_row])?;
    write_atomic(&config.payload_json, payload.to_json()?.as_bytes())?;

    info!(
        "Wrote {} with {} columns.",
        config.payload_json.display(),
        payload.columns.len()
    );
    Ok(())
}
