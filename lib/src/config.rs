//! Pipeline and process configuration.
//!
//! [`PipelineConfig`] names every column the pipeline treats specially. Its
//! `Default` reproduces the Ames Housing conventions; any field can be
//! overridden with the `with_*` builders or by loading a JSON file where
//! omitted keys fall back to the defaults.
//!
//! # Example
//!
//! ```rust
//! use ames_preprocessing::config::PipelineConfig;
//! use ames_preprocessing::preprocessing::HandleUnknown;
//!
//! let config = PipelineConfig::default()
//!     .with_target_column("SalePrice")
//!     .with_handle_unknown(HandleUnknown::Error);
//! assert!(config.validate().is_ok());
//! ```

use crate::preprocessing::encoding::HandleUnknown;
use crate::preprocessing::error::PreprocessingError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Environment variable naming a JSON [`ProcessConfig`] file.
pub const CONFIG_ENV_VAR: &str = "AMES_CONFIG";

/// Identifier and low-value columns removed by the cleaner.
pub const DEFAULT_DROP_COLUMNS: [&str; 8] = [
    "Id",
    "Order",
    "PID",
    "Alley",
    "PoolQC",
    "Fence",
    "MiscFeature",
    "GarageYrBlt",
];

/// A derived column `name = <sold year> - reference_column`, built only when both inputs exist.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeFeature {
    pub name: String,
    pub reference_column: String,
}

impl AgeFeature {
    pub fn new(name: impl Into<String>, reference_column: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reference_column: reference_column.into(),
        }
    }
}

/// Column names and fill policies for the preprocessing pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Columns dropped by the cleaner when present.
    pub drop_columns: Vec<String>,
    /// Numeric column imputed with its fit-time median.
    pub frontage_column: String,
    /// Regression target; never encoded or scaled.
    pub target_column: String,
    /// Fill value for every other numeric column.
    pub numeric_fill: f64,
    /// Fill label for categorical columns.
    pub categorical_fill: String,
    /// Name of the summed area feature.
    pub total_area_column: String,
    /// Inputs of the summed area feature; absent inputs count as zero.
    pub total_area_inputs: Vec<String>,
    /// Year-of-sale column that age features are measured from.
    pub sold_year_column: String,
    /// Age features computed as `sold_year_column - reference_column`.
    pub age_features: Vec<AgeFeature>,
    /// Policy for categories not seen during fit.
    pub handle_unknown: HandleUnknown,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            drop_columns: DEFAULT_DROP_COLUMNS.iter().map(|s| s.to_string()).collect(),
            frontage_column: "LotFrontage".to_string(),
            target_column: "SalePrice".to_string(),
            numeric_fill: 0.0,
            categorical_fill: "None".to_string(),
            total_area_column: "TotalSF".to_string(),
            total_area_inputs: vec![
                "TotalBsmtSF".to_string(),
                "1stFlrSF".to_string(),
                "2ndFlrSF".to_string(),
            ],
            sold_year_column: "YrSold".to_string(),
            age_features: vec![
                AgeFeature::new("HouseAge", "YearBuilt"),
                AgeFeature::new("RemodAge", "YearRemodAdd"),
            ],
            handle_unknown: HandleUnknown::Ignore,
        }
    }
}

impl PipelineConfig {
    pub fn with_drop_columns<S: Into<String>>(mut self, columns: Vec<S>) -> Self {
        self.drop_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_frontage_column(mut self, column: impl Into<String>) -> Self {
        self.frontage_column = column.into();
        self
    }

    pub fn with_target_column(mut self, column: impl Into<String>) -> Self {
        self.target_column = column.into();
        self
    }

    pub fn with_numeric_fill(mut self, value: f64) -> Self {
        self.numeric_fill = value;
        self
    }

    pub fn with_categorical_fill(mut self, label: impl Into<String>) -> Self {
        self.categorical_fill = label.into();
        self
    }

    pub fn with_age_features(mut self, features: Vec<AgeFeature>) -> Self {
        self.age_features = features;
        self
    }

    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.handle_unknown = strategy;
        self
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), PreprocessingError> {
        let non_empty = [
            ("frontage_column", &self.frontage_column),
            ("target_column", &self.target_column),
            ("total_area_column", &self.total_area_column),
            ("sold_year_column", &self.sold_year_column),
        ];
        for (field, value) in non_empty {
            if value.is_empty() {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "{} must not be empty",
                    field
                )));
            }
        }
        if !self.numeric_fill.is_finite() {
            return Err(PreprocessingError::InvalidParameter(format!(
                "numeric_fill must be finite, got {}",
                self.numeric_fill
            )));
        }
        if self.drop_columns.contains(&self.target_column) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "target column '{}' is listed in drop_columns",
                self.target_column
            )));
        }

        let mut derived = HashSet::new();
        derived.insert(self.total_area_column.as_str());
        for feature in &self.age_features {
            if !derived.insert(feature.name.as_str()) {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "derived column '{}' is defined twice",
                    feature.name
                )));
            }
        }
        if derived.contains(self.target_column.as_str()) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "derived column would overwrite target '{}'",
                self.target_column
            )));
        }
        Ok(())
    }

    /// Load from a JSON file; keys that are absent keep their default.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, PreprocessingError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }
}

/// File locations and settings for the `process` and `make_payload` binaries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    /// Raw dataset produced by ingestion.
    pub raw_csv: PathBuf,
    /// Processed, model-ready table.
    pub processed_csv: PathBuf,
    /// Fitted parameters (bincode).
    pub params_bin: PathBuf,
    /// Fitted parameters (JSON, stored next to model artifacts).
    pub params_json: PathBuf,
    /// Training split of the processed table.
    pub train_csv: PathBuf,
    /// Held-out split of the processed table.
    pub test_csv: PathBuf,
    /// Fraction of processed rows held out.
    pub test_size: f64,
    /// Seed for the train/test shuffle.
    pub seed: u64,
    /// Serving payload written by `make_payload`.
    pub payload_json: PathBuf,
    /// Row of the processed table used for the payload.
    pub payload_row: usize,
    pub pipeline: PipelineConfig,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        let data = PathBuf::from("data");
        Self {
            raw_csv: data.join("AmesHousing.csv"),
            processed_csv: data.join("ames_processed.csv"),
            params_bin: data.join("preprocessor.bin"),
            params_json: data.join("preprocessor.json"),
            train_csv: data.join("ames_train.csv"),
            test_csv: data.join("ames_test.csv"),
            test_size: 0.2,
            seed: 42,
            payload_json: PathBuf::from("payload.json"),
            payload_row: 0,
            pipeline: PipelineConfig::default(),
        }
    }
}

impl ProcessConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, PreprocessingError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PreprocessingError> {
        if !(0.0..1.0).contains(&self.test_size) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "test_size must be within [0, 1), got {}",
                self.test_size
            )));
        }
        self.pipeline.validate()
    }

    /// Read the file named by `AMES_CONFIG`, or fall back to the defaults.
    pub fn from_env() -> Result<Self, PreprocessingError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_json_file(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.drop_columns.len(), 8);
        assert_eq!(config.categorical_fill, "None");
        assert_eq!(config.handle_unknown, HandleUnknown::Ignore);
    }

    #[test]
    fn test_target_in_drop_list_rejected() {
        let config = PipelineConfig::default().with_drop_columns(vec!["SalePrice"]);
        assert!(matches!(
            config.validate(),
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_duplicate_derived_rejected() {
        let config = PipelineConfig::default().with_age_features(vec![
            AgeFeature::new("HouseAge", "YearBuilt"),
            AgeFeature::new("HouseAge", "YearRemodAdd"),
        ]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_fill_rejected() {
        let config = PipelineConfig::default().with_numeric_fill(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"target_column": "Price", "categorical_fill": "Missing"}"#)
                .unwrap();
        assert_eq!(config.target_column, "Price");
        assert_eq!(config.categorical_fill, "Missing");
        assert_eq!(config.frontage_column, "LotFrontage");
    }

    #[test]
    fn test_process_config_rejects_full_test_split() {
        let config = ProcessConfig {
            test_size: 1.0,
            ..ProcessConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_process_config_from_json_file() {
        let path = std::env::temp_dir().join("ames_process_config_test.json");
        std::fs::write(
            &path,
            r#"{"raw_csv": "in.csv", "payload_row": 3, "pipeline": {"numeric_fill": 0.0}}"#,
        )
        .unwrap();

        let config = ProcessConfig::from_json_file(&path).unwrap();
        assert_eq!(config.raw_csv, PathBuf::from("in.csv"));
        assert_eq!(config.payload_row, 3);
        assert_eq!(config.processed_csv, PathBuf::from("data/ames_processed.csv"));
        assert_eq!(config.seed, 42);

        std::fs::remove_file(path).ok();
    }
}
