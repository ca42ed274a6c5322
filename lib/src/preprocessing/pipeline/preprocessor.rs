//! The three-stage preprocessing pipeline.
//!
//! A [`Preprocessor`] runs clean → engineer → encode/scale. Fitting it
//! yields a [`FittedPreprocessor`] whose [`PreprocessorParams`] hold
//! everything learned (frontage median, category sets, means and standard
//! deviations) together with the config and the schemas seen at fit time.
//! Those parameters are persisted and reloaded to process new rows exactly
//! like the training table.
//!
//! # Example
//! ```ignore
//! use ames_preprocessing::preprocessing::{FittedTransformer, Preprocessor};
//!
//! let (processed, fitted) = Preprocessor::default().fit_with_output(&raw)?;
//! fitted.save_to_file("data/preprocessor.bin")?;
//!
//! let loaded = FittedPreprocessor::load_from_file("data/preprocessor.bin")?;
//! let features = loaded.transform(&new_rows)?;
//! ```

use crate::config::PipelineConfig;
use crate::preprocessing::cleaning::{Cleaner, CleanerParams, FittedCleaner};
use crate::preprocessing::encoding::{FittedOneHotEncoder, OneHotEncoder, OneHotEncoderParams};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::feature_engineering::FeatureEngineer;
use crate::preprocessing::scaling::{FittedStandardScaler, StandardScaler, StandardScalerParams};
use crate::preprocessing::traits::{FittedTransformer, StatelessTransformer, Transformer};
use crate::table::{ColumnData, DataType, Schema, Table};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Serializable representation of a fitted pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PreprocessorParams {
    /// Config the pipeline was fit with.
    pub config: PipelineConfig,
    pub cleaner: CleanerParams,
    pub engineer: FeatureEngineer,
    pub encoder: OneHotEncoderParams,
    pub scaler: StandardScalerParams,
    /// Schema of the engineered table entering the encoder.
    pub input_schema: Schema,
    /// Schema of the processed output: features in order, then the target.
    pub output_schema: Schema,
}

/// Preprocessing pipeline (unfitted).
#[derive(Clone, Debug, Default)]
pub struct Preprocessor {
    config: PipelineConfig,
}

impl Preprocessor {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Fit every stage on `table`, returning the processed table with the fitted pipeline.
    pub fn fit_with_output(
        &self,
        table: &Table,
    ) -> Result<(Table, FittedPreprocessor), PreprocessingError> {
        let config = &self.config;
        config.validate()?;
        if table.n_rows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit Preprocessor on empty data".to_string(),
            ));
        }

        let cleaner = Cleaner::from_config(config).fit(table)?;
        let cleaned = cleaner.transform(table)?;
        debug!(rows = cleaned.n_rows(), columns = cleaned.n_cols(), "clean stage");

        let engineer = FeatureEngineer::from_config(config);
        let engineered = engineer.transform_direct(&cleaned)?;
        debug!(rows = engineered.n_rows(), columns = engineered.n_cols(), "engineer stage");
        let input_schema = Schema::infer(&engineered, config);

        let target = vec![config.target_column.clone()];
        let encoder = OneHotEncoder::new()
            .with_handle_unknown(config.handle_unknown)
            .with_excluded_columns(target.clone())
            .fit(&engineered)?;
        let encoded = encoder.transform(&engineered)?;
        let scaler = StandardScaler::new()
            .with_excluded_columns(target)
            .fit(&encoded)?;
        let scaled = scaler.transform(&encoded)?;

        let output = target_last(&scaled, &config.target_column)?;
        let output_schema = Schema::infer(&output, config);
        debug!(rows = output.n_rows(), columns = output.n_cols(), "encode/scale stage");

        let fitted = FittedPreprocessor {
            params: PreprocessorParams {
                config: config.clone(),
                cleaner: cleaner.extract_params(),
                engineer,
                encoder: encoder.extract_params(),
                scaler: scaler.extract_params(),
                input_schema,
                output_schema,
            },
            cleaner,
            encoder,
            scaler,
        };
        info!(
            rows = table.n_rows(),
            raw_columns = table.n_cols(),
            features = fitted.feature_names().len(),
            categorical = fitted.encoder.columns().len(),
            scaled = fitted.scaler.columns().len(),
            "fitted preprocessor"
        );
        Ok((output, fitted))
    }
}

impl Transformer for Preprocessor {
    type Params = PreprocessorParams;
    type Fitted = FittedPreprocessor;

    fn fit(&self, table: &Table) -> Result<Self::Fitted, PreprocessingError> {
        self.fit_with_output(table).map(|(_, fitted)| fitted)
    }

    fn fit_transform(&self, table: &Table) -> Result<Table, PreprocessingError> {
        self.fit_with_output(table).map(|(output, _)| output)
    }
}

/// Move the target column, if present, to the end.
fn target_last(table: &Table, target: &str) -> Result<Table, PreprocessingError> {
    let mut order: Vec<&str> = table
        .column_names()
        .into_iter()
        .filter(|c| *c != target)
        .collect();
    if table.has_column(target) {
        order.push(target);
    }
    table.select(&order)
}

/// Give columns with no present cell the dtype recorded at fit time.
///
/// Type inference cannot tell what an all-missing column holds, which is
/// common when only a few rows are processed.
fn retype_all_missing(table: &Table, schema: &Schema) -> Table {
    let mut out = table.clone();
    for column in out.columns_mut() {
        let n = column.len();
        if n == 0 || column.data.null_count() != n {
            continue;
        }
        let Some(field) = schema.field(&column.name) else {
            continue;
        };
        column.data = match field.dtype {
            DataType::Integer => ColumnData::Integer(vec![None; n]),
            DataType::Float => ColumnData::Float(vec![None; n]),
            DataType::Categorical => ColumnData::Categorical(vec![None; n]),
            DataType::Indicator => continue,
        };
    }
    out
}

/// Fitted pipeline ready for inference.
#[derive(Clone, Debug)]
pub struct FittedPreprocessor {
    params: PreprocessorParams,
    cleaner: FittedCleaner,
    encoder: FittedOneHotEncoder,
    scaler: FittedStandardScaler,
}

impl FittedPreprocessor {
    pub fn params(&self) -> &PreprocessorParams {
        &self.params
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.params.config
    }

    pub fn target_column(&self) -> &str {
        &self.params.config.target_column
    }

    /// Ordered model-input columns (target excluded).
    pub fn feature_names(&self) -> Vec<String> {
        self.params.output_schema.feature_names()
    }

    pub fn output_schema(&self) -> &Schema {
        &self.params.output_schema
    }

    pub fn cleaner(&self) -> &FittedCleaner {
        &self.cleaner
    }

    pub fn encoder(&self) -> &FittedOneHotEncoder {
        &self.encoder
    }

    pub fn scaler(&self) -> &FittedStandardScaler {
        &self.scaler
    }

    /// Check that a processed table carries every expected feature.
    pub fn validate_features(&self, table: &Table) -> Result<(), PreprocessingError> {
        let missing: Vec<String> = self
            .feature_names()
            .into_iter()
            .filter(|f| !table.has_column(f))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PreprocessingError::schema_mismatch("features", missing))
        }
    }

    /// Split a processed table into a feature matrix and, if present, the target vector.
    pub fn split_target(
        &self,
        table: &Table,
    ) -> Result<(Array2<f64>, Option<Array1<f64>>), PreprocessingError> {
        self.validate_features(table)?;
        let features = self.feature_names();
        let n_rows = table.n_rows();

        let mut x = Array2::<f64>::zeros((n_rows, features.len()));
        for (j, name) in features.iter().enumerate() {
            let values = numeric_values(table, name)?;
            for (i, v) in values.into_iter().enumerate() {
                x[[i, j]] = v;
            }
        }

        let y = if table.has_column(self.target_column()) {
            Some(Array1::from(numeric_values(table, self.target_column())?))
        } else {
            None
        };
        Ok((x, y))
    }

    /// Serialize the parameters as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, PreprocessingError> {
        Ok(serde_json::to_string_pretty(&self.params)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PreprocessingError> {
        let params: PreprocessorParams = serde_json::from_str(json)?;
        Self::from_params(params)
    }
}

/// Dense numeric values of a column; missing cells are rejected.
fn numeric_values(table: &Table, name: &str) -> Result<Vec<f64>, PreprocessingError> {
    let column = table
        .column(name)
        .ok_or_else(|| PreprocessingError::schema_mismatch("features", vec![name.to_string()]))?;
    let values = column
        .data
        .as_f64()
        .ok_or_else(|| PreprocessingError::TypeMismatch {
            column: name.to_string(),
            expected: "numeric".to_string(),
            got: DataType::Categorical.to_string(),
        })?;
    values
        .into_iter()
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(|| PreprocessingError::MissingValues(format!("column '{}'", name)))
}

impl FittedTransformer for FittedPreprocessor {
    type Params = PreprocessorParams;

    fn transform(&self, table: &Table) -> Result<Table, PreprocessingError> {
        let params = &self.params;

        let retyped = retype_all_missing(table, &params.input_schema);
        let cleaned = self.cleaner.transform(&retyped)?;
        let engineered = params.engineer.transform_direct(&cleaned)?;
        params.input_schema.validate(&engineered, "engineer")?;

        let known: Vec<&str> = params
            .input_schema
            .names()
            .into_iter()
            .filter(|c| engineered.has_column(c))
            .collect();
        let extra: Vec<&str> = engineered
            .column_names()
            .into_iter()
            .filter(|c| params.input_schema.field(c).is_none())
            .collect();
        if !extra.is_empty() {
            warn!(columns = ?extra, "dropping columns not seen during fit");
        }
        let selected = engineered.select(&known)?;

        let encoded = self.encoder.transform(&selected)?;
        let scaled = self.scaler.transform(&encoded)?;
        let output = target_last(&scaled, &params.config.target_column)?;
        params.output_schema.validate(&output, "encode/scale")?;

        let order: Vec<&str> = params
            .output_schema
            .names()
            .into_iter()
            .filter(|c| output.has_column(c))
            .collect();
        let output = output.select(&order)?;
        debug!(rows = output.n_rows(), columns = output.n_cols(), "applied preprocessor");
        Ok(output)
    }

    /// Undo the standard scaling; indicator columns are left as they are.
    fn inverse_transform(&self, table: &Table) -> Result<Table, PreprocessingError> {
        self.scaler.inverse_transform(table)
    }

    fn extract_params(&self) -> Self::Params {
        self.params.clone()
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        params.config.validate()?;
        let cleaner = FittedCleaner::from_params(params.cleaner.clone())?;
        let encoder = FittedOneHotEncoder::from_params(params.encoder.clone())?;
        let scaler = FittedStandardScaler::from_params(params.scaler.clone())?;
        Ok(Self {
            params,
            cleaner,
            encoder,
            scaler,
        })
    }

    fn input_columns(&self) -> Vec<String> {
        self.params
            .input_schema
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
