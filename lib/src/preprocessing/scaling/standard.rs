//! Standard Scaler (Z-score normalization).
//!
//! Transforms numeric columns by removing the mean and scaling to unit variance.
//!
//! The standard score of a value `x` is calculated as:
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the mean of the fit column and `s` its population standard
//! deviation. A constant column gets `s = 1`, so it is only centered.
//!
//! Integer and float columns are scaled; categorical and indicator columns
//! pass through, as do columns named in `excluded` (the regression target).
//!
//! # Example
//! ```rust
//! use ames_preprocessing::preprocessing::{FittedTransformer, StandardScaler, Transformer};
//! use ames_preprocessing::table::{Column, Table};
//!
//! let table = Table::from_columns(vec![
//!     Column::float("GrLivArea", vec![Some(1000.0), Some(2000.0), Some(3000.0)]),
//!     Column::integer("SalePrice", vec![Some(100), Some(200), Some(300)]),
//! ])
//! .unwrap();
//!
//! let fitted = StandardScaler::new()
//!     .with_excluded_columns(vec!["SalePrice"])
//!     .fit(&table)
//!     .unwrap();
//! let (mean, std) = fitted.stats("GrLivArea").unwrap();
//! assert_eq!(mean, 2000.0);
//! assert!((std - 816.496_580_9).abs() < 1e-6);
//!
//! let scaled = fitted.transform(&table).unwrap();
//! assert_eq!(scaled.column("SalePrice"), table.column("SalePrice"));
//! ```

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::table::{Column, ColumnData, DataType, Table};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerConfig {
    /// If True, center the data before scaling.
    pub with_mean: bool,
    /// If True, scale the data to unit variance.
    pub with_std: bool,
}

impl Default for StandardScalerConfig {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
        }
    }
}

/// Serializable parameters for a fitted StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerParams {
    /// Configuration options.
    pub config: StandardScalerConfig,
    /// Scaled columns, in fit order.
    pub columns: Vec<String>,
    /// Mean of each column (0 if with_mean=False).
    pub mean: Vec<f64>,
    /// Standard deviation of each column (1 if with_std=False or constant).
    pub std: Vec<f64>,
    /// Numeric columns left unscaled.
    pub excluded: Vec<String>,
}

/// StandardScaler transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct StandardScaler {
    config: StandardScalerConfig,
    excluded: Vec<String>,
}

impl StandardScaler {
    /// Create a new StandardScaler with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to center data by mean.
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.config.with_mean = with_mean;
        self
    }

    /// Set whether to scale data to unit variance.
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.config.with_std = with_std;
        self
    }

    /// Leave the named numeric columns unscaled.
    pub fn with_excluded_columns<S: Into<String>>(mut self, columns: Vec<S>) -> Self {
        self.excluded = columns.into_iter().map(Into::into).collect();
        self
    }
}

fn is_scalable(column: &Column) -> bool {
    matches!(column.dtype(), DataType::Integer | DataType::Float)
}

/// Population mean and standard deviation of the present values.
fn column_stats(values: &[Option<f64>]) -> (f64, f64) {
    let present: Array1<f64> = values.iter().flatten().copied().collect();
    match present.mean() {
        Some(mean) => (mean, present.std(0.0)),
        None => (0.0, 1.0),
    }
}

impl Transformer for StandardScaler {
    type Params = StandardScalerParams;
    type Fitted = FittedStandardScaler;

    fn fit(&self, table: &Table) -> Result<Self::Fitted, PreprocessingError> {
        if table.n_rows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit StandardScaler on empty data".to_string(),
            ));
        }

        let mut columns = Vec::new();
        let mut mean = Vec::new();
        let mut std = Vec::new();
        for column in table.columns() {
            if !is_scalable(column) || self.excluded.contains(&column.name) {
                continue;
            }
            let Some(values) = column.data.as_f64() else {
                continue;
            };
            let (m, s) = column_stats(&values);
            columns.push(column.name.clone());
            mean.push(if self.config.with_mean { m } else { 0.0 });
            // Handle zero std (constant features)
            std.push(if self.config.with_std && s != 0.0 { s } else { 1.0 });
        }
        debug!(columns = columns.len(), "fitted standard scaler");

        Ok(FittedStandardScaler {
            params: StandardScalerParams {
                config: self.config.clone(),
                columns,
                mean,
                std,
                excluded: self.excluded.clone(),
            },
        })
    }
}

/// Fitted StandardScaler ready for inference.
#[derive(Clone, Debug)]
pub struct FittedStandardScaler {
    params: StandardScalerParams,
}

impl FittedStandardScaler {
    /// Get the mean values for each scaled column.
    pub fn mean(&self) -> &[f64] {
        &self.params.mean
    }

    /// Get the standard deviation values for each scaled column.
    pub fn std(&self) -> &[f64] {
        &self.params.std
    }

    /// Names of the scaled columns.
    pub fn columns(&self) -> &[String] {
        &self.params.columns
    }

    /// `(mean, std)` learned for one column.
    pub fn stats(&self, column: &str) -> Option<(f64, f64)> {
        let i = self.params.columns.iter().position(|c| c == column)?;
        Some((self.params.mean[i], self.params.std[i]))
    }

    /// Apply `f(value, mean, std)` to every scaled column of `table`.
    fn map_columns(
        &self,
        table: &Table,
        stage: &str,
        f: impl Fn(f64, f64, f64) -> f64,
    ) -> Result<Table, PreprocessingError> {
        let missing: Vec<String> = self
            .params
            .columns
            .iter()
            .filter(|c| !table.has_column(c))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(PreprocessingError::schema_mismatch(stage, missing));
        }

        let mut out = table.clone();
        for column in out.columns_mut() {
            let Some((mean, std)) = self.stats(&column.name) else {
                continue;
            };
            let values = match column.dtype() {
                DataType::Integer | DataType::Float => column.data.as_f64(),
                _ => None,
            }
            .ok_or_else(|| PreprocessingError::TypeMismatch {
                column: column.name.clone(),
                expected: "numeric".to_string(),
                got: column.dtype().to_string(),
            })?;
            column.data = ColumnData::Float(
                values
                    .into_iter()
                    .map(|v| v.map(|x| f(x, mean, std)))
                    .collect(),
            );
        }
        Ok(out)
    }
}

impl FittedTransformer for FittedStandardScaler {
    type Params = StandardScalerParams;

    fn transform(&self, table: &Table) -> Result<Table, PreprocessingError> {
        self.map_columns(table, "scale", |x, mean, std| (x - mean) / std)
    }

    fn inverse_transform(&self, table: &Table) -> Result<Table, PreprocessingError> {
        self.map_columns(table, "inverse scale", |z, mean, std| z * std + mean)
    }

    fn extract_params(&self) -> Self::Params {
        self.params.clone()
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        let n = params.columns.len();
        if params.mean.len() != n || params.std.len() != n {
            return Err(PreprocessingError::InvalidParameter(format!(
                "{} scaled columns but {} means and {} standard deviations",
                n,
                params.mean.len(),
                params.std.len()
            )));
        }
        if let Some(pos) = params.std.iter().position(|&s| s == 0.0 || !s.is_finite()) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "standard deviation of '{}' must be finite and non-zero",
                params.columns[pos]
            )));
        }
        Ok(Self { params })
    }

    fn input_columns(&self) -> Vec<String> {
        self.params.columns.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn create_test_table() -> Table {
        // [[0, 1], [0, 1], [1, 3]]
        Table::from_columns(vec![
            Column::integer("a", vec![Some(0), Some(0), Some(1)]),
            Column::float("b", vec![Some(1.0), Some(1.0), Some(3.0)]),
            Column::categorical("c", vec![Some("x"), Some("y"), Some("x")]),
            Column::indicator("d_y", vec![false, true, false]),
            Column::integer("SalePrice", vec![Some(100), Some(200), Some(300)]),
        ])
        .unwrap()
    }

    fn floats(table: &Table, name: &str) -> Vec<f64> {
        table
            .column(name)
            .unwrap()
            .data
            .as_f64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect()
    }

    #[test]
    fn test_standard_scaler_fit() {
        let scaler = StandardScaler::new().with_excluded_columns(vec!["SalePrice"]);
        let fitted = scaler.fit(&create_test_table()).unwrap();

        assert_eq!(fitted.columns(), ["a", "b"]);
        // Mean: [1/3, 5/3]
        assert_abs_diff_eq!(fitted.mean()[0], 1.0 / 3.0, epsilon = 1e-10);
        assert_abs_diff_eq!(fitted.mean()[1], 5.0 / 3.0, epsilon = 1e-10);
        assert_abs_diff_eq!(fitted.std()[0], (2.0f64 / 9.0).sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn test_standard_scaler_transform() {
        let table = create_test_table();
        let fitted = StandardScaler::new()
            .with_excluded_columns(vec!["SalePrice"])
            .fit(&table)
            .unwrap();
        let transformed = fitted.transform(&table).unwrap();

        for name in ["a", "b"] {
            let values = Array1::from(floats(&transformed, name));
            assert_abs_diff_eq!(values.mean().unwrap(), 0.0, epsilon = 1e-10);
            assert_abs_diff_eq!(values.std(0.0), 1.0, epsilon = 1e-10);
        }
        assert_eq!(transformed.column_names(), table.column_names());
        assert_eq!(transformed.column("c"), table.column("c"));
        assert_eq!(transformed.column("d_y"), table.column("d_y"));
        assert_eq!(transformed.column("SalePrice"), table.column("SalePrice"));
    }

    #[test]
    fn test_standard_scaler_constant_column() {
        let table = Table::from_columns(vec![Column::float(
            "PoolArea",
            vec![Some(5.0), Some(5.0), Some(5.0)],
        )])
        .unwrap();
        let fitted = StandardScaler::new().fit(&table).unwrap();
        assert_eq!(fitted.stats("PoolArea"), Some((5.0, 1.0)));
        assert_eq!(floats(&fitted.transform(&table).unwrap(), "PoolArea"), vec![0.0; 3]);
    }

    #[test]
    fn test_standard_scaler_ignores_missing_cells() {
        let table =
            Table::from_columns(vec![Column::float("x", vec![Some(1.0), None, Some(3.0)])])
                .unwrap();
        let fitted = StandardScaler::new().fit(&table).unwrap();
        assert_eq!(fitted.stats("x"), Some((2.0, 1.0)));

        let scaled = fitted.transform(&table).unwrap();
        assert_eq!(
            scaled.column("x").unwrap().data,
            ColumnData::Float(vec![Some(-1.0), None, Some(1.0)])
        );
    }

    #[test]
    fn test_standard_scaler_without_mean_or_std() {
        let table = create_test_table();
        let fitted = StandardScaler::new()
            .with_mean(false)
            .with_std(false)
            .fit(&table)
            .unwrap();
        assert_eq!(floats(&fitted.transform(&table).unwrap(), "b"), vec![1.0, 1.0, 3.0]);
    }

    #[test]
    fn test_standard_scaler_inverse_transform() {
        let table = create_test_table();
        let fitted = StandardScaler::new().fit(&table).unwrap();
        let recovered = fitted
            .inverse_transform(&fitted.transform(&table).unwrap())
            .unwrap();

        for (o, r) in floats(&table, "b").iter().zip(floats(&recovered, "b")) {
            assert_abs_diff_eq!(*o, r, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_standard_scaler_missing_columns() {
        let fitted = StandardScaler::new().fit(&create_test_table()).unwrap();
        let partial =
            Table::from_columns(vec![Column::integer("SalePrice", vec![Some(1)])]).unwrap();

        assert_eq!(
            fitted.transform(&partial).unwrap_err(),
            PreprocessingError::SchemaMismatch {
                stage: "scale".to_string(),
                missing: vec!["a".to_string(), "b".to_string()],
            }
        );
    }

    #[test]
    fn test_standard_scaler_type_mismatch() {
        let fitted = StandardScaler::new().fit(&create_test_table()).unwrap();
        let mut table = create_test_table();
        table
            .set_column(Column::categorical("a", vec![Some("1"), Some("2"), Some("3")]))
            .unwrap();
        assert!(matches!(
            fitted.transform(&table),
            Err(PreprocessingError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_standard_scaler_empty_data() {
        assert!(matches!(
            StandardScaler::new().fit(&Table::new()),
            Err(PreprocessingError::EmptyData(_))
        ));
    }

    #[test]
    fn test_standard_scaler_from_params_rejects_zero_std() {
        let params = StandardScalerParams {
            config: StandardScalerConfig::default(),
            columns: vec!["a".to_string()],
            mean: vec![0.0],
            std: vec![0.0],
            excluded: Vec::new(),
        };
        assert!(FittedStandardScaler::from_params(params).is_err());
    }

    #[test]
    fn test_standard_scaler_serialization() {
        let fitted = StandardScaler::new().fit(&create_test_table()).unwrap();

        let temp_file = std::env::temp_dir().join("test_standard_scaler.bin");
        fitted.save_to_file(&temp_file).unwrap();
        let loaded = FittedStandardScaler::load_from_file(&temp_file).unwrap();

        assert_eq!(loaded.extract_params(), fitted.extract_params());

        std::fs::remove_file(temp_file).ok();
    }
}
