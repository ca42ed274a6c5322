//! Cleaner: column dropping and missing-value imputation.
//!
//! Policies, applied in order:
//! 1. Identifier and low-value columns are dropped if present.
//! 2. The frontage column is filled with its median from the fit table.
//! 3. Every other numeric column is filled with a constant (0 by default).
//! 4. Categorical columns are filled with a sentinel label (`"None"`).
//!
//! # Example
//! ```rust
//! use ames_preprocessing::preprocessing::clean;
//! use ames_preprocessing::table::{Column, Table};
//!
//! let raw = Table::from_columns(vec![
//!     Column::integer("PID", vec![Some(526301100), Some(526350040), Some(526351010)]),
//!     Column::float("LotFrontage", vec![Some(60.0), None, Some(80.0)]),
//! ])
//! .unwrap();
//!
//! let cleaned = clean(&raw).unwrap();
//! assert!(!cleaned.has_column("PID"));
//! assert_eq!(cleaned.null_count(), 0);
//! ```

use crate::config::PipelineConfig;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::table::{ColumnData, DataType, Table};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Serializable parameters for a fitted [`Cleaner`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CleanerParams {
    /// Columns removed when present.
    pub drop_columns: Vec<String>,
    /// Column imputed with the fit-time median.
    pub frontage_column: String,
    /// Median of the frontage column at fit time (`None` if absent or all missing).
    pub frontage_median: Option<f64>,
    /// Fill value for other numeric columns.
    pub numeric_fill: f64,
    /// Fill label for categorical columns.
    pub categorical_fill: String,
}

/// Cleaner (unfitted).
#[derive(Clone, Debug)]
pub struct Cleaner {
    drop_columns: Vec<String>,
    frontage_column: String,
    numeric_fill: f64,
    categorical_fill: String,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl Cleaner {
    /// Create a cleaner with the Ames defaults.
    pub fn new() -> Self {
        Self::from_config(&PipelineConfig::default())
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            drop_columns: config.drop_columns.clone(),
            frontage_column: config.frontage_column.clone(),
            numeric_fill: config.numeric_fill,
            categorical_fill: config.categorical_fill.clone(),
        }
    }

    pub fn with_drop_columns<S: Into<String>>(mut self, columns: Vec<S>) -> Self {
        self.drop_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_frontage_column(mut self, column: impl Into<String>) -> Self {
        self.frontage_column = column.into();
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
}

/// Median of the values; the mean of the middle pair for even counts.
fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = values.len();
    if n % 2 == 0 {
        Some((values[n / 2 - 1] + values[n / 2]) / 2.0)
    } else {
        Some(values[n / 2])
    }
}

/// Fill missing numeric cells with `value`.
///
/// Integer columns stay integer when `value` is integral and are promoted to
/// float otherwise.
fn fill_numeric(data: &mut ColumnData, value: f64) {
    let integral = value.fract() == 0.0 && value.abs() < i64::MAX as f64;
    let promoted = match data {
        ColumnData::Integer(v) if v.iter().any(Option::is_none) && !integral => Some(
            ColumnData::Float(v.iter().map(|x| Some(x.map_or(value, |i| i as f64))).collect()),
        ),
        ColumnData::Integer(v) => {
            for x in v.iter_mut().filter(|x| x.is_none()) {
                *x = Some(value as i64);
            }
            None
        }
        ColumnData::Float(v) => {
            for x in v.iter_mut().filter(|x| x.is_none()) {
                *x = Some(value);
            }
            None
        }
        ColumnData::Categorical(_) | ColumnData::Indicator(_) => None,
    };
    if let Some(p) = promoted {
        *data = p;
    }
}

fn fill_categorical(data: &mut ColumnData, label: &str) {
    if let ColumnData::Categorical(v) = data {
        for x in v.iter_mut().filter(|x| x.is_none()) {
            *x = Some(label.to_string());
        }
    }
}

fn frontage_type_error(column: &str, got: DataType) -> PreprocessingError {
    PreprocessingError::TypeMismatch {
        column: column.to_string(),
        expected: "numeric".to_string(),
        got: got.to_string(),
    }
}

impl Transformer for Cleaner {
    type Params = CleanerParams;
    type Fitted = FittedCleaner;

    fn fit(&self, table: &Table) -> Result<Self::Fitted, PreprocessingError> {
        if table.n_rows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit Cleaner on empty data".to_string(),
            ));
        }

        let frontage_median = match table.column(&self.frontage_column) {
            None => None,
            Some(column) => {
                let values = column
                    .data
                    .as_f64()
                    .filter(|_| column.dtype().is_numeric())
                    .ok_or_else(|| frontage_type_error(&column.name, column.dtype()))?;
                median(values.into_iter().flatten().collect())
            }
        };
        info!(
            column = %self.frontage_column,
            median = ?frontage_median,
            "fitted cleaner"
        );

        Ok(self.with_median(frontage_median))
    }
}

impl Cleaner {
    fn with_median(&self, frontage_median: Option<f64>) -> FittedCleaner {
        FittedCleaner {
            params: CleanerParams {
                drop_columns: self.drop_columns.clone(),
                frontage_column: self.frontage_column.clone(),
                frontage_median,
                numeric_fill: self.numeric_fill,
                categorical_fill: self.categorical_fill.clone(),
            },
        }
    }
}

/// Fitted cleaner ready for inference.
#[derive(Clone, Debug)]
pub struct FittedCleaner {
    params: CleanerParams,
}

impl FittedCleaner {
    /// The frontage median learned at fit time.
    pub fn frontage_median(&self) -> Option<f64> {
        self.params.frontage_median
    }
}

impl FittedTransformer for FittedCleaner {
    type Params = CleanerParams;

    fn transform(&self, table: &Table) -> Result<Table, PreprocessingError> {
        let params = &self.params;
        if let Some(column) = table.column(&params.frontage_column) {
            if !column.dtype().is_numeric() {
                return Err(frontage_type_error(&column.name, column.dtype()));
            }
        }

        let mut out = table.clone();
        let dropped = out.drop_columns(&params.drop_columns);
        let missing_before = out.null_count();

        for column in out.columns_mut() {
            if column.name == params.frontage_column {
                if let Some(m) = params.frontage_median {
                    fill_numeric(&mut column.data, m);
                }
            }
            match column.dtype() {
                DataType::Integer | DataType::Float => {
                    fill_numeric(&mut column.data, params.numeric_fill)
                }
                DataType::Categorical => fill_categorical(&mut column.data, &params.categorical_fill),
                DataType::Indicator => {}
            }
        }

        debug!(
            ?dropped,
            imputed = missing_before,
            rows = out.n_rows(),
            columns = out.n_cols(),
            "cleaned table"
        );
        Ok(out)
    }

    fn extract_params(&self) -> Self::Params {
        self.params.clone()
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        Ok(Self { params })
    }

    fn input_columns(&self) -> Vec<String> {
        vec![self.params.frontage_column.clone()]
    }
}

/// Clean a table with the default policies, computing the median from `table` itself.
///
/// A table with no rows has no median to learn; it is cleaned as-is, so
/// identifier columns are still dropped.
pub fn clean(table: &Table) -> Result<Table, PreprocessingError> {
    let cleaner = Cleaner::new();
    if table.n_rows() == 0 {
        return cleaner.with_median(None).transform(table);
    }
    cleaner.fit_transform(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, Value};

    fn create_test_table() -> Table {
        Table::from_columns(vec![
            Column::integer("Order", vec![Some(1), Some(2), Some(3), Some(4), Some(5)]),
            Column::float(
                "LotFrontage",
                vec![Some(60.0), None, Some(80.0), Some(70.0), None],
            ),
            Column::float("MasVnrArea", vec![None, Some(1.5), Some(0.0), None, Some(3.0)]),
            Column::integer("BsmtFullBath", vec![Some(1), None, Some(0), Some(1), Some(0)]),
            Column::categorical(
                "Alley",
                vec![None, Some("Grvl"), None, Some("Pave"), None],
            ),
            Column::categorical(
                "BsmtQual",
                vec![Some("Gd"), None, Some("TA"), Some("Ex"), None],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(vec![3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(vec![4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(vec![]), None);
    }

    #[test]
    fn test_fit_learns_frontage_median() {
        let fitted = Cleaner::new().fit(&create_test_table()).unwrap();
        assert_eq!(fitted.frontage_median(), Some(70.0));
    }

    #[test]
    fn test_clean_drops_and_fills() {
        let cleaned = clean(&create_test_table()).unwrap();

        assert_eq!(
            cleaned.column_names(),
            vec!["LotFrontage", "MasVnrArea", "BsmtFullBath", "BsmtQual"]
        );
        assert_eq!(cleaned.null_count(), 0);
        assert_eq!(
            cleaned.column("LotFrontage").unwrap().data,
            ColumnData::Float(vec![
                Some(60.0),
                Some(70.0),
                Some(80.0),
                Some(70.0),
                Some(70.0)
            ])
        );
        assert_eq!(
            cleaned.column("MasVnrArea").unwrap().data,
            ColumnData::Float(vec![Some(0.0), Some(1.5), Some(0.0), Some(0.0), Some(3.0)])
        );
        assert_eq!(
            cleaned.column("BsmtFullBath").unwrap().data,
            ColumnData::Integer(vec![Some(1), Some(0), Some(0), Some(1), Some(0)])
        );
        assert_eq!(cleaned.row(1).unwrap()[3], ("BsmtQual", Value::Category("None".into())));
    }

    #[test]
    fn test_clean_is_idempotent() {
        let once = clean(&create_test_table()).unwrap();
        let twice = clean(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_apply_mode_uses_fit_median() {
        let fitted = Cleaner::new().fit(&create_test_table()).unwrap();
        let new_rows = Table::from_columns(vec![Column::float(
            "LotFrontage",
            vec![None, Some(200.0), Some(300.0)],
        )])
        .unwrap();

        let cleaned = fitted.transform(&new_rows).unwrap();
        assert_eq!(cleaned.row(0).unwrap()[0], ("LotFrontage", Value::Float(70.0)));
    }

    #[test]
    fn test_missing_frontage_column_is_skipped() {
        let mut table = create_test_table();
        table.drop_columns(&["LotFrontage"]);
        let fitted = Cleaner::new().fit(&table).unwrap();
        assert_eq!(fitted.frontage_median(), None);
        assert_eq!(fitted.transform(&table).unwrap().null_count(), 0);
    }

    #[test]
    fn test_all_missing_frontage_falls_back_to_numeric_fill() {
        let table =
            Table::from_columns(vec![Column::float("LotFrontage", vec![None, None])]).unwrap();
        let cleaned = clean(&table).unwrap();
        assert_eq!(
            cleaned.column("LotFrontage").unwrap().data,
            ColumnData::Float(vec![Some(0.0), Some(0.0)])
        );
    }

    #[test]
    fn test_integer_frontage_promoted_for_fractional_median() {
        let table = Table::from_columns(vec![Column::integer(
            "LotFrontage",
            vec![Some(60), Some(61), None],
        )])
        .unwrap();
        let cleaned = clean(&table).unwrap();
        assert_eq!(
            cleaned.column("LotFrontage").unwrap().data,
            ColumnData::Float(vec![Some(60.0), Some(61.0), Some(60.5)])
        );
    }

    #[test]
    fn test_categorical_frontage_rejected() {
        let table = Table::from_columns(vec![Column::categorical(
            "LotFrontage",
            vec![Some("wide")],
        )])
        .unwrap();
        assert!(matches!(
            Cleaner::new().fit(&table),
            Err(PreprocessingError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_custom_fill_values() {
        let cleaner = Cleaner::new()
            .with_drop_columns(Vec::<String>::new())
            .with_numeric_fill(-1.0)
            .with_categorical_fill("Missing");
        let cleaned = cleaner.fit_transform(&create_test_table()).unwrap();
        assert!(cleaned.has_column("Alley"));
        assert_eq!(cleaned.row(0).unwrap()[4], ("Alley", Value::Category("Missing".into())));
        assert_eq!(cleaned.row(0).unwrap()[2], ("MasVnrArea", Value::Float(-1.0)));
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(matches!(
            Cleaner::new().fit(&Table::new()),
            Err(PreprocessingError::EmptyData(_))
        ));
    }

    #[test]
    fn test_clean_passes_empty_table_through() {
        let table = Table::from_columns(vec![
            Column::integer("Order", Vec::new()),
            Column::float("LotFrontage", Vec::new()),
            Column::categorical("MSZoning", Vec::<Option<&str>>::new()),
        ])
        .unwrap();
        let cleaned = clean(&table).unwrap();
        assert_eq!(cleaned.n_rows(), 0);
        assert_eq!(cleaned.column_names(), vec!["LotFrontage", "MSZoning"]);
    }

    #[test]
    fn test_params_round_trip_through_file() {
        let fitted = Cleaner::new().fit(&create_test_table()).unwrap();
        let path = std::env::temp_dir().join("test_cleaner.bin");
        fitted.save_to_file(&path).unwrap();

        let loaded = FittedCleaner::load_from_file(&path).unwrap();
        assert_eq!(loaded.extract_params(), fitted.extract_params());

        std::fs::remove_file(path).ok();
    }
}
