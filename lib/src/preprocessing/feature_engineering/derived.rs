//! Derived area and age features.
//!
//! - `TotalSF = TotalBsmtSF + 1stFlrSF + 2ndFlrSF`, where an absent input
//!   counts as zero.
//! - `HouseAge = YrSold - YearBuilt` and `RemodAge = YrSold - YearRemodAdd`,
//!   each added only when both of its inputs exist.
//!
//! A missing cell in any input yields a missing result for that row. The
//! result is an integer column when every input is, and float otherwise.

use crate::config::{AgeFeature, PipelineConfig};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::StatelessTransformer;
use crate::table::{Column, ColumnData, DataType, Table};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Adds the summed area feature and the age features to a table.
///
/// # Example
/// ```rust
/// use ames_preprocessing::preprocessing::feature_engineer;
/// use ames_preprocessing::table::{Column, Table, Value};
///
/// let table = Table::from_columns(vec![
///     Column::integer("TotalBsmtSF", vec![Some(800)]),
///     Column::integer("1stFlrSF", vec![Some(900)]),
///     Column::integer("YearBuilt", vec![Some(2000)]),
///     Column::integer("YrSold", vec![Some(2010)]),
/// ])
/// .unwrap();
///
/// let out = feature_engineer(&table).unwrap();
/// assert_eq!(out.column("TotalSF").unwrap().data.get(0), Some(Value::Integer(1700)));
/// assert_eq!(out.column("HouseAge").unwrap().data.get(0), Some(Value::Integer(10)));
/// assert!(!out.has_column("RemodAge"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureEngineer {
    total_area_column: String,
    total_area_inputs: Vec<String>,
    sold_year_column: String,
    age_features: Vec<AgeFeature>,
}

impl Default for FeatureEngineer {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl FeatureEngineer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            total_area_column: config.total_area_column.clone(),
            total_area_inputs: config.total_area_inputs.clone(),
            sold_year_column: config.sold_year_column.clone(),
            age_features: config.age_features.clone(),
        }
    }

    /// Names of every column this engineer may add.
    pub fn derived_columns(&self) -> Vec<String> {
        std::iter::once(self.total_area_column.clone())
            .chain(self.age_features.iter().map(|f| f.name.clone()))
            .collect()
    }

    /// Columns the derived features are computed from.
    pub fn input_columns(&self) -> Vec<String> {
        let mut inputs = self.total_area_inputs.clone();
        inputs.push(self.sold_year_column.clone());
        inputs.extend(self.age_features.iter().map(|f| f.reference_column.clone()));
        inputs
    }
}

fn require_numeric(column: &Column) -> Result<(), PreprocessingError> {
    match column.dtype() {
        DataType::Integer | DataType::Float => Ok(()),
        other => Err(PreprocessingError::TypeMismatch {
            column: column.name.clone(),
            expected: "numeric".to_string(),
            got: other.to_string(),
        }),
    }
}

/// Integer row-wise sum, or `None` if any row overflows `i64`.
fn integer_sum(terms: &[(&Column, i64)], n_rows: usize) -> Option<Vec<Option<i64>>> {
    let mut acc = vec![Some(0i64); n_rows];
    for (column, sign) in terms {
        let ColumnData::Integer(values) = &column.data else {
            return None;
        };
        for (a, x) in acc.iter_mut().zip(values) {
            *a = match (*a, *x) {
                (Some(a), Some(x)) => Some(x.checked_mul(*sign)?.checked_add(a)?),
                _ => None,
            };
        }
    }
    Some(acc)
}

/// Row-wise `sum(sign * column)` over the terms.
///
/// Integer inputs give an integer column unless the sum overflows, in which
/// case the result is float.
fn signed_sum(
    name: &str,
    terms: &[(&Column, i64)],
    n_rows: usize,
) -> Result<Column, PreprocessingError> {
    for (column, _) in terms {
        require_numeric(column)?;
    }

    if terms.iter().all(|(c, _)| c.dtype() == DataType::Integer) {
        if let Some(acc) = integer_sum(terms, n_rows) {
            return Ok(Column::integer(name, acc));
        }
        debug!(column = %name, "integer overflow, computing as float");
    }

    let mut acc = vec![Some(0.0f64); n_rows];
    for (column, sign) in terms {
        let values = column.data.as_f64().unwrap_or_default();
        for (a, x) in acc.iter_mut().zip(values) {
            *a = a.zip(x).map(|(a, x)| a + *sign as f64 * x);
        }
    }
    Ok(Column::float(name, acc))
}

impl StatelessTransformer for FeatureEngineer {
    fn transform_direct(&self, table: &Table) -> Result<Table, PreprocessingError> {
        let mut out = table.clone();
        let n_rows = table.n_rows();

        let area_terms: Vec<(&Column, i64)> = self
            .total_area_inputs
            .iter()
            .filter_map(|name| table.column(name))
            .map(|c| (c, 1))
            .collect();
        out.set_column(signed_sum(&self.total_area_column, &area_terms, n_rows)?)?;

        let sold = table.column(&self.sold_year_column);
        for feature in &self.age_features {
            match (sold, table.column(&feature.reference_column)) {
                (Some(sold), Some(reference)) => {
                    let age = signed_sum(&feature.name, &[(sold, 1), (reference, -1)], n_rows)?;
                    out.set_column(age)?;
                }
                _ => debug!(feature = %feature.name, "skipping age feature with absent input"),
            }
        }

        Ok(out)
    }
}

/// Add derived features using the default column names.
pub fn feature_engineer(table: &Table) -> Result<Table, PreprocessingError> {
    FeatureEngineer::new().transform_direct(table)
}
