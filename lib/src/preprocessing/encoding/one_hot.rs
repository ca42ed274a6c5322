//! One-hot encoding for categorical columns.
//!
//! Each categorical column is replaced by indicator columns named
//! `<column>_<category>`. Categories are learned at fit time and sorted, and
//! with `drop_first` (the default) the first one becomes the implicit
//! baseline: a row holding it has every indicator of the column set to 0.
//! Non-categorical columns are passed through ahead of all indicator blocks.

use crate::preprocessing::encoding::HandleUnknown;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::table::{Column, ColumnData, DataType, Table};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, warn};

/// One-hot encoder for categorical columns.
///
/// # Example
/// ```rust
/// use ames_preprocessing::preprocessing::{FittedTransformer, OneHotEncoder, Transformer};
/// use ames_preprocessing::table::{Column, Table};
///
/// let train = Table::from_columns(vec![Column::categorical(
///     "MSZoning",
///     vec![Some("RL"), Some("RM"), Some("RH")],
/// )])
/// .unwrap();
///
/// let fitted = OneHotEncoder::new().fit(&train).unwrap();
/// assert_eq!(fitted.indicator_names(), vec!["MSZoning_RL", "MSZoning_RM"]);
///
/// let encoded = fitted.transform(&train).unwrap();
/// assert_eq!(encoded.n_cols(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct OneHotEncoder {
    /// Drop the indicator of the first (sorted) category.
    drop_first: bool,
    /// How to handle unknown categories during transform.
    handle_unknown: HandleUnknown,
    /// Categorical columns that are passed through untouched.
    excluded: Vec<String>,
}

impl OneHotEncoder {
    /// Create a new OneHotEncoder with default settings.
    pub fn new() -> Self {
        Self {
            drop_first: true,
            handle_unknown: HandleUnknown::default(),
            excluded: Vec::new(),
        }
    }

    /// Set the strategy for handling unknown categories.
    pub fn with_handle_unknown(mut self, strategy: HandleUnknown) -> Self {
        self.handle_unknown = strategy;
        self
    }

    pub fn with_drop_first(mut self, drop_first: bool) -> Self {
        self.drop_first = drop_first;
        self
    }

    /// Leave the named columns unencoded.
    pub fn with_excluded_columns<S: Into<String>>(mut self, columns: Vec<S>) -> Self {
        self.excluded = columns.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for OneHotEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable parameters for a fitted OneHotEncoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoderParams {
    /// Encoded columns, in fit order.
    pub columns: Vec<String>,
    /// Sorted categories for each encoded column.
    pub categories: Vec<Vec<String>>,
    pub drop_first: bool,
    pub handle_unknown: HandleUnknown,
    /// Categorical columns passed through untouched.
    pub excluded: Vec<String>,
}

/// Fitted OneHotEncoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedOneHotEncoder {
    params: OneHotEncoderParams,
}

impl FittedOneHotEncoder {
    /// Names of the encoded columns.
    pub fn columns(&self) -> &[String] {
        &self.params.columns
    }

    /// Categories learned for each encoded column.
    pub fn categories(&self) -> &[Vec<String>] {
        &self.params.categories
    }

    /// Categories of one column that receive an indicator.
    fn emitted(&self, index: usize) -> &[String] {
        let cats = &self.params.categories[index];
        if self.params.drop_first && !cats.is_empty() {
            &cats[1..]
        } else {
            cats
        }
    }

    /// Names of the indicator columns, in output order.
    pub fn indicator_names(&self) -> Vec<String> {
        self.params
            .columns
            .iter()
            .enumerate()
            .flat_map(|(i, col)| {
                self.emitted(i)
                    .iter()
                    .map(move |cat| format!("{}_{}", col, cat))
            })
            .collect()
    }

    /// Total number of indicator columns produced.
    pub fn n_indicators(&self) -> usize {
        (0..self.params.columns.len())
            .map(|i| self.emitted(i).len())
            .sum()
    }

    /// Fail if an indicator name repeats or equals a column passed through from `table`.
    fn check_indicator_names(&self, table: &Table) -> Result<(), PreprocessingError> {
        let mut taken: HashSet<String> = table
            .columns()
            .iter()
            .filter(|c| !self.params.columns.contains(&c.name))
            .filter(|c| c.dtype() != DataType::Categorical || self.is_excluded(&c.name))
            .map(|c| c.name.clone())
            .collect();
        for (index, name) in self.params.columns.iter().enumerate() {
            for cat in self.emitted(index) {
                let indicator = format!("{}_{}", name, cat);
                if !taken.insert(indicator.clone()) {
                    return Err(PreprocessingError::InvalidParameter(format!(
                        "indicator '{}' for column '{}' collides with an existing column",
                        indicator, name
                    )));
                }
            }
        }
        Ok(())
    }

    fn is_excluded(&self, name: &str) -> bool {
        self.params.excluded.iter().any(|e| e == name)
    }

    fn encode_column(&self, index: usize, column: &Column) -> Result<Vec<Column>, PreprocessingError> {
        let name = &self.params.columns[index];
        let values = match &column.data {
            ColumnData::Categorical(v) => v,
            other => {
                return Err(PreprocessingError::TypeMismatch {
                    column: name.clone(),
                    expected: DataType::Categorical.to_string(),
                    got: other.dtype().to_string(),
                })
            }
        };

        let cats = &self.params.categories[index];
        let emitted = self.emitted(index);
        let offset = cats.len() - emitted.len();
        let mut indicators = vec![vec![false; values.len()]; emitted.len()];
        let mut unknown = 0usize;

        for (row, value) in values.iter().enumerate() {
            let Some(value) = value else { continue };
            match cats.binary_search(value) {
                Ok(idx) if idx >= offset => indicators[idx - offset][row] = true,
                Ok(_) => {}
                Err(_) => {
                    if self.params.handle_unknown == HandleUnknown::Error {
                        return Err(PreprocessingError::UnknownCategory {
                            column: name.clone(),
                            value: value.clone(),
                        });
                    }
                    unknown += 1;
                }
            }
        }
        if unknown > 0 {
            debug!(column = %name, unknown, "unseen categories encoded as zeros");
        }

        Ok(emitted
            .iter()
            .zip(indicators)
            .map(|(cat, flags)| Column::indicator(format!("{}_{}", name, cat), flags))
            .collect())
    }
}

impl Transformer for OneHotEncoder {
    type Params = OneHotEncoderParams;
    type Fitted = FittedOneHotEncoder;

    fn fit(&self, table: &Table) -> Result<Self::Fitted, PreprocessingError> {
        if table.n_rows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit OneHotEncoder on empty data".to_string(),
            ));
        }

        let mut columns = Vec::new();
        let mut categories = Vec::new();
        for column in table.columns() {
            let ColumnData::Categorical(values) = &column.data else {
                continue;
            };
            if self.excluded.contains(&column.name) {
                continue;
            }
            let unique: BTreeSet<&String> = values.iter().flatten().collect();
            columns.push(column.name.clone());
            categories.push(unique.into_iter().cloned().collect::<Vec<_>>());
        }

        let fitted = FittedOneHotEncoder {
            params: OneHotEncoderParams {
                columns,
                categories,
                drop_first: self.drop_first,
                handle_unknown: self.handle_unknown,
                excluded: self.excluded.clone(),
            },
        };
        fitted.check_indicator_names(table)?;
        debug!(
            columns = fitted.params.columns.len(),
            indicators = fitted.n_indicators(),
            "fitted one-hot encoder"
        );
        Ok(fitted)
    }
}

impl FittedTransformer for FittedOneHotEncoder {
    type Params = OneHotEncoderParams;

    fn transform(&self, table: &Table) -> Result<Table, PreprocessingError> {
        let missing: Vec<String> = self
            .params
            .columns
            .iter()
            .filter(|c| !table.has_column(c))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(PreprocessingError::schema_mismatch("encode", missing));
        }

        self.check_indicator_names(table)?;

        let mut output = Vec::with_capacity(table.n_cols() + self.n_indicators());
        for column in table.columns() {
            let encoded = self.params.columns.contains(&column.name);
            if encoded {
                continue;
            }
            if column.dtype() == DataType::Categorical && !self.is_excluded(&column.name) {
                warn!(column = %column.name, "dropping categorical column not seen during fit");
                continue;
            }
            output.push(column.clone());
        }

        for (index, name) in self.params.columns.iter().enumerate() {
            if let Some(column) = table.column(name) {
                output.extend(self.encode_column(index, column)?);
            }
        }

        Table::from_columns(output)
    }

    /// Rebuild the categorical columns from their indicators.
    ///
    /// A row with no active indicator maps to the baseline category when
    /// `drop_first` is set, and to a missing cell otherwise.
    fn inverse_transform(&self, table: &Table) -> Result<Table, PreprocessingError> {
        let indicator_names = self.indicator_names();
        let missing: Vec<String> = indicator_names
            .iter()
            .filter(|c| !table.has_column(c))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(PreprocessingError::schema_mismatch("inverse encode", missing));
        }

        let mut output: Vec<Column> = table
            .columns()
            .iter()
            .filter(|c| !indicator_names.contains(&c.name))
            .cloned()
            .collect();

        for (index, name) in self.params.columns.iter().enumerate() {
            let baseline = if self.params.drop_first {
                self.params.categories[index].first().cloned()
            } else {
                None
            };
            let mut values = vec![baseline; table.n_rows()];
            for cat in self.emitted(index) {
                let indicator_name = format!("{}_{}", name, cat);
                let Some(column) = table.column(&indicator_name) else {
                    continue;
                };
                let flags = column.data.as_f64().ok_or_else(|| PreprocessingError::TypeMismatch {
                    column: indicator_name.clone(),
                    expected: DataType::Indicator.to_string(),
                    got: column.dtype().to_string(),
                })?;
                for (row, flag) in flags.into_iter().enumerate() {
                    if flag.is_some_and(|f| f > 0.5) {
                        values[row] = Some(cat.clone());
                    }
                }
            }
            output.push(Column::new(name.clone(), ColumnData::Categorical(values)));
        }

        Table::from_columns(output)
    }

    fn extract_params(&self) -> Self::Params {
        self.params.clone()
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.columns.len() != params.categories.len() {
            return Err(PreprocessingError::InvalidParameter(format!(
                "{} encoded columns but {} category lists",
                params.columns.len(),
                params.categories.len()
            )));
        }
        let mut params = params;
        for cats in &mut params.categories {
            cats.sort();
            cats.dedup();
        }
        Ok(Self { params })
    }

    fn input_columns(&self) -> Vec<String> {
        self.params.columns.clone()
    }
}
