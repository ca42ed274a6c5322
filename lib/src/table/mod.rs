//! In-memory column-oriented tables.
//!
//! A [`Table`] is an ordered list of named, typed, nullable columns that all
//! share the same number of rows. The column set is dynamic: it is whatever
//! the loaded dataset contains, and every preprocessing stage produces a new
//! table rather than mutating its input.
//!
//! # Example
//!
//! ```rust
//! use ames_preprocessing::table::{Column, Table};
//!
//! let table = Table::from_columns(vec![
//!     Column::integer("YearBuilt", vec![Some(1990), Some(2001)]),
//!     Column::float("LotFrontage", vec![Some(65.0), None]),
//!     Column::categorical("MSZoning", vec![Some("RL"), None]),
//! ])
//! .unwrap();
//!
//! assert_eq!(table.n_rows(), 2);
//! assert_eq!(table.null_count(), 2);
//! ```

use crate::preprocessing::error::PreprocessingError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

mod csv_io;
mod sample;
pub mod schema;

pub use csv_io::{read_csv, read_processed_csv, write_csv, MISSING_TOKENS};
pub use sample::train_test_split;
pub use schema::{ColumnRole, DataType, Field, Schema};

/// A single cell value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Category(String),
    Indicator(bool),
    Missing,
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric view of the value; indicators map to 0/1, categories to `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Indicator(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Category(_) | Value::Missing => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Category(s) => write!(f, "{}", s),
            Value::Indicator(b) => write!(f, "{}", u8::from(*b)),
            Value::Missing => Ok(()),
        }
    }
}

/// Typed storage for one column.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Categorical(Vec<Option<String>>),
    Indicator(Vec<bool>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Integer(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Categorical(v) => v.len(),
            ColumnData::Indicator(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> DataType {
        match self {
            ColumnData::Integer(_) => DataType::Integer,
            ColumnData::Float(_) => DataType::Float,
            ColumnData::Categorical(_) => DataType::Categorical,
            ColumnData::Indicator(_) => DataType::Indicator,
        }
    }

    /// Number of missing cells.
    pub fn null_count(&self) -> usize {
        match self {
            ColumnData::Integer(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Float(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Categorical(v) => v.iter().filter(|x| x.is_none()).count(),
            ColumnData::Indicator(_) => 0,
        }
    }

    pub fn get(&self, row: usize) -> Option<Value> {
        if row >= self.len() {
            return None;
        }
        let value = match self {
            ColumnData::Integer(v) => v[row].map(Value::Integer),
            ColumnData::Float(v) => v[row].map(Value::Float),
            ColumnData::Categorical(v) => v[row].clone().map(Value::Category),
            ColumnData::Indicator(v) => Some(Value::Indicator(v[row])),
        };
        Some(value.unwrap_or(Value::Missing))
    }

    /// Numeric view of the column, or `None` for categorical data.
    pub fn as_f64(&self) -> Option<Vec<Option<f64>>> {
        match self {
            ColumnData::Integer(v) => Some(v.iter().map(|x| x.map(|i| i as f64)).collect()),
            ColumnData::Float(v) => Some(v.clone()),
            ColumnData::Indicator(v) => Some(
                v.iter()
                    .map(|&b| Some(if b { 1.0 } else { 0.0 }))
                    .collect(),
            ),
            ColumnData::Categorical(_) => None,
        }
    }

    /// Gather the given row indices into a new column.
    pub fn take(&self, indices: &[usize]) -> ColumnData {
        match self {
            ColumnData::Integer(v) => ColumnData::Integer(indices.iter().map(|&i| v[i]).collect()),
            ColumnData::Float(v) => ColumnData::Float(indices.iter().map(|&i| v[i]).collect()),
            ColumnData::Categorical(v) => {
                ColumnData::Categorical(indices.iter().map(|&i| v[i].clone()).collect())
            }
            ColumnData::Indicator(v) => {
                ColumnData::Indicator(indices.iter().map(|&i| v[i]).collect())
            }
        }
    }
}

/// A named column.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn integer(name: impl Into<String>, values: Vec<Option<i64>>) -> Self {
        Self::new(name, ColumnData::Integer(values))
    }

    pub fn float(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Float(values))
    }

    pub fn categorical<S: Into<String>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        Self::new(
            name,
            ColumnData::Categorical(values.into_iter().map(|v| v.map(Into::into)).collect()),
        )
    }

    pub fn indicator(name: impl Into<String>, values: Vec<bool>) -> Self {
        Self::new(name, ColumnData::Indicator(values))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dtype(&self) -> DataType {
        self.data.dtype()
    }
}

/// An ordered collection of equally long columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Create an empty table with no rows and no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from columns, checking lengths and name uniqueness.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, PreprocessingError> {
        let n_rows = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = HashSet::new();
        for column in &columns {
            if column.len() != n_rows {
                return Err(PreprocessingError::LengthMismatch {
                    column: column.name.clone(),
                    expected: n_rows,
                    got: column.len(),
                });
            }
            if !seen.insert(column.name.as_str()) {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "duplicate column name '{}'",
                    column.name
                )));
            }
        }
        Ok(Self { columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Mutable access to the columns. Cell values may change, lengths must not.
    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Insert a column, replacing an existing one of the same name in place.
    pub fn set_column(&mut self, column: Column) -> Result<(), PreprocessingError> {
        let len = column.len();
        if !self.columns.is_empty() && len != self.n_rows {
            return Err(PreprocessingError::LengthMismatch {
                column: column.name,
                expected: self.n_rows,
                got: len,
            });
        }
        if self.columns.is_empty() {
            self.n_rows = column.len();
        }
        match self.position(&column.name) {
            Some(idx) => self.columns[idx] = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    /// Remove the named columns that are present; absent names are ignored.
    ///
    /// Returns the names that were actually removed.
    pub fn drop_columns<S: AsRef<str>>(&mut self, names: &[S]) -> Vec<String> {
        let targets: HashSet<&str> = names.iter().map(AsRef::as_ref).collect();
        let mut dropped = Vec::new();
        self.columns.retain(|c| {
            if targets.contains(c.name.as_str()) {
                dropped.push(c.name.clone());
                false
            } else {
                true
            }
        });
        dropped
    }

    /// New table holding the named columns in the given order.
    ///
    /// Every name must be present; all absent names are reported together.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Table, PreprocessingError> {
        let missing: Vec<String> = names
            .iter()
            .map(AsRef::as_ref)
            .filter(|n| !self.has_column(n))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(PreprocessingError::schema_mismatch("select", missing));
        }
        let columns = names
            .iter()
            .filter_map(|n| self.column(n.as_ref()).cloned())
            .collect();
        Ok(Table {
            columns,
            n_rows: self.n_rows,
        })
    }

    /// Values of one row, paired with their column names.
    pub fn row(&self, index: usize) -> Option<Vec<(&str, Value)>> {
        if index >= self.n_rows {
            return None;
        }
        Some(
            self.columns
                .iter()
                .filter_map(|c| c.data.get(index).map(|v| (c.name.as_str(), v)))
                .collect(),
        )
    }

    /// Total number of missing cells across all columns.
    pub fn null_count(&self) -> usize {
        self.columns.iter().map(|c| c.data.null_count()).sum()
    }

    /// Gather rows by index into a new table.
    ///
    /// # Panics
    /// Panics if an index is out of bounds.
    pub fn take(&self, indices: &[usize]) -> Table {
        Table {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.data.take(indices)))
                .collect(),
            n_rows: indices.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_table() -> Table {
        Table::from_columns(vec![
            Column::integer("Id", vec![Some(1), Some(2), Some(3)]),
            Column::float("LotFrontage", vec![Some(60.0), None, Some(80.0)]),
            Column::categorical("MSZoning", vec![Some("RL"), Some("RM"), None]),
        ])
        .unwrap()
    }

    #[test]
    fn test_table_shape() {
        let table = create_test_table();
        assert_eq!(table.shape(), (3, 3));
        assert_eq!(table.column_names(), vec!["Id", "LotFrontage", "MSZoning"]);
    }

    #[test]
    fn test_from_columns_length_mismatch() {
        let result = Table::from_columns(vec![
            Column::integer("a", vec![Some(1), Some(2)]),
            Column::integer("b", vec![Some(1)]),
        ]);
        assert!(matches!(
            result,
            Err(PreprocessingError::LengthMismatch {
                expected: 2,
                got: 1,
                ..
            })
        ));
    }

    #[test]
    fn test_from_columns_duplicate_name() {
        let result = Table::from_columns(vec![
            Column::integer("a", vec![Some(1)]),
            Column::float("a", vec![Some(1.0)]),
        ]);
        assert!(matches!(result, Err(PreprocessingError::InvalidParameter(_))));
    }

    #[test]
    fn test_drop_columns_ignores_absent() {
        let mut table = create_test_table();
        let dropped = table.drop_columns(&["Id", "PID", "Order"]);
        assert_eq!(dropped, vec!["Id".to_string()]);
        assert_eq!(table.column_names(), vec!["LotFrontage", "MSZoning"]);
        assert_eq!(table.n_rows(), 3);
    }

    #[test]
    fn test_set_column_replaces_in_place() {
        let mut table = create_test_table();
        table
            .set_column(Column::integer("LotFrontage", vec![Some(1), Some(2), Some(3)]))
            .unwrap();
        assert_eq!(table.position("LotFrontage"), Some(1));
        assert_eq!(table.column("LotFrontage").unwrap().dtype(), DataType::Integer);
    }

    #[test]
    fn test_set_column_rejects_wrong_length() {
        let mut table = create_test_table();
        let result = table.set_column(Column::integer("x", vec![Some(1)]));
        assert_eq!(
            result.unwrap_err(),
            PreprocessingError::LengthMismatch {
                column: "x".to_string(),
                expected: 3,
                got: 1,
            }
        );
    }

    #[test]
    fn test_set_column_on_empty_table_sets_row_count() {
        let mut table = Table::new();
        table
            .set_column(Column::float("LotArea", vec![Some(1.0), Some(2.0)]))
            .unwrap();
        assert_eq!(table.shape(), (2, 1));
    }

    #[test]
    fn test_select_reports_all_missing() {
        let table = create_test_table();
        let err = table.select(&["Id", "TotalSF", "HouseAge"]).unwrap_err();
        match err {
            PreprocessingError::SchemaMismatch { missing, .. } => {
                assert_eq!(missing, vec!["TotalSF".to_string(), "HouseAge".to_string()]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_row_and_null_count() {
        let table = create_test_table();
        let row = table.row(1).unwrap();
        assert_eq!(row[0], ("Id", Value::Integer(2)));
        assert_eq!(row[1], ("LotFrontage", Value::Missing));
        assert_eq!(table.null_count(), 2);
        assert!(table.row(3).is_none());
    }

    #[test]
    fn test_take_rows() {
        let table = create_test_table();
        let taken = table.take(&[2, 0]);
        assert_eq!(taken.n_rows(), 2);
        assert_eq!(
            taken.column("Id").unwrap().data,
            ColumnData::Integer(vec![Some(3), Some(1)])
        );
    }

    #[test]
    fn test_value_as_f64() {
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Indicator(true).as_f64(), Some(1.0));
        assert_eq!(Value::Category("RL".into()).as_f64(), None);
        assert!(Value::Missing.is_missing());
    }
}
