//! Serving payloads in the split-orient JSON layout.
//!
//! ```json
//! {"columns": ["Gr Liv Area", "MSZoning_RL"], "data": [[0.37, true]]}
//! ```
//!
//! A payload is built from processed rows and sent to the prediction
//! service, which turns it back into a feature matrix ordered the way the
//! model expects.

use crate::preprocessing::error::PreprocessingError;
use crate::table::{Column, ColumnData, Table, Value};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Column names plus row-major cell values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub columns: Vec<String>,
    pub data: Vec<Vec<JsonValue>>,
}

fn to_json_value(value: Value) -> JsonValue {
    match value {
        Value::Integer(v) => JsonValue::from(v),
        Value::Float(v) => serde_json::Number::from_f64(v)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::Category(s) => JsonValue::String(s),
        Value::Indicator(b) => JsonValue::Bool(b),
        Value::Missing => JsonValue::Null,
    }
}

impl Payload {
    /// Build a payload from the given rows of `table`.
    pub fn from_table(table: &Table, rows: &[usize]) -> Result<Self, PreprocessingError> {
        let mut data = Vec::with_capacity(rows.len());
        for &row in rows {
            let cells = table.row(row).ok_or_else(|| {
                PreprocessingError::InvalidParameter(format!(
                    "row {} out of range for a table with {} rows",
                    row,
                    table.n_rows()
                ))
            })?;
            data.push(cells.into_iter().map(|(_, v)| to_json_value(v)).collect());
        }
        Ok(Self {
            columns: table.column_names().into_iter().map(str::to_string).collect(),
            data,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.data.len()
    }

    pub fn to_json(&self) -> Result<String, PreprocessingError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PreprocessingError> {
        let payload: Self = serde_json::from_str(json)?;
        payload.check_shape()?;
        Ok(payload)
    }

    fn check_shape(&self) -> Result<(), PreprocessingError> {
        for (i, row) in self.data.iter().enumerate() {
            if row.len() != self.columns.len() {
                return Err(PreprocessingError::LengthMismatch {
                    column: format!("row {}", i),
                    expected: self.columns.len(),
                    got: row.len(),
                });
            }
        }
        Ok(())
    }

    fn cells(&self, col: usize) -> impl Iterator<Item = &JsonValue> {
        self.data.iter().map(move |row| &row[col])
    }

    /// Rebuild a table, inferring each column's type from its cells.
    ///
    /// Booleans become indicators, integral numbers integers, other numbers
    /// floats, strings categories and `null` a missing cell.
    pub fn to_table(&self) -> Result<Table, PreprocessingError> {
        self.check_shape()?;
        let columns = self
            .columns
            .iter()
            .enumerate()
            .map(|(col, name)| self.infer_column(col, name))
            .collect::<Result<Vec<_>, _>>()?;
        Table::from_columns(columns)
    }

    fn infer_column(&self, col: usize, name: &str) -> Result<Column, PreprocessingError> {
        let present = || self.cells(col).filter(|v| !v.is_null());
        let mismatch = |expected: &str| PreprocessingError::TypeMismatch {
            column: name.to_string(),
            expected: expected.to_string(),
            got: "mixed".to_string(),
        };

        let data = if present().count() == 0 {
            ColumnData::Float(vec![None; self.n_rows()])
        } else if present().all(JsonValue::is_boolean) {
            let flags = self
                .cells(col)
                .map(JsonValue::as_bool)
                .collect::<Option<Vec<bool>>>()
                .ok_or_else(|| PreprocessingError::MissingValues(format!("indicator '{}'", name)))?;
            ColumnData::Indicator(flags)
        } else if present().all(|v| v.is_i64()) {
            ColumnData::Integer(self.cells(col).map(JsonValue::as_i64).collect())
        } else if present().all(JsonValue::is_number) {
            ColumnData::Float(self.cells(col).map(JsonValue::as_f64).collect())
        } else if present().all(JsonValue::is_string) {
            ColumnData::Categorical(
                self.cells(col)
                    .map(|v| v.as_str().map(str::to_string))
                    .collect(),
            )
        } else {
            return Err(mismatch("uniform cell type"));
        };
        Ok(Column::new(name, data))
    }

    /// Feature matrix with columns ordered as `expected`.
    ///
    /// Every expected feature must be present; columns the model does not
    /// use are ignored.
    pub fn feature_matrix(&self, expected: &[String]) -> Result<Array2<f64>, PreprocessingError> {
        self.check_shape()?;
        let mut positions = Vec::with_capacity(expected.len());
        let mut missing = Vec::new();
        for name in expected {
            match self.columns.iter().position(|c| c == name) {
                Some(pos) => positions.push(pos),
                None => missing.push(name.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(PreprocessingError::schema_mismatch("payload", missing));
        }

        let mut x = Array2::<f64>::zeros((self.n_rows(), expected.len()));
        for (i, row) in self.data.iter().enumerate() {
            for (j, &pos) in positions.iter().enumerate() {
                x[[i, j]] = match &row[pos] {
                    JsonValue::Number(n) => n.as_f64().unwrap_or(f64::NAN),
                    JsonValue::Bool(b) => f64::from(u8::from(*b)),
                    JsonValue::Null => {
                        return Err(PreprocessingError::MissingValues(format!(
                            "feature '{}' in row {}",
                            expected[j], i
                        )))
                    }
                    other => {
                        return Err(PreprocessingError::TypeMismatch {
                            column: expected[j].clone(),
                            expected: "numeric".to_string(),
                            got: json_type(other).to_string(),
                        })
                    }
                };
            }
        }
        Ok(x)
    }
}

fn json_type(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
