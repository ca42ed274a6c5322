//! Explicit schema descriptors for tables.
//!
//! A [`Schema`] is an ordered list of `(name, role, dtype)` fields. The
//! pipeline records the schema of its output at fit time and validates every
//! later table against it, so schema drift surfaces as an error instead of a
//! silently different feature matrix.

use crate::config::PipelineConfig;
use crate::preprocessing::error::PreprocessingError;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage type of a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    Float,
    Categorical,
    Indicator,
}

impl DataType {
    /// Integer or float.
    pub fn is_numeric(self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }

    /// Integer and float are interchangeable; everything else must match exactly.
    pub fn is_compatible_with(self, other: DataType) -> bool {
        self == other || (self.is_numeric() && other.is_numeric())
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::Categorical => "categorical",
            DataType::Indicator => "indicator",
        };
        f.write_str(name)
    }
}

/// What the pipeline does with a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnRole {
    /// Identifier or low-value column; dropped by the cleaner.
    Identifier,
    /// Numeric feature; imputed and standard-scaled.
    Numeric,
    /// Categorical feature; imputed and one-hot encoded.
    Categorical,
    /// One-hot indicator produced by the encoder.
    Indicator,
    /// Regression target; passed through untouched.
    Target,
}

/// One schema entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub role: ColumnRole,
    pub dtype: DataType,
}

/// Ordered list of fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Derive a schema from a table, assigning roles from the config.
    pub fn infer(table: &Table, config: &PipelineConfig) -> Self {
        let fields = table
            .columns()
            .iter()
            .map(|c| {
                let dtype = c.dtype();
                let role = if c.name == config.target_column {
                    ColumnRole::Target
                } else if config.drop_columns.iter().any(|d| *d == c.name) {
                    ColumnRole::Identifier
                } else {
                    match dtype {
                        DataType::Integer | DataType::Float => ColumnRole::Numeric,
                        DataType::Categorical => ColumnRole::Categorical,
                        DataType::Indicator => ColumnRole::Indicator,
                    }
                };
                Field {
                    name: c.name.clone(),
                    role,
                    dtype,
                }
            })
            .collect();
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Model-input columns: everything except the target and identifiers.
    pub fn feature_names(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|f| !matches!(f.role, ColumnRole::Target | ColumnRole::Identifier))
            .map(|f| f.name.clone())
            .collect()
    }

    /// The target field, if the schema has one.
    pub fn target(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.role == ColumnRole::Target)
    }

    /// Check that `table` carries every field with a compatible dtype.
    ///
    /// The target field is optional. Missing columns are reported together
    /// as a [`PreprocessingError::SchemaMismatch`] tagged with `stage`.
    pub fn validate(&self, table: &Table, stage: &str) -> Result<(), PreprocessingError> {
        let mut missing = Vec::new();
        for field in &self.fields {
            match table.column(&field.name) {
                Some(column) => {
                    if !column.dtype().is_compatible_with(field.dtype) {
                        return Err(PreprocessingError::TypeMismatch {
                            column: field.name.clone(),
                            expected: field.dtype.to_string(),
                            got: column.dtype().to_string(),
                        });
                    }
                }
                None if field.role == ColumnRole::Target => {}
                None => missing.push(field.name.clone()),
            }
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PreprocessingError::schema_mismatch(stage, missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    fn create_test_table() -> Table {
        Table::from_columns(vec![
            Column::integer("Order", vec![Some(1), Some(2)]),
            Column::float("LotArea", vec![Some(8000.0), Some(9000.0)]),
            Column::categorical("MSZoning", vec![Some("RL"), Some("RM")]),
            Column::indicator("Street_Pave", vec![true, false]),
            Column::integer("SalePrice", vec![Some(200_000), Some(150_000)]),
        ])
        .unwrap()
    }

    #[test]
    fn test_infer_roles() {
        let schema = Schema::infer(&create_test_table(), &PipelineConfig::default());
        let roles: Vec<ColumnRole> = schema.fields().iter().map(|f| f.role).collect();
        assert_eq!(
            roles,
            vec![
                ColumnRole::Identifier,
                ColumnRole::Numeric,
                ColumnRole::Categorical,
                ColumnRole::Indicator,
                ColumnRole::Target,
            ]
        );
        assert_eq!(schema.target().unwrap().name, "SalePrice");
    }

    #[test]
    fn test_feature_names_exclude_target_and_identifiers() {
        let schema = Schema::infer(&create_test_table(), &PipelineConfig::default());
        assert_eq!(
            schema.feature_names(),
            vec!["LotArea", "MSZoning", "Street_Pave"]
        );
    }

    #[test]
    fn test_validate_accepts_numeric_widening() {
        let schema = Schema::new(vec![Field {
            name: "LotArea".to_string(),
            role: ColumnRole::Numeric,
            dtype: DataType::Integer,
        }]);
        assert!(schema.validate(&create_test_table(), "test").is_ok());
    }

    #[test]
    fn test_validate_target_optional() {
        let config = PipelineConfig::default();
        let schema = Schema::infer(&create_test_table(), &config);
        let mut without_target = create_test_table();
        without_target.drop_columns(&["SalePrice"]);
        assert!(schema.validate(&without_target, "apply").is_ok());
    }

    #[test]
    fn test_validate_reports_missing_and_type() {
        let schema = Schema::infer(&create_test_table(), &PipelineConfig::default());

        let mut missing = create_test_table();
        missing.drop_columns(&["LotArea", "Street_Pave"]);
        match schema.validate(&missing, "apply") {
            Err(PreprocessingError::SchemaMismatch { stage, missing }) => {
                assert_eq!(stage, "apply");
                assert_eq!(missing, vec!["LotArea", "Street_Pave"]);
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let mut retyped = create_test_table();
        retyped
            .set_column(Column::categorical("LotArea", vec![Some("big"), Some("small")]))
            .unwrap();
        assert!(matches!(
            schema.validate(&retyped, "apply"),
            Err(PreprocessingError::TypeMismatch { .. })
        ));
    }
}
