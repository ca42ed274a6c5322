//! Core traits for preprocessing transformers.
//!
//! This module defines the central traits:
//! - [`Transformer`]: Used during fitting; holds configuration and learns from a table.
//! - [`FittedTransformer`]: After fitting; applies learned parameters and can be persisted.
//! - [`StatelessTransformer`]: Stages with nothing to learn.

use crate::preprocessing::error::PreprocessingError;
use crate::serialization::{write_atomic, SerializableParams};
use crate::table::Table;

/// Trait for unfitted transformers.
///
/// A transformer learns parameters from a reference table (fit mode) and
/// hands them to a [`FittedTransformer`] that reapplies them unchanged to
/// any later table (apply mode).
///
/// # Example
/// ```ignore
/// use ames_preprocessing::preprocessing::{Transformer, FittedTransformer, StandardScaler};
///
/// let fitted = StandardScaler::new().fit(&train)?;
/// let scaled = fitted.transform(&new_sample)?;
/// ```
pub trait Transformer: Clone {
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<Params = Self::Params>;

    /// Learn parameters from `table`.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if:
    /// - The table has no rows
    /// - A column the transformer depends on has an unusable type
    fn fit(&self, table: &Table) -> Result<Self::Fitted, PreprocessingError>;

    /// Fit the transformer and transform the same table in one step.
    fn fit_transform(&self, table: &Table) -> Result<Table, PreprocessingError> {
        let fitted = self.fit(table)?;
        fitted.transform(table)
    }
}

/// Trait for fitted transformers ready for inference.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `save_to_file` / `load_from_file` are cross-platform compatible.
pub trait FittedTransformer: Clone {
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Transform a table using learned parameters.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if a column seen during fit is absent
    /// or has an incompatible type.
    fn transform(&self, table: &Table) -> Result<Table, PreprocessingError>;

    /// Reverse the transformation (if supported).
    fn inverse_transform(&self, _table: &Table) -> Result<Table, PreprocessingError> {
        Err(PreprocessingError::InvalidParameter(
            "inverse transform is not supported by this transformer".to_string(),
        ))
    }

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError>
    where
        Self: Sized;

    /// Save the fitted transformer to a file.
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> std::io::Result<()> {
        let params = self.extract_params();
        let bytes = params.to_bytes().map_err(std::io::Error::other)?;
        write_atomic(path, &bytes)
    }

    /// Load a fitted transformer from a file.
    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, PreprocessingError>
    where
        Self: Sized,
    {
        let bytes = std::fs::read(path)?;
        let params = Self::Params::from_bytes(&bytes)
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
        Self::from_params(params)
    }

    /// Names of the input columns the transformer was fit on.
    fn input_columns(&self) -> Vec<String>;
}

/// Trait for transformers that don't require fitting.
///
/// Their whole configuration doubles as their parameters, so they can be
/// stored verbatim inside a fitted pipeline.
pub trait StatelessTransformer {
    /// Transform a table without fitting.
    fn transform_direct(&self, table: &Table) -> Result<Table, PreprocessingError>;
}
