//! Scaling transformers for numeric feature normalization.
//!
//! # Example
//!
//! ```ignore
//! use ames_preprocessing::preprocessing::scaling::StandardScaler;
//! use ames_preprocessing::preprocessing::Transformer;
//!
//! let scaler = StandardScaler::new().with_excluded_columns(vec!["SalePrice"]);
//! let fitted = scaler.fit(&train)?;
//! let scaled = fitted.transform(&new_rows)?;
//! ```

pub mod standard;

pub use standard::{
    FittedStandardScaler, StandardScaler, StandardScalerConfig, StandardScalerParams,
};
