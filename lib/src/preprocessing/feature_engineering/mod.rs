//! Feature engineering transformers.
//!
//! Derived columns are computed row-wise from columns already in the table,
//! so there is nothing to learn and the same rules apply in fit and apply
//! mode.

mod derived;

pub use derived::{feature_engineer, FeatureEngineer};
