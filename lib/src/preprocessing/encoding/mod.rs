//! Categorical feature encoding.
//!
//! ## OneHotEncoder
//! Expands each categorical column into indicator columns, one per learned
//! category except the sorted-first baseline.
//!
//! ```text
//! MSZoning: [RH, RL, RM]  ->  MSZoning_RL: [0, 1, 0]
//!                             MSZoning_RM: [0, 0, 1]
//! ```

mod one_hot;

pub use one_hot::{FittedOneHotEncoder, OneHotEncoder, OneHotEncoderParams};

/// Strategy for handling unknown categories during transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HandleUnknown {
    /// Raise an error when unknown categories are encountered.
    Error,
    /// Encode unknown categories as all-zero indicators.
    #[default]
    Ignore,
}
