//! Data preprocessing transformers for the Ames housing pipeline.
//!
//! Every stage follows the same fit/apply split: an unfitted transformer
//! learns from a reference table and returns a fitted one that reapplies
//! exactly those parameters to any later table.
//!
//! # Core Traits
//!
//! - [`Transformer`]: Unfitted transformer with its configuration
//! - [`FittedTransformer`]: Fitted transformer ready for inference
//! - [`StatelessTransformer`]: Stage with nothing to learn
//!
//! # Stages
//!
//! 1. [`Cleaner`]: drops identifier columns and imputes missing values
//! 2. [`FeatureEngineer`]: adds `TotalSF`, `HouseAge` and `RemodAge`
//! 3. [`OneHotEncoder`] then [`StandardScaler`]: indicator columns and z-scores
//!
//! [`Preprocessor`] chains the three and carries the fitted state as one
//! [`PreprocessorParams`] value.
//!
//! # Example
//!
//! ```ignore
//! use ames_preprocessing::preprocessing::{FittedPreprocessor, FittedTransformer, Preprocessor};
//!
//! let (processed, fitted) = Preprocessor::default().fit_with_output(&raw)?;
//!
//! // Save for later use
//! fitted.save_to_file("data/preprocessor.bin")?;
//!
//! // Later, load and transform new rows
//! let loaded = FittedPreprocessor::load_from_file("data/preprocessor.bin")?;
//! let features = loaded.transform(&new_rows)?;
//! ```

pub mod cleaning;
pub mod encoding;
pub mod error;
pub mod feature_engineering;
pub mod pipeline;
pub mod scaling;
pub mod traits;

// Re-export main types
pub use cleaning::{clean, Cleaner, CleanerParams, FittedCleaner};
pub use encoding::{FittedOneHotEncoder, HandleUnknown, OneHotEncoder, OneHotEncoderParams};
pub use error::PreprocessingError;
pub use feature_engineering::{feature_engineer, FeatureEngineer};
pub use pipeline::{FittedPreprocessor, Preprocessor, PreprocessorParams};
pub use scaling::{FittedStandardScaler, StandardScaler, StandardScalerConfig, StandardScalerParams};
pub use traits::{FittedTransformer, StatelessTransformer, Transformer};
