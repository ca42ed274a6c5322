//! # ames-preprocessing
//!
//! Cleaning, feature engineering and encoding/scaling for the Ames Housing
//! price-regression workflow, with a strict separation between fitting the
//! preprocessing parameters and reapplying them.
//!
//! ## Core Design Principles
//!
//! - **Fit/Apply Separation**: Every stage learns from a reference table once;
//!   the fitted parameters are plain data that can be persisted and reloaded.
//! - **Explicit Schemas**: The fitted pipeline records the columns it expects
//!   and reports a schema mismatch instead of silently reshaping data.
//! - **Dynamic Tables**: Column sets are whatever the dataset contains; the
//!   pipeline only names the columns it treats specially.
//!
//! ## Quick Start
//!
//! ```rust
//! use ames_preprocessing::preprocessing::{FittedTransformer, Preprocessor};
//! use ames_preprocessing::table::{Column, Table};
//!
//! let raw = Table::from_columns(vec![
//!     Column::integer("Order", vec![Some(1), Some(2), Some(3)]),
//!     Column::float("LotFrontage", vec![Some(60.0), None, Some(80.0)]),
//!     Column::categorical("MSZoning", vec![Some("RL"), Some("RM"), Some("RL")]),
//!     Column::integer("SalePrice", vec![Some(200_000), Some(150_000), Some(180_000)]),
//! ])
//! .unwrap();
//!
//! let (processed, fitted) = Preprocessor::default().fit_with_output(&raw).unwrap();
//! assert_eq!(fitted.feature_names(), vec!["LotFrontage", "TotalSF", "MSZoning_RM"]);
//! assert_eq!(processed.column("SalePrice"), raw.column("SalePrice"));
//!
//! let again = fitted.transform(&raw).unwrap();
//! assert_eq!(again, processed);
//! ```
//!
//! ## Module Structure
//!
//! - `table`: Column-oriented tables, schemas, CSV I/O and sampling
//! - `preprocessing`: Cleaner, feature engineer, encoder, scaler and the pipeline
//! - `config`: Column names and fill policies
//! - `metrics`: Regression metrics and monitoring reports
//! - `payload`: Serving payloads
//! - `serialization`: Parameter persistence

/// Pipeline and process configuration.
pub mod config;

/// Regression metrics for evaluating predictions.
pub mod metrics;

/// Serving payloads for the prediction service.
pub mod payload;

/// Data preprocessing transformers for the Ames pipeline.
pub mod preprocessing;

/// Parameter persistence utilities.
pub mod serialization;

/// In-memory tables and their I/O.
pub mod table;

pub use config::{PipelineConfig, ProcessConfig};
pub use preprocessing::{FittedPreprocessor, Preprocessor, PreprocessingError};
pub use table::{Column, Table};
