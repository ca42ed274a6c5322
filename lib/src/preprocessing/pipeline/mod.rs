//! The clean → engineer → encode/scale pipeline.
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Preprocessor`] | Unfitted pipeline holding a [`PipelineConfig`](crate::config::PipelineConfig) |
//! | [`FittedPreprocessor`] | Fitted pipeline for apply mode |
//! | [`PreprocessorParams`] | Everything learned at fit time, persisted with bincode or JSON |

mod preprocessor;

pub use preprocessor::{FittedPreprocessor, Preprocessor, PreprocessorParams};
