//! Benchmark utilities for the Ames preprocessing pipeline.
//!
//! - Synthetic Ames-style table generation
//! - Timing helpers and summary statistics

pub mod data;
pub mod utils;

pub use data::{synthetic_ames, synthetic_ames_with_missing};
pub use utils::{benchmark_with_warmup, time_fn, BenchmarkStats};
