//! Metrics for evaluating regression models on processed data.
//!
//! The trainer, tuner and monitor all report the same set of scores for a
//! prediction run; [`RegressionMetrics::compute`] produces them in one pass
//! and [`MonitoringReport`] wraps them for the monitoring log.

use crate::preprocessing::error::PreprocessingError;
use serde::{Deserialize, Serialize};

/// Individual regression metrics.
pub struct Metrics;

impl Metrics {
    /// Mean Squared Error.
    ///
    /// MSE = mean((y_true - y_pred)^2)
    pub fn mse(y_true: &[f64], y_pred: &[f64]) -> Result<f64, PreprocessingError> {
        check_inputs(y_true, y_pred)?;
        let sum_sq: f64 = residuals(y_true, y_pred).map(|r| r * r).sum();
        Ok(sum_sq / y_true.len() as f64)
    }

    /// Root Mean Squared Error, in the units of the target.
    pub fn rmse(y_true: &[f64], y_pred: &[f64]) -> Result<f64, PreprocessingError> {
        Ok(Self::mse(y_true, y_pred)?.sqrt())
    }

    /// Mean Absolute Error.
    ///
    /// MAE = mean(|y_true - y_pred|)
    pub fn mae(y_true: &[f64], y_pred: &[f64]) -> Result<f64, PreprocessingError> {
        check_inputs(y_true, y_pred)?;
        let sum_abs: f64 = residuals(y_true, y_pred).map(f64::abs).sum();
        Ok(sum_abs / y_true.len() as f64)
    }

    /// Largest absolute residual.
    pub fn max_error(y_true: &[f64], y_pred: &[f64]) -> Result<f64, PreprocessingError> {
        check_inputs(y_true, y_pred)?;
        Ok(residuals(y_true, y_pred).map(f64::abs).fold(0.0, f64::max))
    }

    /// R² (coefficient of determination).
    ///
    /// R² = 1 - (SS_res / SS_tot)
    ///
    /// where:
    /// - SS_res = sum((y_true - y_pred)^2)
    /// - SS_tot = sum((y_true - mean(y_true))^2)
    ///
    /// Negative when the model does worse than predicting the mean. A constant
    /// target scores 1 for a perfect prediction and 0 otherwise.
    pub fn r_squared(y_true: &[f64], y_pred: &[f64]) -> Result<f64, PreprocessingError> {
        check_inputs(y_true, y_pred)?;
        let mean_true = mean(y_true);
        let ss_res: f64 = residuals(y_true, y_pred).map(|r| r * r).sum();
        let ss_tot: f64 = y_true.iter().map(|&t| (t - mean_true).powi(2)).sum();
        Ok(explained_ratio(ss_res, ss_tot))
    }

    /// Explained variance score.
    ///
    /// EV = 1 - Var(y_true - y_pred) / Var(y_true)
    ///
    /// Equals R² when the residuals have zero mean.
    pub fn explained_variance(y_true: &[f64], y_pred: &[f64]) -> Result<f64, PreprocessingError> {
        check_inputs(y_true, y_pred)?;
        let res: Vec<f64> = residuals(y_true, y_pred).collect();
        Ok(explained_ratio(variance(&res), variance(y_true)))
    }
}

fn check_inputs(y_true: &[f64], y_pred: &[f64]) -> Result<(), PreprocessingError> {
    if y_true.len() != y_pred.len() {
        return Err(PreprocessingError::LengthMismatch {
            column: "y_pred".to_string(),
            expected: y_true.len(),
            got: y_pred.len(),
        });
    }
    if y_true.is_empty() {
        return Err(PreprocessingError::EmptyData(
            "Cannot compute metrics on empty input".to_string(),
        ));
    }
    Ok(())
}

fn residuals<'a>(y_true: &'a [f64], y_pred: &'a [f64]) -> impl Iterator<Item = f64> + 'a {
    y_true.iter().zip(y_pred).map(|(&t, &p)| t - p)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn variance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|&v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

fn explained_ratio(unexplained: f64, total: f64) -> f64 {
    if total == 0.0 {
        return if unexplained == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - unexplained / total
}

/// Struct to hold all regression metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub max_error: f64,
    pub r2: f64,
    pub explained_variance: f64,
}

impl RegressionMetrics {
    /// Calculate all metrics at once.
    pub fn compute(y_true: &[f64], y_pred: &[f64]) -> Result<Self, PreprocessingError> {
        let mse = Metrics::mse(y_true, y_pred)?;
        Ok(Self {
            mse,
            rmse: mse.sqrt(),
            mae: Metrics::mae(y_true, y_pred)?,
            max_error: Metrics::max_error(y_true, y_pred)?,
            r2: Metrics::r_squared(y_true, y_pred)?,
            explained_variance: Metrics::explained_variance(y_true, y_pred)?,
        })
    }
}

/// Metrics of one monitoring run against a registered model version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringReport {
    pub model_version: String,
    pub sample_size: usize,
    pub metrics: RegressionMetrics,
}

impl MonitoringReport {
    pub fn new(
        model_version: impl Into<String>,
        y_true: &[f64],
        y_pred: &[f64],
    ) -> Result<Self, PreprocessingError> {
        Ok(Self {
            model_version: model_version.into(),
            sample_size: y_true.len(),
            metrics: RegressionMetrics::compute(y_true, y_pred)?,
        })
    }

    pub fn to_json(&self) -> Result<String, PreprocessingError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mse_perfect() {
        let y_true = vec![1.0, 2.0, 3.0, 4.0];
        let y_pred = vec![1.0, 2.0, 3.0, 4.0];
        assert_abs_diff_eq!(Metrics::mse(&y_true, &y_pred).unwrap(), 0.0);
    }

    #[test]
    fn test_mse_error() {
        let y_true = vec![1.0, 2.0, 3.0, 4.0];
        let y_pred = vec![2.0, 3.0, 4.0, 5.0];
        // Errors: [-1, -1, -1, -1], squared: [1, 1, 1, 1], mean: 1.0
        assert_abs_diff_eq!(Metrics::mse(&y_true, &y_pred).unwrap(), 1.0);
    }

    #[test]
    fn test_mae_and_max_error() {
        let y_true = vec![1.0, 2.0, 3.0, 4.0];
        let y_pred = vec![2.0, 2.0, 1.0, 4.5];
        assert_abs_diff_eq!(Metrics::mae(&y_true, &y_pred).unwrap(), 0.875);
        assert_abs_diff_eq!(Metrics::max_error(&y_true, &y_pred).unwrap(), 2.0);
    }

    #[test]
    fn test_r_squared_perfect() {
        let y_true = vec![1.0, 2.0, 3.0, 4.0];
        assert_abs_diff_eq!(Metrics::r_squared(&y_true, &y_true).unwrap(), 1.0);
    }

    #[test]
    fn test_r_squared_constant_target() {
        let y_true = vec![2.0, 2.0, 2.0, 2.0];
        assert_abs_diff_eq!(Metrics::r_squared(&y_true, &y_true).unwrap(), 1.0);
        let y_pred = vec![2.0, 2.0, 2.0, 3.0];
        assert_abs_diff_eq!(Metrics::r_squared(&y_true, &y_pred).unwrap(), 0.0);
    }

    #[test]
    fn test_r_squared_mean_predictor() {
        let y_true = vec![1.0, 2.0, 3.0, 4.0];
        let y_pred = vec![2.5; 4];
        assert_abs_diff_eq!(Metrics::r_squared(&y_true, &y_pred).unwrap(), 0.0);
    }

    #[test]
    fn test_explained_variance_ignores_bias() {
        let y_true = vec![1.0, 2.0, 3.0, 4.0];
        let y_pred = vec![2.0, 3.0, 4.0, 5.0];
        assert_abs_diff_eq!(Metrics::explained_variance(&y_true, &y_pred).unwrap(), 1.0);
        assert_abs_diff_eq!(Metrics::r_squared(&y_true, &y_pred).unwrap(), 0.2);
    }

    #[test]
    fn test_compute_all() {
        let y_true = vec![3.0, -0.5, 2.0, 7.0];
        let y_pred = vec![2.5, 0.0, 2.0, 8.0];
        let metrics = RegressionMetrics::compute(&y_true, &y_pred).unwrap();
        assert_abs_diff_eq!(metrics.mse, 0.375);
        assert_abs_diff_eq!(metrics.rmse, 0.375f64.sqrt());
        assert_abs_diff_eq!(metrics.mae, 0.5);
        assert_abs_diff_eq!(metrics.max_error, 1.0);
        assert_abs_diff_eq!(metrics.r2, 0.948_608_137_044_967_9, epsilon = 1e-12);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(matches!(
            RegressionMetrics::compute(&[1.0, 2.0], &[1.0]),
            Err(PreprocessingError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            RegressionMetrics::compute(&[], &[]),
            Err(PreprocessingError::EmptyData(_))
        ));
    }

    #[test]
    fn test_monitoring_report_json() {
        let report = MonitoringReport::new("3", &[1.0, 2.0], &[1.0, 2.0]).unwrap();
        assert_eq!(report.sample_size, 2);

        let json = report.to_json().unwrap();
        let back: MonitoringReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
        assert!(json.contains("\"model_version\":\"3\""));
    }
}
