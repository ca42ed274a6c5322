use std::time::{Duration, Instant};

/// Run a function and measure its execution time.
pub fn time_fn<F, R>(f: F) -> (R, Duration)
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

/// Run `f` `warmup` times unmeasured, then `iterations` times measured.
///
/// Returns the result of the last measured call with the timing summary.
pub fn benchmark_with_warmup<F, R>(warmup: usize, iterations: usize, mut f: F) -> (Option<R>, BenchmarkStats)
where
    F: FnMut() -> R,
{
    for _ in 0..warmup {
        let _ = f();
    }

    let mut last = None;
    let mut times = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let (result, elapsed) = time_fn(&mut f);
        times.push(elapsed.as_secs_f64() * 1000.0);
        last = Some(result);
    }
    (last, BenchmarkStats::from_times(times))
}

/// Timing summary in milliseconds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchmarkStats {
    pub iterations: usize,
    pub mean_ms: f64,
    pub std_dev_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
}

impl BenchmarkStats {
    pub fn from_times(mut times: Vec<f64>) -> Self {
        let n = times.len();
        if n == 0 {
            return Self::default();
        }
        times.sort_by(f64::total_cmp);

        let mean = times.iter().sum::<f64>() / n as f64;
        let variance = times.iter().map(|&t| (t - mean).powi(2)).sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (times[n / 2 - 1] + times[n / 2]) / 2.0
        } else {
            times[n / 2]
        };
        let p95 = times[((n as f64 * 0.95) as usize).min(n - 1)];

        Self {
            iterations: n,
            mean_ms: mean,
            std_dev_ms: variance.sqrt(),
            min_ms: times[0],
            max_ms: times[n - 1],
            median_ms: median,
            p95_ms: p95,
        }
    }

    /// Rows per second at the mean time for a table of `n_rows`.
    pub fn rows_per_sec(&self, n_rows: usize) -> f64 {
        if self.mean_ms > 0.0 {
            n_rows as f64 / (self.mean_ms / 1000.0)
        } else {
            f64::INFINITY
        }
    }
}
