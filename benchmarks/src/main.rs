// Quick fit/apply timing over synthetic tables.
// Use `cargo bench --package benchmarks --bench pipeline` for criterion runs.

use ames_preprocessing::preprocessing::{FittedTransformer, Preprocessor, Transformer};
use benchmarks::{benchmark_with_warmup, synthetic_ames};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("Ames Preprocessing Benchmark");
    println!();
    println!("{:>8} {:>12} {:>12} {:>14}", "rows", "fit (ms)", "apply (ms)", "apply rows/s");

    for &n_rows in &[100usize, 1_000, 10_000] {
        let table = synthetic_ames(n_rows, 42)?;

        let (fitted, fit_stats) =
            benchmark_with_warmup(1, 5, || Preprocessor::default().fit(&table));
        let fitted = fitted.ok_or("no fit iterations ran")??;

        let (_, apply_stats) = benchmark_with_warmup(1, 5, || fitted.transform(&table));

        println!(
            "{:>8} {:>12.3} {:>12.3} {:>14.0}",
            n_rows,
            fit_stats.mean_ms,
            apply_stats.mean_ms,
            apply_stats.rows_per_sec(n_rows)
        );
    }
    Ok(())
}
