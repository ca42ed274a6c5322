//! Seeded row sampling and train/test splitting.

use crate::preprocessing::error::PreprocessingError;
use crate::table::Table;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn check_fraction(name: &str, value: f64) -> Result<(), PreprocessingError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(PreprocessingError::InvalidParameter(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

fn shuffled_indices(n: usize, seed: u64) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    indices
}

impl Table {
    /// Random subset of `round(frac * n_rows)` rows without replacement.
    ///
    /// The same seed always yields the same rows in the same order.
    pub fn sample_frac(&self, frac: f64, seed: u64) -> Result<Table, PreprocessingError> {
        check_fraction("frac", frac)?;
        let n = (frac * self.n_rows() as f64).round() as usize;
        let indices = shuffled_indices(self.n_rows(), seed);
        Ok(self.take(&indices[..n]))
    }
}

/// Shuffle and split a table into `(train, test)`.
///
/// The test part receives `ceil(test_size * n_rows)` rows.
pub fn train_test_split(
    table: &Table,
    test_size: f64,
    seed: u64,
) -> Result<(Table, Table), PreprocessingError> {
    check_fraction("test_size", test_size)?;
    let n_test = (test_size * table.n_rows() as f64).ceil() as usize;
    let indices = shuffled_indices(table.n_rows(), seed);
    let (test_idx, train_idx) = indices.split_at(n_test);
    Ok((table.take(train_idx), table.take(test_idx)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, ColumnData};

    fn create_test_table(n: i64) -> Table {
        Table::from_columns(vec![Column::integer(
            "Order",
            (0..n).map(Some).collect(),
        )])
        .unwrap()
    }

    fn orders(table: &Table) -> Vec<i64> {
        match &table.column("Order").unwrap().data {
            ColumnData::Integer(v) => v.iter().flatten().copied().collect(),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_sample_frac_size_and_determinism() {
        let table = create_test_table(50);
        let a = table.sample_frac(0.1, 42).unwrap();
        let b = table.sample_frac(0.1, 42).unwrap();
        assert_eq!(a.n_rows(), 5);
        assert_eq!(orders(&a), orders(&b));
    }

    #[test]
    fn test_sample_frac_rejects_bad_fraction() {
        let table = create_test_table(10);
        assert!(table.sample_frac(1.5, 0).is_err());
        assert!(table.sample_frac(-0.1, 0).is_err());
    }

    #[test]
    fn test_train_test_split_partitions_rows() {
        let table = create_test_table(11);
        let (train, test) = train_test_split(&table, 0.2, 42).unwrap();
        assert_eq!(test.n_rows(), 3);
        assert_eq!(train.n_rows(), 8);

        let mut all: Vec<i64> = orders(&train);
        all.extend(orders(&test));
        all.sort_unstable();
        assert_eq!(all, (0..11).collect::<Vec<_>>());
    }
}
