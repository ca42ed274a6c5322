//! Synthetic Ames-style tables for benchmarking.
//!
//! The generator produces the columns the pipeline treats specially
//! (identifiers, frontage, the area inputs, the year columns and the target)
//! plus a couple of categorical columns, with a configurable share of
//! missing cells.

use ames_preprocessing::table::{Column, Table};
use ames_preprocessing::PreprocessingError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ZONINGS: [&str; 5] = ["RL", "RM", "FV", "RH", "C (all)"];
const NEIGHBORHOODS: [&str; 6] = ["NAmes", "CollgCr", "OldTown", "Edwards", "Somerst", "Gilbert"];

/// Share of missing cells in the columns that allow them.
pub const DEFAULT_MISSING_RATE: f64 = 0.1;

/// Generate `n_rows` rows with the default missing rate.
pub fn synthetic_ames(n_rows: usize, seed: u64) -> Result<Table, PreprocessingError> {
    synthetic_ames_with_missing(n_rows, seed, DEFAULT_MISSING_RATE)
}

/// Generate `n_rows` rows where frontage, masonry area, garage year and
/// alley cells are missing with probability `missing_rate`.
pub fn synthetic_ames_with_missing(
    n_rows: usize,
    seed: u64,
    missing_rate: f64,
) -> Result<Table, PreprocessingError> {
    if !(0.0..=1.0).contains(&missing_rate) {
        return Err(PreprocessingError::InvalidParameter(format!(
            "missing_rate must be in [0, 1], got {}",
            missing_rate
        )));
    }
    let mut rng = StdRng::seed_from_u64(seed);

    let mut order = Vec::with_capacity(n_rows);
    let mut pid = Vec::with_capacity(n_rows);
    let mut zoning = Vec::with_capacity(n_rows);
    let mut neighborhood = Vec::with_capacity(n_rows);
    let mut alley = Vec::with_capacity(n_rows);
    let mut frontage = Vec::with_capacity(n_rows);
    let mut lot_area = Vec::with_capacity(n_rows);
    let mut mas_vnr = Vec::with_capacity(n_rows);
    let mut bsmt = Vec::with_capacity(n_rows);
    let mut first = Vec::with_capacity(n_rows);
    let mut second = Vec::with_capacity(n_rows);
    let mut year_built = Vec::with_capacity(n_rows);
    let mut remod = Vec::with_capacity(n_rows);
    let mut yr_sold = Vec::with_capacity(n_rows);
    let mut garage = Vec::with_capacity(n_rows);
    let mut price = Vec::with_capacity(n_rows);

    for i in 0..n_rows {
        let built: i64 = rng.gen_range(1880..=2009);
        let sold: i64 = rng.gen_range(built.max(2006)..=2010);
        let b: i64 = rng.gen_range(0..=2500);
        let f: i64 = rng.gen_range(400..=2500);
        let s: i64 = if rng.gen_bool(0.4) { rng.gen_range(300..=1500) } else { 0 };

        order.push(Some(i as i64 + 1));
        pid.push(Some(526_000_000 + i as i64));
        zoning.push(Some(ZONINGS[rng.gen_range(0..ZONINGS.len())]));
        neighborhood.push(Some(NEIGHBORHOODS[rng.gen_range(0..NEIGHBORHOODS.len())]));
        alley.push(if rng.gen_bool(missing_rate) { None } else { Some("Grvl") });
        frontage.push(if rng.gen_bool(missing_rate) {
            None
        } else {
            Some(rng.gen_range(21.0..=313.0))
        });
        lot_area.push(Some(rng.gen_range(1300..=215_000)));
        mas_vnr.push(if rng.gen_bool(missing_rate) { None } else { Some(rng.gen_range(0..=1600)) });
        bsmt.push(Some(b));
        first.push(Some(f));
        second.push(Some(s));
        year_built.push(Some(built));
        remod.push(Some(rng.gen_range(built.max(1950)..=sold)));
        yr_sold.push(Some(sold));
        garage.push(if rng.gen_bool(missing_rate) { None } else { Some(built) });
        price.push(Some(20_000 + 80 * (b + f + s) + rng.gen_range(-20_000..=20_000)));
    }

    Table::from_columns(vec![
        Column::integer("Order", order),
        Column::integer("PID", pid),
        Column::categorical("MSZoning", zoning),
        Column::float("LotFrontage", frontage),
        Column::integer("LotArea", lot_area),
        Column::categorical("Alley", alley),
        Column::categorical("Neighborhood", neighborhood),
        Column::integer("MasVnrArea", mas_vnr),
        Column::integer("TotalBsmtSF", bsmt),
        Column::integer("1stFlrSF", first),
        Column::integer("2ndFlrSF", second),
        Column::integer("YearBuilt", year_built),
        Column::integer("YearRemodAdd", remod),
        Column::integer("YrSold", yr_sold),
        Column::integer("GarageYrBlt", garage),
        Column::integer("SalePrice", price),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_shape() {
        let table = synthetic_ames(50, 7).unwrap();
        assert_eq!(table.shape(), (50, 16));
        assert!(table.has_column("SalePrice"));
    }

    #[test]
    fn test_synthetic_is_deterministic() {
        assert_eq!(synthetic_ames(20, 1).unwrap(), synthetic_ames(20, 1).unwrap());
    }

    #[test]
    fn test_no_missing_when_rate_is_zero() {
        let table = synthetic_ames_with_missing(30, 3, 0.0).unwrap();
        assert_eq!(table.null_count(), 0);
    }

    #[test]
    fn test_invalid_missing_rate() {
        assert!(synthetic_ames_with_missing(10, 0, 1.5).is_err());
    }
}
