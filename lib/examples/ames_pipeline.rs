//! End-to-end preprocessing example on a handful of Ames-style rows.
//!
//! This example walks through the workflow the training, serving and
//! monitoring jobs share:
//! - Loading a raw table from CSV text
//! - Fitting the clean → engineer → encode/scale pipeline
//! - Persisting and reloading the fitted parameters
//! - Applying them to unseen rows (including an unseen category)
//! - Building a serving payload and a feature matrix
//! - Scoring a mean-price baseline on a monitoring sample
//!
//! Run with: cargo run --example ames_pipeline

use ames_preprocessing::metrics::MonitoringReport;
use ames_preprocessing::payload::Payload;
use ames_preprocessing::preprocessing::{FittedPreprocessor, FittedTransformer, Preprocessor};
use ames_preprocessing::table::Table;
use std::error::Error;

const RAW_CSV: &str = "\
Order,PID,MSZoning,LotFrontage,LotArea,Alley,TotalBsmtSF,1stFlrSF,2ndFlrSF,YearBuilt,YearRemodAdd,YrSold,GarageYrBlt,SalePrice
1,526301100,RL,141,31770,NA,1080,1656,0,1960,1960,2010,1960,215000
2,526350040,RH,80,11622,NA,882,896,0,1961,1961,2010,1961,105000
3,526351010,RL,81,14267,NA,1329,1329,0,1958,1958,2010,1958,172000
4,526353030,RL,93,11160,NA,2110,2110,0,1968,1968,2010,1968,244000
5,527105010,RL,74,13830,NA,928,928,701,1997,1998,2010,1997,189900
6,527105030,RL,78,9978,NA,926,926,678,1998,1998,2010,1998,195500
7,527127150,RL,41,4920,NA,1338,1338,0,2001,2001,2010,2001,213500
8,527145080,RL,43,5005,NA,1280,1280,0,1992,1992,2010,1992,191500
9,527146030,RL,39,5389,NA,1595,1616,0,1995,1996,2010,1995,236500
10,527162130,RL,60,7500,NA,994,1028,776,1999,1999,2010,1999,189000
11,527163010,RL,75,10000,NA,763,763,892,1993,1994,2010,1993,175900
12,527165230,RL,NA,7980,NA,1168,1187,0,1992,2007,2010,1992,185000
13,527166040,RL,63,8402,NA,789,789,676,1998,1998,2010,1998,180400
14,527180040,RL,85,10176,NA,1300,1341,0,1990,1990,2010,1990,171500
15,527182190,RM,NA,6820,Pave,1488,1502,0,1985,1985,2010,1985,212000
";

const NEW_ROWS_CSV: &str = "\
Order,PID,MSZoning,LotFrontage,LotArea,Alley,TotalBsmtSF,1stFlrSF,2ndFlrSF,YearBuilt,YearRemodAdd,YrSold,GarageYrBlt
16,527216070,FV,47,53504,NA,1650,1690,1589,2003,2003,2010,2003
17,527225035,RL,,12134,NA,559,1080,672,1988,1988,2010,1988
";

fn main() -> Result<(), Box<dyn Error>> {
    println!("=== Ames Preprocessing Pipeline ===\n");

    // 1. Load the raw table
    let raw = Table::from_csv_reader(RAW_CSV.as_bytes())?;
    println!("Raw table: {} rows x {} columns", raw.n_rows(), raw.n_cols());

    // 2. Fit the pipeline
    let (processed, fitted) = Preprocessor::default().fit_with_output(&raw)?;
    println!(
        "Processed: {} rows x {} columns",
        processed.n_rows(),
        processed.n_cols()
    );
    println!(
        "LotFrontage median: {:?}",
        fitted.cleaner().frontage_median()
    );
    println!("Features: {:?}\n", fitted.feature_names());

    // 3. Persist and reload
    let params_path = std::env::temp_dir().join("ames_pipeline_example.bin");
    fitted.save_to_file(&params_path)?;
    let loaded = FittedPreprocessor::load_from_file(&params_path)?;
    std::fs::remove_file(&params_path).ok();

    // 4. Apply to new rows; the unseen "FV" zoning encodes as all zeros
    let new_rows = Table::from_csv_reader(NEW_ROWS_CSV.as_bytes())?;
    let features = loaded.transform(&new_rows)?;
    for i in 0..features.n_rows() {
        if let Some(row) = features.row(i) {
            let zoning: Vec<String> = row
                .iter()
                .filter(|(name, _)| name.starts_with("MSZoning_"))
                .map(|(name, value)| format!("{}={}", name, value))
                .collect();
            println!("New row {}: {}", i, zoning.join(", "));
        }
    }

    // 5. Serving payload
    let payload = Payload::from_table(&features, &[0])?;
    let x = payload.feature_matrix(&loaded.feature_names())?;
    println!("\nPayload: {} columns, matrix shape {:?}", payload.columns.len(), x.dim());

    // 6. Monitoring: score a mean-price baseline on a 20% sample
    let (_, y) = loaded.split_target(&processed)?;
    let y = y.ok_or("processed table has no target")?;
    let mean_price = y.mean().unwrap_or_default();
    let sample = processed.sample_frac(0.2, 42)?;
    let (_, y_sample) = loaded.split_target(&sample)?;
    let y_sample = y_sample.ok_or("sample has no target")?.to_vec();
    let baseline = vec![mean_price; y_sample.len()];
    let report = MonitoringReport::new("baseline", &y_sample, &baseline)?;
    println!("Monitoring report: {}", report.to_json()?);

    Ok(())
}
