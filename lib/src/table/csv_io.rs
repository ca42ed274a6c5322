//! CSV loading and persistence for [`Table`].
//!
//! Column types are inferred from the text: a column whose non-missing cells
//! all parse as `i64` is an integer column, as `f64` a float column, and
//! anything else is categorical. An integer column that contains a missing
//! cell is loaded as float, which keeps imputed medians such as `68.5`
//! representable.

use crate::preprocessing::error::PreprocessingError;
use crate::serialization::write_atomic;
use crate::table::{Column, ColumnData, DataType, Schema, Table};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use tracing::debug;

/// Cell contents treated as missing on load.
///
/// `"None"` is deliberately absent: it is the cleaner's fill label for
/// categorical columns and must survive a write/read cycle.
pub const MISSING_TOKENS: [&str; 10] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "NULL", "null", "<NA>", "#N/A",
];

fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell.trim())
}

fn infer_column(name: String, cells: Vec<Option<String>>) -> Column {
    let present = || cells.iter().flatten().map(|s| s.trim());
    let has_missing = cells.iter().any(Option::is_none);

    if present().all(|s| s.parse::<i64>().is_ok()) && !has_missing {
        let values = cells
            .iter()
            .map(|c| c.as_deref().and_then(|s| s.trim().parse::<i64>().ok()))
            .collect();
        return Column::new(name, ColumnData::Integer(values));
    }

    if present().all(|s| s.parse::<f64>().is_ok()) {
        let values = cells
            .iter()
            .map(|c| c.as_deref().and_then(|s| s.trim().parse::<f64>().ok()))
            .collect();
        return Column::new(name, ColumnData::Float(values));
    }

    Column::new(name, ColumnData::Categorical(cells))
}

impl Table {
    /// Parse a CSV document with a header row.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Table, PreprocessingError> {
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(PreprocessingError::EmptyData(
                "CSV input has no header row".to_string(),
            ));
        }

        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
        for result in rdr.records() {
            let record = result?;
            for (col, cell) in record.iter().enumerate() {
                let value = if is_missing(cell) {
                    None
                } else {
                    Some(cell.to_string())
                };
                cells[col].push(value);
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, values)| infer_column(name, values))
            .collect();
        Table::from_columns(columns)
    }

    /// Write the table as CSV with a header row.
    ///
    /// Missing cells become empty fields and indicators are written as `1`/`0`.
    pub fn to_csv_writer<W: Write>(&self, writer: W) -> Result<(), PreprocessingError> {
        let mut wtr = WriterBuilder::new().from_writer(writer);
        wtr.write_record(self.column_names())?;
        for row in 0..self.n_rows() {
            let record: Vec<String> = self
                .columns()
                .iter()
                .map(|c| c.data.get(row).map(|v| v.to_string()).unwrap_or_default())
                .collect();
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Load a CSV file into a [`Table`].
pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Table, PreprocessingError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let table = Table::from_csv_reader(BufReader::new(file))?;
    debug!(
        path = %path.display(),
        rows = table.n_rows(),
        columns = table.n_cols(),
        "loaded csv"
    );
    Ok(table)
}

/// Turn a `0`/`1` integer column back into an indicator column.
fn restore_indicator(column: &mut Column) -> Result<(), PreprocessingError> {
    let flags = match &column.data {
        ColumnData::Indicator(_) => return Ok(()),
        ColumnData::Integer(v) => v
            .iter()
            .map(|x| match x {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            })
            .collect::<Option<Vec<bool>>>(),
        _ => None,
    };
    match flags {
        Some(flags) => {
            column.data = ColumnData::Indicator(flags);
            Ok(())
        }
        None => Err(PreprocessingError::TypeMismatch {
            column: column.name.clone(),
            expected: DataType::Indicator.to_string(),
            got: column.dtype().to_string(),
        }),
    }
}

/// Load a CSV file written by the pipeline and check it against `schema`.
///
/// Indicator columns, which are stored as `1`/`0`, get their dtype back.
pub fn read_processed_csv<P: AsRef<Path>>(
    path: P,
    schema: &Schema,
) -> Result<Table, PreprocessingError> {
    let mut table = read_csv(path)?;
    for column in table.columns_mut() {
        if schema.field(&column.name).map(|f| f.dtype) == Some(DataType::Indicator) {
            restore_indicator(column)?;
        }
    }
    schema.validate(&table, "load")?;
    Ok(table)
}

/// Persist a [`Table`] as CSV, replacing `path` atomically.
pub fn write_csv<P: AsRef<Path>>(table: &Table, path: P) -> Result<(), PreprocessingError> {
    let mut buffer = Vec::new();
    table.to_csv_writer(&mut buffer)?;
    write_atomic(path.as_ref(), &buffer)?;
    debug!(
        path = %path.as_ref().display(),
        rows = table.n_rows(),
        columns = table.n_cols(),
        "wrote csv"
    );
    Ok(())
}
