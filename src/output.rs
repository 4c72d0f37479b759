//! Output formatting and persistence for prediction rows.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use tracing::{debug, info};

use crate::align::{PredictionRow, SLOT_COUNT};
use csv::WriterBuilder;
use std::fs::{File, OpenOptions};

/// Logs a prediction row using Rust's debug pretty-print format.
pub fn print_pretty(row: &PredictionRow) {
    debug!("{:#?}", row);
}

/// Logs a prediction row as pretty-printed JSON.
pub fn print_json(row: &PredictionRow) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(row)?);
    Ok(())
}

/// Creates or truncates the table and writes its header line:
/// `datetime,t0,t1,...,t23`.
pub fn init_table(path: &str) -> Result<()> {
    debug!(path, "Initializing prediction table");

    let mut writer = WriterBuilder::new().from_writer(File::create(path)?);

    let mut header = vec!["datetime".to_string()];
    header.extend((0..SLOT_COUNT).map(|i| format!("t{i}")));
    writer.write_record(&header)?;
    writer.flush()?;

    Ok(())
}

/// Appends a [`PredictionRow`] as one line of the table.
///
/// The timestamp is written at minute precision; each rate with one decimal
/// place. A missing prediction becomes an empty cell, not a sentinel number.
pub fn append_row(path: &str, row: &PredictionRow) -> Result<()> {
    debug!(path, "Appending prediction row");

    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut writer = WriterBuilder::new().from_writer(file);

    let mut record = vec![row.timestamp.format("%Y-%m-%d %H:%M").to_string()];
    record.extend(row.rates.iter().map(|rate| match rate {
        Some(v) => format!("{v:.1}"),
        None => String::new(),
    }));
    writer.write_record(&record)?;
    writer.flush()?;

    Ok(())
}
