use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

use super::ObservationSeries;
use crate::error::{ForecastError, Result};

/// Column holding the daily production figures in the reference dataset
pub const DEFAULT_COLUMN: &str = "Daily Power Production";

/// Load one numeric column from a CSV file with a header row
pub fn load_column<P: AsRef<Path>>(path: P, column: &str) -> Result<ObservationSeries> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let series = read_column(BufReader::new(file), column)?;

    info!(
        path = %path.display(),
        column,
        rows = series.len(),
        "Loaded observation series"
    );

    Ok(series)
}

/// Read one numeric column from any CSV source
pub fn read_column<R: Read>(source: R, column: &str) -> Result<ObservationSeries> {
    let mut reader = csv::Reader::from_reader(source);

    let headers = reader.headers()?.clone();
    let col_idx = headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| {
            ForecastError::Data(format!(
                "Column '{}' not found (available: {})",
                column,
                headers.iter().collect::<Vec<_>>().join(", ")
            ))
        })?;

    debug!(column, index = col_idx, "Resolved column");

    let mut values = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let cell = record.get(col_idx).unwrap_or("").trim();
        let value: f64 = cell.parse().map_err(|_| {
            ForecastError::Data(format!(
                "Row {} of column '{}' is not numeric: '{}'",
                row + 1,
                column,
                cell
            ))
        })?;
        if !value.is_finite() {
            return Err(ForecastError::Data(format!(
                "Row {} of column '{}' is not finite: '{}'",
                row + 1,
                column,
                cell
            )));
        }
        values.push(value);
    }

    Ok(ObservationSeries::new(column, values))
}
