// ============================================================
// Layer 4 — Numeric Table Reader
// ============================================================
// Reads a comma-delimited file of numbers into an [rows, cols]
// ndarray matrix. Both benchmark formats are purely numeric:
//
//   Twin_data.csv       one header row, 32 numeric columns
//   ihdp_npci_N.csv     no header, 30 numeric columns
//
// The reader is flexible at the csv level and checks row widths
// itself, so a ragged file reports the offending row number
// instead of a generic csv error.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use std::{fs::File, path::Path};

use csv::ReaderBuilder;
use ndarray::Array2;

use crate::domain::error::DatasetError;

/// Read a numeric CSV table, optionally skipping a header row.
pub fn read_numeric_table(path: &Path, has_header: bool) -> Result<Array2<f64>, DatasetError> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut rdr = ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut width: Option<usize> = None;
    let mut rows = 0usize;
    let mut values: Vec<f64> = Vec::new();

    for (row_idx, result) in rdr.records().enumerate() {
        let record = result?;

        // Blank lines come through as a single empty field
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }

        // Row numbers in messages are 1-based data rows
        let row_no = row_idx + 1;
        match width {
            None => width = Some(record.len()),
            Some(w) if w != record.len() => {
                return Err(DatasetError::malformed(
                    path,
                    format!("row {row_no} has {} columns, expected {w}", record.len()),
                ));
            }
            Some(_) => {}
        }

        for (col, field) in record.iter().enumerate() {
            let value = field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    DatasetError::malformed(
                        path,
                        format!("row {row_no}, column {}: '{field}' is not a finite number", col + 1),
                    )
                })?;
            values.push(value);
        }
        rows += 1;
    }

    let cols = match width {
        Some(w) if rows > 0 => w,
        _ => return Err(DatasetError::malformed(path, "table has no data rows")),
    };

    tracing::debug!("Read {} x {} table from '{}'", rows, cols, path.display());

    Array2::from_shape_vec((rows, cols), values)
        .map_err(|e| DatasetError::malformed(path, e.to_string()))
}
