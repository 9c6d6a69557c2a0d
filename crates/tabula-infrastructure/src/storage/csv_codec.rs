//! CSV encoding and decoding for the canonical tabular format.

use std::io::Cursor;
use tabula_core::dataset::Dataset;
use tabula_core::error::{Result, TabulaError};

/// Encodes a dataset as CSV bytes: one header record, then one record per
/// row, cells in canonical textual form.
pub fn encode_csv(dataset: &Dataset) -> Result<Vec<u8>> {
    let (headers, rows) = dataset.to_string_rows();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&headers)
        .map_err(|e| TabulaError::io(format!("CSV write: {e}")))?;
    for row in &rows {
        writer
            .write_record(row)
            .map_err(|e| TabulaError::io(format!("CSV write: {e}")))?;
    }
    writer
        .into_inner()
        .map_err(|e| TabulaError::io(format!("CSV flush: {e}")))
}

/// Decodes CSV bytes into a dataset, treating the first record as headers.
///
/// # Errors
///
/// Returns [`TabulaError::Parse`] for malformed CSV or an invalid header
/// row.
pub fn decode_csv(bytes: &[u8]) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(Cursor::new(bytes));

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| TabulaError::parse(format!("CSV: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| TabulaError::parse(format!("CSV: {e}")))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Dataset::from_string_rows(headers, rows)
}
