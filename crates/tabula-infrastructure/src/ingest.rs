//! Upload ingestion: raw file bytes in, dataset out.
//!
//! All accepted input formats are normalized to the in-memory dataset model
//! (and from there to the canonical CSV slot on save). Spreadsheet metadata
//! is discarded; only the first sheet of a workbook is ever considered.

use crate::storage::csv_codec::decode_csv;
use calamine::{Data, Range, Reader, Xls, Xlsx};
use std::io::Cursor;
use tabula_core::dataset::Dataset;
use tabula_core::error::{Result, TabulaError};

/// Accepted upload formats, derived from the declared file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Csv,
    Xlsx,
    Xls,
}

impl UploadFormat {
    /// Maps a file extension to a format.
    ///
    /// # Errors
    ///
    /// Returns [`TabulaError::Parse`] for anything other than `csv`, `xlsx`,
    /// or `xls` (case-insensitive).
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            "xls" => Ok(Self::Xls),
            other => Err(TabulaError::parse(format!(
                "unsupported file extension '{other}' (expected csv, xlsx, or xls)"
            ))),
        }
    }
}

/// Decodes uploaded bytes into a dataset.
///
/// # Errors
///
/// Returns [`TabulaError::Parse`] when the bytes are not valid for the
/// declared format or the table has no usable header row.
pub fn decode_upload(bytes: &[u8], format: UploadFormat) -> Result<Dataset> {
    match format {
        UploadFormat::Csv => decode_csv(bytes),
        UploadFormat::Xlsx => {
            let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
                .map_err(|e| TabulaError::parse(format!("XLSX: {e}")))?;
            let range = workbook
                .worksheet_range_at(0)
                .ok_or_else(|| TabulaError::parse("workbook has no sheets"))?
                .map_err(|e| TabulaError::parse(format!("XLSX: {e}")))?;
            range_to_dataset(&range)
        }
        UploadFormat::Xls => {
            let mut workbook: Xls<_> = Xls::new(Cursor::new(bytes))
                .map_err(|e| TabulaError::parse(format!("XLS: {e}")))?;
            let range = workbook
                .worksheet_range_at(0)
                .ok_or_else(|| TabulaError::parse("workbook has no sheets"))?
                .map_err(|e| TabulaError::parse(format!("XLS: {e}")))?;
            range_to_dataset(&range)
        }
    }
}

fn range_to_dataset(range: &Range<Data>) -> Result<Dataset> {
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| TabulaError::parse("sheet is empty"))?
        .iter()
        .map(cell_to_string)
        .collect();

    let data_rows: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Dataset::from_string_rows(headers, data_rows)
}

/// Renders a spreadsheet cell in the same textual form the CSV path sees,
/// so type inference treats both formats alike. Whole floats print without
/// a fraction because spreadsheets store integers as floats.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::dataset::ColumnType;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(UploadFormat::from_extension("csv").unwrap(), UploadFormat::Csv);
        assert_eq!(UploadFormat::from_extension("XLSX").unwrap(), UploadFormat::Xlsx);
        assert_eq!(UploadFormat::from_extension(".xls").unwrap(), UploadFormat::Xls);
        assert!(UploadFormat::from_extension("pdf").unwrap_err().is_parse());
    }

    #[test]
    fn test_decode_csv_upload() {
        let dataset = decode_upload(b"region,sales\nnorth,120\nsouth,90\n", UploadFormat::Csv).unwrap();
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(
            dataset.schema().field("sales").unwrap().column_type,
            ColumnType::Integer
        );
    }

    #[test]
    fn test_decode_garbage_xlsx_is_parse_error() {
        let err = decode_upload(b"definitely not a zip archive", UploadFormat::Xlsx).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_whole_floats_stringify_as_integers() {
        assert_eq!(cell_to_string(&Data::Float(120.0)), "120");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }
}
