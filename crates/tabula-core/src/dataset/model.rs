//! Dataset domain model.
//!
//! Columns are typed once, when the dataset is built from textual cells, and
//! the declared type is what all downstream validation consults. Cells keep
//! per-row nullability so ragged or partially filled tables survive the
//! round-trip through the canonical on-disk format.

use super::schema::{DatasetSchema, FieldDescriptor};
use crate::error::{Result, TabulaError};
use serde::{Deserialize, Serialize};

/// The declared type of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    /// Whole numbers (every non-empty cell parses as `i64`).
    Integer,
    /// Real numbers (every non-empty cell parses as `f64`).
    Float,
    /// Everything else, including categorical labels.
    Text,
}

impl ColumnType {
    /// Whether the column can feed a numeric chart axis or statistics.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

/// Typed cell storage for a single column.
///
/// `None` marks an empty cell in the source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnData {
    Integer(Vec<Option<i64>>),
    Float(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    /// Returns the declared type of this column.
    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Integer(_) => ColumnType::Integer,
            Self::Float(_) => ColumnType::Float,
            Self::Text(_) => ColumnType::Text,
        }
    }

    /// Number of cells (including empty ones).
    pub fn len(&self) -> usize {
        match self {
            Self::Integer(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    /// Whether the column holds no cells at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The cell at `row` rendered in canonical textual form.
    ///
    /// Floats with a zero fraction keep a trailing `.0` so the declared type
    /// survives a save/load round trip.
    pub fn cell_to_string(&self, row: usize) -> Option<String> {
        match self {
            Self::Integer(v) => v.get(row)?.map(|n| n.to_string()),
            Self::Float(v) => v.get(row)?.map(format_float),
            Self::Text(v) => v.get(row)?.clone(),
        }
    }

    /// The cell at `row` as a numeric value; `None` for empty cells and for
    /// text columns.
    pub fn cell_to_f64(&self, row: usize) -> Option<f64> {
        match self {
            Self::Integer(v) => v.get(row)?.map(|n| n as f64),
            Self::Float(v) => *v.get(row)?,
            Self::Text(_) => None,
        }
    }
}

fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

/// An in-memory table with named, typed columns and an ordered sequence of
/// rows.
///
/// Equality compares names, declared types, row count, and every cell value,
/// which is exactly the round-trip law the dataset store must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Builds a dataset from textual headers and row cells, inferring each
    /// column's type once.
    ///
    /// Inference per column: if every non-empty cell parses as `i64` the
    /// column is `Integer`; otherwise if every non-empty cell parses as a
    /// non-NaN `f64` it is `Float`; otherwise (including all-empty columns
    /// and columns containing a literal `NaN`) it is `Text`. Ragged rows
    /// are padded with empty cells.
    ///
    /// # Errors
    ///
    /// Returns [`TabulaError::Parse`] when there are no headers, or a header
    /// is empty or duplicated.
    pub fn from_string_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if headers.is_empty() {
            return Err(TabulaError::parse("table has no header row"));
        }
        for (index, header) in headers.iter().enumerate() {
            if header.trim().is_empty() {
                return Err(TabulaError::parse(format!(
                    "column {} has an empty header",
                    index + 1
                )));
            }
            if headers[..index].contains(header) {
                return Err(TabulaError::parse(format!("duplicate column '{header}'")));
            }
        }

        let row_count = rows.len();
        let columns = headers
            .into_iter()
            .enumerate()
            .map(|(col, name)| {
                let cells: Vec<Option<&str>> = rows
                    .iter()
                    .map(|row| row.get(col).map(String::as_str).filter(|c| !c.is_empty()))
                    .collect();
                Column {
                    name,
                    data: infer_column(&cells),
                }
            })
            .collect();

        Ok(Self { columns, row_count })
    }

    /// The inverse of [`Dataset::from_string_rows`]: headers plus every row
    /// rendered in canonical textual form (empty string for empty cells).
    pub fn to_string_rows(&self) -> (Vec<String>, Vec<Vec<String>>) {
        let headers = self.columns.iter().map(|c| c.name.clone()).collect();
        let rows = (0..self.row_count)
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| c.data.cell_to_string(row).unwrap_or_default())
                    .collect()
            })
            .collect();
        (headers, rows)
    }

    /// The explicit schema descriptor: column names and declared types, in
    /// column order.
    pub fn schema(&self) -> DatasetSchema {
        DatasetSchema::new(
            self.columns
                .iter()
                .map(|c| FieldDescriptor {
                    name: c.name.clone(),
                    column_type: c.data.column_type(),
                })
                .collect(),
        )
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// All columns in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Numeric cells of `name`, row-aligned (`None` for empty cells).
    ///
    /// # Errors
    ///
    /// Returns [`TabulaError::InvalidColumn`] if the column is absent or not
    /// numeric.
    pub fn numeric_cells(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let column = self
            .column(name)
            .ok_or_else(|| TabulaError::invalid_column(name, "column not found"))?;
        if !column.data.column_type().is_numeric() {
            return Err(TabulaError::invalid_column(name, "column is not numeric"));
        }
        Ok((0..self.row_count)
            .map(|row| column.data.cell_to_f64(row))
            .collect())
    }

    /// Textual cells of `name`, row-aligned (`None` for empty cells). Any
    /// column type is accepted; values are stringified.
    ///
    /// # Errors
    ///
    /// Returns [`TabulaError::InvalidColumn`] if the column is absent.
    pub fn label_cells(&self, name: &str) -> Result<Vec<Option<String>>> {
        let column = self
            .column(name)
            .ok_or_else(|| TabulaError::invalid_column(name, "column not found"))?;
        Ok((0..self.row_count)
            .map(|row| column.data.cell_to_string(row))
            .collect())
    }
}

fn infer_column(cells: &[Option<&str>]) -> ColumnData {
    let non_empty: Vec<&str> = cells.iter().flatten().map(|c| c.trim()).collect();

    if !non_empty.is_empty() && non_empty.iter().all(|c| c.parse::<i64>().is_ok()) {
        return ColumnData::Integer(
            cells
                .iter()
                .map(|c| c.and_then(|c| c.trim().parse().ok()))
                .collect(),
        );
    }
    // NaN is excluded from Float: a NaN cell would never compare equal to
    // itself, so a reloaded dataset could not satisfy the round-trip law.
    if !non_empty.is_empty()
        && non_empty
            .iter()
            .all(|c| c.parse::<f64>().is_ok_and(|v| !v.is_nan()))
    {
        return ColumnData::Float(
            cells
                .iter()
                .map(|c| c.and_then(|c| c.trim().parse().ok()))
                .collect(),
        );
    }
    ColumnData::Text(cells.iter().map(|c| c.map(str::to_string)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn sample_dataset() -> Dataset {
        Dataset::from_string_rows(
            strings(&["region", "sales", "growth"]),
            vec![
                strings(&["north", "120", "1.5"]),
                strings(&["south", "90", "2.0"]),
                strings(&["north", "75", "0.25"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_type_inference() {
        let dataset = sample_dataset();
        let schema = dataset.schema();
        assert_eq!(schema.field("region").unwrap().column_type, ColumnType::Text);
        assert_eq!(
            schema.field("sales").unwrap().column_type,
            ColumnType::Integer
        );
        assert_eq!(
            schema.field("growth").unwrap().column_type,
            ColumnType::Float
        );
    }

    #[test]
    fn test_mixed_column_falls_back_to_text() {
        let dataset = Dataset::from_string_rows(
            strings(&["code"]),
            vec![strings(&["12"]), strings(&["x9"])],
        )
        .unwrap();
        assert_eq!(
            dataset.schema().field("code").unwrap().column_type,
            ColumnType::Text
        );
    }

    #[test]
    fn test_nan_literal_column_is_text_and_round_trips() {
        let dataset = Dataset::from_string_rows(
            strings(&["reading"]),
            vec![strings(&["1.5"]), strings(&["NaN"])],
        )
        .unwrap();
        assert_eq!(
            dataset.schema().field("reading").unwrap().column_type,
            ColumnType::Text
        );

        let (headers, rows) = dataset.to_string_rows();
        let rebuilt = Dataset::from_string_rows(headers, rows).unwrap();
        assert_eq!(rebuilt, dataset);
    }

    #[test]
    fn test_all_empty_column_is_text() {
        let dataset =
            Dataset::from_string_rows(strings(&["blank"]), vec![strings(&[""]), strings(&[""])])
                .unwrap();
        assert_eq!(
            dataset.schema().field("blank").unwrap().column_type,
            ColumnType::Text
        );
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let dataset = Dataset::from_string_rows(
            strings(&["a", "b"]),
            vec![strings(&["1", "2"]), strings(&["3"])],
        )
        .unwrap();
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.numeric_cells("b").unwrap(), vec![Some(2.0), None]);
    }

    #[test]
    fn test_duplicate_header_rejected() {
        let err = Dataset::from_string_rows(strings(&["a", "a"]), vec![]).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_empty_header_rejected() {
        let err = Dataset::from_string_rows(strings(&["a", " "]), vec![]).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_string_rows_round_trip() {
        let dataset = sample_dataset();
        let (headers, rows) = dataset.to_string_rows();
        let rebuilt = Dataset::from_string_rows(headers, rows).unwrap();
        assert_eq!(rebuilt, dataset);
    }

    #[test]
    fn test_float_with_zero_fraction_keeps_type_through_round_trip() {
        let dataset = Dataset::from_string_rows(
            strings(&["ratio"]),
            vec![strings(&["1.0"]), strings(&["2.0"])],
        )
        .unwrap();
        let (headers, rows) = dataset.to_string_rows();
        assert_eq!(rows[0][0], "1.0");
        let rebuilt = Dataset::from_string_rows(headers, rows).unwrap();
        assert_eq!(
            rebuilt.schema().field("ratio").unwrap().column_type,
            ColumnType::Float
        );
        assert_eq!(rebuilt, dataset);
    }

    #[test]
    fn test_numeric_cells_rejects_text_column() {
        let err = sample_dataset().numeric_cells("region").unwrap_err();
        assert!(err.is_invalid_column());
    }

    #[test]
    fn test_label_cells_stringify_any_column() {
        let labels = sample_dataset().label_cells("sales").unwrap();
        assert_eq!(labels[0].as_deref(), Some("120"));
    }
}
