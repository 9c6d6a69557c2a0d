//! Per-column descriptive statistics.
//!
//! Mirrors what the presentation layer shows after an upload: non-null
//! count and declared type for every column, plus mean / sample standard
//! deviation / min / quartiles / max for numeric columns. Quartiles use
//! linear interpolation between the two nearest ranks.

use super::model::{ColumnType, Dataset};
use serde::{Deserialize, Serialize};

/// Descriptive statistics for a single column.
///
/// The numeric fields are `None` for text columns, and the standard
/// deviation is additionally `None` when fewer than two values are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub column_type: ColumnType,
    /// Number of non-empty cells.
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Statistics for every column of a dataset, in column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub row_count: usize,
    pub columns: Vec<ColumnSummary>,
}

impl DatasetSummary {
    /// Computes statistics for `dataset`.
    pub fn describe(dataset: &Dataset) -> Self {
        let columns = dataset
            .columns()
            .iter()
            .map(|column| {
                let column_type = column.data.column_type();
                let values: Vec<f64> = if column_type.is_numeric() {
                    let mut values: Vec<f64> = (0..dataset.row_count())
                        .filter_map(|row| column.data.cell_to_f64(row))
                        .collect();
                    values.sort_by(|a, b| a.total_cmp(b));
                    values
                } else {
                    Vec::new()
                };
                let count = if column_type.is_numeric() {
                    values.len()
                } else {
                    (0..dataset.row_count())
                        .filter(|&row| column.data.cell_to_string(row).is_some())
                        .count()
                };

                ColumnSummary {
                    name: column.name.clone(),
                    column_type,
                    count,
                    mean: mean(&values),
                    std: sample_std(&values),
                    min: values.first().copied(),
                    q25: percentile(&values, 0.25),
                    median: percentile(&values, 0.5),
                    q75: percentile(&values, 0.75),
                    max: values.last().copied(),
                }
            })
            .collect();

        Self {
            row_count: dataset.row_count(),
            columns,
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Linear-interpolation percentile over already-sorted values.
fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let weight = rank - lo as f64;
    Some(sorted[lo] * (1.0 - weight) + sorted[hi] * weight)
}
