//! Chart request value object and its validation.
//!
//! A [`ChartRequest`] is ephemeral: constructed for one rendering call,
//! validated against the dataset's schema descriptor, and discarded.

use crate::dataset::{Dataset, DatasetSchema};
use crate::error::{Result, TabulaError};
use serde::{Deserialize, Serialize};

/// The supported chart kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

/// A single chart rendering request.
///
/// `value_column` is required for [`ChartKind::Bar`] and [`ChartKind::Line`]
/// and must reference a numeric column; [`ChartKind::Pie`] ignores it
/// entirely and charts the frequency distribution of `label_column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRequest {
    pub kind: ChartKind,
    pub label_column: String,
    pub value_column: Option<String>,
}

impl ChartRequest {
    /// Validates column references against the schema descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`TabulaError::InvalidColumn`] when the label column is
    /// absent, or when a Bar/Line request is missing its value column or
    /// references a non-numeric one.
    pub fn validate(&self, schema: &DatasetSchema) -> Result<()> {
        if schema.field(&self.label_column).is_none() {
            return Err(TabulaError::invalid_column(
                &self.label_column,
                "column not found",
            ));
        }

        match self.kind {
            ChartKind::Bar | ChartKind::Line => {
                let value_column = self.value_column.as_deref().ok_or_else(|| {
                    TabulaError::invalid_column(
                        "",
                        format!("{:?} charts require a value column", self.kind),
                    )
                })?;
                if schema.field(value_column).is_none() {
                    return Err(TabulaError::invalid_column(value_column, "column not found"));
                }
                if !schema.is_numeric(value_column) {
                    return Err(TabulaError::invalid_column(
                        value_column,
                        "column is not numeric",
                    ));
                }
                Ok(())
            }
            // Pie only reads the label column; any supplied value column is
            // ignored, valid or not.
            ChartKind::Pie => Ok(()),
        }
    }
}

/// One slice of a pie chart's frequency distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    /// Share of all non-empty labels, rounded to one decimal place.
    pub percent: f64,
}

/// Frequency distribution of a label column, ordered by descending count
/// (ties keep first-appearance order). Empty cells are excluded.
///
/// # Errors
///
/// Returns [`TabulaError::InvalidColumn`] when the column is absent, and
/// [`TabulaError::Render`] when it holds no non-empty labels.
pub fn pie_distribution(dataset: &Dataset, label_column: &str) -> Result<Vec<PieSlice>> {
    let labels = dataset.label_cells(label_column)?;

    let mut counts: Vec<(String, usize)> = Vec::new();
    for label in labels.into_iter().flatten() {
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, count)) => *count += 1,
            None => counts.push((label, 1)),
        }
    }
    if counts.is_empty() {
        return Err(TabulaError::render(format!(
            "column '{label_column}' has no values to chart"
        )));
    }

    let total: usize = counts.iter().map(|(_, c)| c).sum();
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    Ok(counts
        .into_iter()
        .map(|(label, count)| PieSlice {
            label,
            count,
            percent: (count as f64 / total as f64 * 1000.0).round() / 10.0,
        })
        .collect())
}

/// A transient rendered chart: tightly packed RGB8 pixels, row-major,
/// `width * height * 3` bytes. Never persisted; the presentation layer
/// encodes or displays it immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartImage {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}
