//! Error types for the Tabula workflow library.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for every Tabula operation.
///
/// Each variant corresponds to one failure kind the presentation layer can
/// pattern-match on. Errors are always returned as values; none of them is
/// ever allowed to abort the hosting process.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum TabulaError {
    /// Storage could not be read or written (disk full, permissions, etc.).
    #[error("IO error: {message}")]
    Io { message: String },

    /// A question was asked before any dataset was uploaded.
    #[error("no dataset has been uploaded yet; upload a spreadsheet or CSV file first")]
    NoDataset,

    /// A chart request referenced a missing column, or a column of the
    /// wrong type for the requested slot.
    #[error("invalid column '{column}': {reason}")]
    InvalidColumn { column: String, reason: String },

    /// The model artifact is missing or incompatible; the session cannot
    /// reach its ready state.
    #[error("model load failed: {0}")]
    ModelLoad(String),

    /// Text generation failed (context overflow, backend error). The
    /// session stays usable and the transcript is left untouched.
    #[error("inference failed: {0}")]
    Inference(String),

    /// Uploaded bytes or a persisted slot file could not be decoded.
    #[error("malformed tabular data: {0}")]
    Parse(String),

    /// The chart backend failed while drawing.
    #[error("chart rendering failed: {0}")]
    Render(String),

    /// Internal error (should not happen in normal operation).
    #[error("internal error: {0}")]
    Internal(String),
}

impl TabulaError {
    /// Creates an IO error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an InvalidColumn error.
    pub fn invalid_column(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidColumn {
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Creates a ModelLoad error.
    pub fn model_load(message: impl Into<String>) -> Self {
        Self::ModelLoad(message.into())
    }

    /// Creates an Inference error.
    pub fn inference(message: impl Into<String>) -> Self {
        Self::Inference(message.into())
    }

    /// Creates a Parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates a Render error.
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }

    /// Creates an Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Check if this is a NoDataset error.
    pub fn is_no_dataset(&self) -> bool {
        matches!(self, Self::NoDataset)
    }

    /// Check if this is an InvalidColumn error.
    pub fn is_invalid_column(&self) -> bool {
        matches!(self, Self::InvalidColumn { .. })
    }

    /// Check if this is a ModelLoad error.
    pub fn is_model_load(&self) -> bool {
        matches!(self, Self::ModelLoad(_))
    }

    /// Check if this is an Inference error.
    pub fn is_inference(&self) -> bool {
        matches!(self, Self::Inference(_))
    }

    /// Check if this is a Parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse(_))
    }
}

impl From<std::io::Error> for TabulaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TabulaError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(format!("JSON: {err}"))
    }
}

/// A type alias for `Result<T, TabulaError>`.
pub type Result<T> = std::result::Result<T, TabulaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_predicates() {
        assert!(TabulaError::io("disk full").is_io());
        assert!(TabulaError::NoDataset.is_no_dataset());
        assert!(TabulaError::invalid_column("sales", "not numeric").is_invalid_column());
        assert!(TabulaError::model_load("missing artifact").is_model_load());
        assert!(TabulaError::inference("context overflow").is_inference());
        assert!(!TabulaError::inference("context overflow").is_model_load());
    }

    #[test]
    fn test_no_dataset_message_guides_upload() {
        let message = TabulaError::NoDataset.to_string();
        assert!(message.contains("upload"));
    }

    #[test]
    fn test_from_io_error() {
        let err: TabulaError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "ro").into();
        assert!(err.is_io());
    }
}
