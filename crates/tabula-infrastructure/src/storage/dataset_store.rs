//! Single-slot CSV dataset store.

use super::atomic_file::AtomicSlotFile;
use super::csv_codec::{decode_csv, encode_csv};
use async_trait::async_trait;
use std::path::PathBuf;
use tabula_core::dataset::{Dataset, DatasetRepository};
use tabula_core::error::Result;

/// Persists the current dataset as one CSV file at a fixed location.
///
/// The slot is not content-addressed and not namespaced: every save replaces
/// whatever was there before, and concurrent writers race with last-writer-
/// wins. The atomic replacement only guarantees a reader never sees a
/// half-written file.
pub struct CsvDatasetStore {
    slot: AtomicSlotFile,
}

impl CsvDatasetStore {
    /// Creates a store backed by the file at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            slot: AtomicSlotFile::new(path),
        }
    }
}

#[async_trait]
impl DatasetRepository for CsvDatasetStore {
    async fn save(&self, dataset: &Dataset) -> Result<()> {
        let bytes = encode_csv(dataset)?;
        self.slot.write(&bytes)?;
        tracing::info!(
            path = %self.slot.path().display(),
            rows = dataset.row_count(),
            columns = dataset.columns().len(),
            "dataset saved"
        );
        Ok(())
    }

    async fn load(&self) -> Result<Option<Dataset>> {
        match self.slot.read()? {
            Some(bytes) => Ok(Some(decode_csv(&bytes)?)),
            None => Ok(None),
        }
    }
}
