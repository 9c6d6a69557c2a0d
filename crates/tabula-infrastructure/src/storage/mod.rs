//! Dataset slot persistence.

pub mod atomic_file;
pub mod csv_codec;
pub mod dataset_store;

pub use atomic_file::AtomicSlotFile;
pub use dataset_store::CsvDatasetStore;
