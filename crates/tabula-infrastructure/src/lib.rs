pub mod chart;
pub mod config_service;
pub mod ingest;
pub mod paths;
pub mod storage;

pub use chart::PlottersChartRenderer;
pub use config_service::{load_config, load_config_from};
pub use ingest::{decode_upload, UploadFormat};
pub use paths::TabulaPaths;
pub use storage::CsvDatasetStore;
