//! Tabular dataset domain model.
//!
//! A [`Dataset`] is an in-memory table with named, typed columns. At most one
//! dataset is "current" for a storage slot at a time; persistence is handled
//! by a [`DatasetRepository`] implementation.

pub mod model;
pub mod repository;
pub mod schema;
pub mod summary;

pub use model::{Column, ColumnData, ColumnType, Dataset};
pub use repository::DatasetRepository;
pub use schema::{DatasetSchema, FieldDescriptor};
pub use summary::{ColumnSummary, DatasetSummary};
