//! Explicit schema descriptor for a dataset.
//!
//! The descriptor is computed once when a dataset is built and is the only
//! thing validation logic consults; cell values are never re-inspected at
//! request time.

use super::model::ColumnType;
use serde::{Deserialize, Serialize};

/// A column's name and declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub column_type: ColumnType,
}

/// Ordered column descriptors for one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSchema {
    fields: Vec<FieldDescriptor>,
}

impl DatasetSchema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self { fields }
    }

    /// All descriptors in column order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks up a descriptor by column name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether `name` exists and is numeric.
    pub fn is_numeric(&self, name: &str) -> bool {
        self.field(name)
            .map(|f| f.column_type.is_numeric())
            .unwrap_or(false)
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// The schema line prepended to every question sent to the model,
    /// e.g. `Dataset columns: region, sales.`
    pub fn prompt_line(&self) -> String {
        format!("Dataset columns: {}.", self.column_names().join(", "))
    }
}
