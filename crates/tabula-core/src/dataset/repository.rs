//! Dataset repository trait.
//!
//! Defines the interface for persisting the single current dataset,
//! decoupling the workflow from the concrete storage mechanism.

use super::model::Dataset;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract single-slot store for the current dataset.
///
/// The slot holds at most one dataset: `save` unconditionally replaces the
/// previous occupant, with no versioning or history. Implementations are not
/// expected to guard against concurrent writers beyond last-writer-wins.
#[async_trait]
pub trait DatasetRepository: Send + Sync {
    /// Persists `dataset`, overwriting whatever the slot previously held.
    ///
    /// # Errors
    ///
    /// Returns [`TabulaError::Io`](crate::TabulaError::Io) if the destination
    /// cannot be written.
    async fn save(&self, dataset: &Dataset) -> Result<()>;

    /// Loads the most recently saved dataset.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(dataset))`: the slot's current occupant
    /// - `Ok(None)`: nothing has ever been saved to this slot
    /// - `Err(_)`: the slot exists but could not be read or decoded
    async fn load(&self) -> Result<Option<Dataset>>;
}
