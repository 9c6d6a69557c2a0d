//! Chart renderer trait.

use super::model::{ChartImage, ChartRequest};
use crate::dataset::Dataset;
use crate::error::Result;
use async_trait::async_trait;

/// The rendering boundary: given a dataset and a validated request, produce
/// a transient image.
///
/// Implementations draw; they do not persist anything. Column validation is
/// re-run by callers before rendering (see
/// [`ChartRequest::validate`](super::model::ChartRequest::validate)), but an
/// implementation may still fail with
/// [`TabulaError::Render`](crate::TabulaError::Render) if the backend
/// rejects the data.
#[async_trait]
pub trait ChartRenderer: Send + Sync {
    async fn render(&self, dataset: &Dataset, request: &ChartRequest) -> Result<ChartImage>;
}
