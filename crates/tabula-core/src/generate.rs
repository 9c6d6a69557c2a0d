//! Text generation boundary.
//!
//! The model handle is an external collaborator consumed through this trait;
//! inference internals and tokenization stay behind it.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sampling and budget options for a generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Sampling randomness in `[0, 1]`.
    pub temperature: f32,
    /// Output length cap, in tokens.
    pub max_tokens: u32,
    /// Nucleus-sampling threshold.
    pub top_p: f32,
    /// Combined prompt + history token budget.
    pub context_window: u32,
    /// Inference batching width.
    pub batch_size: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            max_tokens: 512,
            top_p: 0.95,
            context_window: 4096,
            batch_size: 64,
        }
    }
}

/// A bound local-inference capability.
///
/// Loading the underlying model is expensive (seconds) and must happen at
/// most once per process: `load` is required to be idempotent, and
/// implementations guard the actual load behind a once-cell so repeated
/// calls after a success are no-ops.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Ensures the model is loaded and reachable.
    ///
    /// # Errors
    ///
    /// Returns [`TabulaError::ModelLoad`](crate::TabulaError::ModelLoad) if
    /// the model artifact is missing or incompatible. A failed load may be
    /// retried by calling again.
    async fn load(&self) -> Result<()>;

    /// Generates text from `prompt`, blocking the caller until the model
    /// returns.
    ///
    /// # Errors
    ///
    /// Returns [`TabulaError::Inference`](crate::TabulaError::Inference) on
    /// generation failure (e.g. context overflow). Never panics.
    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String>;
}
