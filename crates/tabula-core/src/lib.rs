pub mod chart;
pub mod config;
pub mod dataset;
pub mod error;
pub mod generate;
pub mod session;

// Re-export common types
pub use chart::{ChartImage, ChartKind, ChartRenderer, ChartRequest};
pub use config::TabulaConfig;
pub use dataset::{Dataset, DatasetRepository, DatasetSchema, DatasetSummary};
pub use error::{Result, TabulaError};
pub use generate::{GenerateOptions, TextGenerator};
pub use session::{ChatSession, ConversationTurn, TurnRole};
