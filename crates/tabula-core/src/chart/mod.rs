//! Chart requests and the renderer boundary.

pub mod model;
pub mod renderer;

pub use model::{pie_distribution, ChartImage, ChartKind, ChartRequest, PieSlice};
pub use renderer::ChartRenderer;
