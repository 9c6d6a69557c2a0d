//! Chart rendering backend.

pub mod plotters_renderer;

pub use plotters_renderer::PlottersChartRenderer;
