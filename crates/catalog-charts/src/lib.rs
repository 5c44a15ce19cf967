//! Chart generation for the book catalog analyzer.
//!
//! Defines the [`renderer::ChartRenderer`] interface used by the presentation
//! layer and a PNG implementation built on [`plotters`].

pub mod plotters_renderer;
pub mod renderer;

pub use plotters_renderer::PlottersRenderer;
pub use renderer::{ChartError, ChartRenderer, Series};
