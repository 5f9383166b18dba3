//! Charts module - Chart building and rendering

mod plotter;
mod renderer;
mod xy;

pub use plotter::{BarOrientation, ChartPlotter, MEAN_COLOR, STD_COLOR};
pub use renderer::StaticChartRenderer;
pub use xy::{build_chart, pie_wedge, ChartBody, ChartKind, PieSlice, XyChart};
