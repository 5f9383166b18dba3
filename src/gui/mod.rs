//! GUI module - User interface components

mod app;
mod comparator_window;
mod control_panel;
mod data_grid;
mod dialogs;
mod statistics_window;
mod visualizer_window;

pub use app::DashboardApp;
pub use comparator_window::ComparatorWindow;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use data_grid::DataGrid;
pub use statistics_window::StatisticsWindow;
pub use visualizer_window::VisualizerWindow;
