//! CSV Dashboard Main Application
//! Main window with dataset selection, the data grid and secondary windows.

use crate::config::DashboardConfig;
use crate::data::{load_csv, parse_separator, DatasetRegistry, LoaderError};
use crate::gui::dialogs::{AddRowForm, FormOutcome, MessageDialog};
use crate::gui::{
    ComparatorWindow, ControlPanel, ControlPanelAction, DataGrid, StatisticsWindow,
    VisualizerWindow,
};
use egui::RichText;
use std::path::Path;
use tracing::{error, info, warn};

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    registry: DatasetRegistry,
    control_panel: ControlPanel,
    current: Option<String>,

    message: Option<MessageDialog>,
    add_row: Option<AddRowForm>,

    statistics_windows: Vec<StatisticsWindow>,
    comparator_windows: Vec<ComparatorWindow>,
    visualizer_windows: Vec<VisualizerWindow>,
    next_window_id: u64,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        Self {
            control_panel: ControlPanel::new(&config.default_separator),
            config,
            registry: DatasetRegistry::new(),
            current: None,
            message: None,
            add_row: None,
            statistics_windows: Vec::new(),
            comparator_windows: Vec::new(),
            visualizer_windows: Vec::new(),
            next_window_id: 0,
        }
    }

    fn window_id(&mut self) -> u64 {
        self.next_window_id += 1;
        self.next_window_id
    }

    /// Handle CSV file selection
    fn handle_add_csv(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV files", &["csv"])
            .pick_file()
        else {
            return;
        };

        match self.load_file(&path) {
            Ok(name) => {
                self.message = Some(MessageDialog::info(
                    "Success",
                    format!("File '{}' loaded successfully.", name),
                ));
            }
            Err(e) => {
                error!("Failed to load {}: {}", path.display(), e);
                self.control_panel.set_error(format!("Error: {}", e));
                self.message = Some(MessageDialog::error("Error", format!("Loading failed: {}", e)));
            }
        }
    }

    fn load_file(&mut self, path: &Path) -> Result<String, LoaderError> {
        let separator = parse_separator(&self.control_panel.separator)?;
        let dataset = load_csv(path, separator)?;
        let name = dataset.name().to_string();

        self.registry.insert(dataset);
        self.select_dataset(&name);
        Ok(name)
    }

    fn select_dataset(&mut self, name: &str) {
        let Some(dataset) = self.registry.get(name) else {
            return;
        };
        self.control_panel.set_status(format!(
            "{}: {} rows, {} columns",
            name,
            dataset.row_count(),
            dataset.column_names().len()
        ));
        self.current = Some(name.to_string());
    }

    fn handle_sort(&mut self, column: &str) {
        let Some(name) = self.current.clone() else {
            return;
        };
        let Some(dataset) = self.registry.get_mut(&name) else {
            return;
        };

        if let Err(e) = dataset.sort_by_column(column) {
            warn!("Sort failed: {}", e);
            self.message = Some(MessageDialog::error("Sort", e.to_string()));
        }
    }

    fn handle_add_row(&mut self) {
        if let Some(dataset) = self.current.as_deref().and_then(|n| self.registry.get(n)) {
            self.add_row = Some(AddRowForm::new(dataset.name(), dataset.column_names()));
        }
    }

    fn submit_row(&mut self, dataset: &str, values: Vec<String>) {
        let Some(target) = self.registry.get_mut(dataset) else {
            return;
        };

        match target.append_row(&values) {
            Ok(()) => {
                info!("Appended a row to '{}'", dataset);
                self.select_dataset(dataset);
            }
            Err(e) => {
                warn!("Append failed: {}", e);
                self.message = Some(MessageDialog::error("Add row", e.to_string()));
            }
        }
    }

    fn open_statistics(&mut self) {
        let id = self.window_id();
        if let Some(dataset) = self.current.as_deref().and_then(|n| self.registry.get(n)) {
            self.statistics_windows
                .push(StatisticsWindow::new(id, dataset, &self.config));
        }
    }

    fn open_visualizer(&mut self) {
        let id = self.window_id();
        if let Some(name) = self.current.clone() {
            self.visualizer_windows.push(VisualizerWindow::new(id, &name));
        }
    }

    fn open_comparator(&mut self) {
        if self.registry.len() < 2 {
            self.message = Some(MessageDialog::warning(
                "Compare",
                "Add at least two files to compare.",
            ));
            return;
        }

        let id = self.window_id();
        self.comparator_windows.push(ComparatorWindow::new(
            id,
            self.registry.numeric_frames(),
            &self.config,
        ));
    }

    fn show_secondary_windows(&mut self, ctx: &egui::Context) {
        for window in &mut self.statistics_windows {
            window.show(ctx);
        }
        for window in &mut self.comparator_windows {
            window.show(ctx);
        }
        for window in &mut self.visualizer_windows {
            window.show(ctx, &self.registry, &self.config);
        }

        self.statistics_windows.retain(StatisticsWindow::is_open);
        self.comparator_windows.retain(ComparatorWindow::is_open);
        self.visualizer_windows.retain(VisualizerWindow::is_open);
    }

    fn show_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(form) = &mut self.add_row {
            match form.show(ctx) {
                FormOutcome::Pending => {}
                FormOutcome::Cancel => self.add_row = None,
                FormOutcome::Submit(values) => {
                    let dataset = form.dataset.clone();
                    self.add_row = None;
                    self.submit_row(&dataset, values);
                }
            }
        }

        if let Some(message) = &self.message {
            if message.show(ctx) {
                self.message = None;
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("control_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            let action = self
                .control_panel
                .show(ui, &self.registry, self.current.as_deref());
            ui.add_space(2.0);

            match action {
                ControlPanelAction::AddCsv => self.handle_add_csv(),
                ControlPanelAction::SelectDataset(name) => self.select_dataset(&name),
                ControlPanelAction::OpenVisualizer => self.open_visualizer(),
                ControlPanelAction::OpenStatistics => self.open_statistics(),
                ControlPanelAction::AddRow => self.handle_add_row(),
                ControlPanelAction::OpenComparator => self.open_comparator(),
                ControlPanelAction::None => {}
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let clicked = match self.current.as_deref().and_then(|n| self.registry.get(n)) {
                Some(dataset) => DataGrid::show(ui, dataset),
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.label(RichText::new("Add a CSV file to get started").size(20.0));
                    });
                    None
                }
            };
            if let Some(column) = clicked {
                self.handle_sort(&column);
            }
        });

        self.show_secondary_windows(ctx);
        self.show_dialogs(ctx);
    }
}
