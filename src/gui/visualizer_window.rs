//! Visualizer Window
//! User-configured bar, line, scatter and pie charts of one dataset.

use crate::charts::{build_chart, ChartKind, ChartPlotter, StaticChartRenderer, XyChart};
use crate::config::DashboardConfig;
use crate::data::DatasetRegistry;
use egui::{Color32, ComboBox, RichText};
use tracing::{info, warn};

const NO_COLUMN: &str = "(none)";

pub struct VisualizerWindow {
    id: egui::Id,
    open: bool,
    dataset: String,
    x_column: String,
    y_column: String,
    kind: ChartKind,
    /// Last plot attempt; the error text is shown in place of the chart.
    chart: Option<Result<XyChart, String>>,
    export_status: Option<String>,
}

impl VisualizerWindow {
    pub fn new(window_id: u64, dataset: &str) -> Self {
        info!("Visualizer window for '{}'", dataset);
        Self {
            id: egui::Id::new(("visualizer_window", window_id)),
            open: true,
            dataset: dataset.to_string(),
            x_column: String::new(),
            y_column: String::new(),
            kind: ChartKind::default(),
            chart: None,
            export_status: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn show(&mut self, ctx: &egui::Context, registry: &DatasetRegistry, config: &DashboardConfig) {
        let mut open = self.open;
        egui::Window::new("Advanced visualization")
            .id(self.id)
            .open(&mut open)
            .default_size([1000.0, 600.0])
            .show(ctx, |ui| {
                self.draw_selectors(ui, registry, config);
                ui.separator();

                match &self.chart {
                    None => ChartPlotter::draw_message(ui, "Pick X, Y and a chart type, then Plot"),
                    Some(Err(message)) => ChartPlotter::draw_message(ui, message),
                    Some(Ok(chart)) => ChartPlotter::draw_xy_chart(ui, chart),
                }
            });
        self.open = open;
    }

    fn draw_selectors(&mut self, ui: &mut egui::Ui, registry: &DatasetRegistry, config: &DashboardConfig) {
        let columns = registry
            .get(&self.dataset)
            .map(|d| d.column_names())
            .unwrap_or_default();

        ui.horizontal(|ui| {
            ui.label("Dataset:");
            ComboBox::from_id_salt(self.id.with("dataset"))
                .width(150.0)
                .selected_text(self.dataset.as_str())
                .show_ui(ui, |ui| {
                    for name in registry.names() {
                        if ui.selectable_label(self.dataset == name, name.as_str()).clicked() {
                            self.dataset = name;
                            self.x_column.clear();
                            self.y_column.clear();
                        }
                    }
                });

            ui.label("X:");
            ComboBox::from_id_salt(self.id.with("x"))
                .width(130.0)
                .selected_text(self.x_column.as_str())
                .show_ui(ui, |ui| {
                    for col in &columns {
                        ui.selectable_value(&mut self.x_column, col.clone(), col.as_str());
                    }
                });

            ui.label("Y:");
            let y_text = if self.y_column.is_empty() {
                NO_COLUMN.to_string()
            } else {
                self.y_column.clone()
            };
            ComboBox::from_id_salt(self.id.with("y"))
                .width(130.0)
                .selected_text(y_text)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.y_column, String::new(), NO_COLUMN);
                    for col in &columns {
                        ui.selectable_value(&mut self.y_column, col.clone(), col.as_str());
                    }
                });

            ComboBox::from_id_salt(self.id.with("kind"))
                .width(90.0)
                .selected_text(self.kind.label())
                .show_ui(ui, |ui| {
                    for kind in ChartKind::ALL {
                        ui.selectable_value(&mut self.kind, kind, kind.label());
                    }
                });

            if ui.button("Plot").clicked() {
                self.plot(registry);
            }

            let can_export = matches!(self.chart, Some(Ok(_)));
            if ui
                .add_enabled(can_export, egui::Button::new("💾 Export PNG"))
                .clicked()
            {
                self.export(config);
            }
        });

        if let Some(status) = &self.export_status {
            let color = if status.starts_with("Export failed") {
                Color32::from_rgb(220, 53, 69)
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(status).size(11.0).color(color));
        }
    }

    fn plot(&mut self, registry: &DatasetRegistry) {
        let result = match registry.get(&self.dataset) {
            Some(dataset) => build_chart(dataset.frame(), self.kind, &self.x_column, &self.y_column)
                .map_err(|e| format!("Error: {}", e)),
            None => Err(format!("Error: dataset '{}' is not loaded", self.dataset)),
        };

        if let Err(message) = &result {
            warn!("Plot failed: {}", message);
        }
        self.chart = Some(result);
        self.export_status = None;
    }

    fn export(&mut self, config: &DashboardConfig) {
        let Some(Ok(chart)) = &self.chart else {
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG image", &["png"])
            .set_file_name(format!("{}_chart.png", chart.kind.label().to_lowercase()))
            .save_file()
        else {
            return;
        };

        match StaticChartRenderer::render_png(chart, &path, config.export_width, config.export_height) {
            Ok(()) => {
                self.export_status = Some(format!("Saved {}", path.display()));
                if config.open_exported_charts {
                    if let Err(e) = open::that(&path) {
                        warn!("Could not open {}: {}", path.display(), e);
                    }
                }
            }
            Err(e) => {
                warn!("Export failed: {}", e);
                self.export_status = Some(format!("Export failed: {}", e));
            }
        }
    }
}
