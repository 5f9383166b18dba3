//! Statistics Window
//! Canned charts over the numeric columns of one dataset.

use crate::charts::{BarOrientation, ChartPlotter, MEAN_COLOR, STD_COLOR};
use crate::config::DashboardConfig;
use crate::data::Dataset;
use crate::stats::{BoxSummary, Histogram, MissingMap, StatsCalculator};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatsTab {
    Means,
    Medians,
    StdDev,
    Missing,
    Histograms,
}

impl StatsTab {
    const ALL: [StatsTab; 5] = [
        StatsTab::Means,
        StatsTab::Medians,
        StatsTab::StdDev,
        StatsTab::Missing,
        StatsTab::Histograms,
    ];

    fn label(&self) -> &'static str {
        match self {
            StatsTab::Means => "Means",
            StatsTab::Medians => "Medians",
            StatsTab::StdDev => "Std deviation",
            StatsTab::Missing => "Missing values",
            StatsTab::Histograms => "Histograms",
        }
    }
}

/// Statistics of a snapshot taken when the window opened.
pub struct StatisticsWindow {
    id: egui::Id,
    dataset: String,
    open: bool,
    tab: StatsTab,
    means: Vec<(String, f64)>,
    stds: Vec<(String, f64)>,
    boxes: Vec<(String, BoxSummary)>,
    missing: MissingMap,
    histograms: Vec<(String, Histogram)>,
}

impl StatisticsWindow {
    pub fn new(window_id: u64, dataset: &Dataset, config: &DashboardConfig) -> Self {
        let frame = dataset.numeric_frame();
        let columns = dataset.numeric_column_names();

        let mut boxes = Vec::new();
        let mut histograms = Vec::new();
        for column in &columns {
            let values = StatsCalculator::column_values(&frame, column);
            if let Some(summary) = StatsCalculator::box_summary(&values) {
                boxes.push((column.clone(), summary));
            }
            if let Some(hist) = StatsCalculator::histogram(&values, config.histogram_bins) {
                histograms.push((column.clone(), hist));
            }
        }

        info!(
            "Statistics window for '{}' ({} numeric columns)",
            dataset.name(),
            columns.len()
        );

        Self {
            id: egui::Id::new(("statistics_window", window_id)),
            dataset: dataset.name().to_string(),
            open: true,
            tab: StatsTab::Means,
            means: StatsCalculator::sorted_ascending(StatsCalculator::column_means(&frame)),
            stds: StatsCalculator::sorted_ascending(StatsCalculator::column_stds(&frame)),
            boxes,
            missing: StatsCalculator::missing_map(&frame),
            histograms,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        let mut open = self.open;
        egui::Window::new(format!("Advanced statistics - {}", self.dataset))
            .id(self.id)
            .open(&mut open)
            .default_size([1000.0, 700.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    for tab in StatsTab::ALL {
                        ui.selectable_value(&mut self.tab, tab, tab.label());
                    }
                });
                ui.separator();
                self.draw_tab(ui);
            });
        self.open = open;
    }

    fn draw_tab(&self, ui: &mut egui::Ui) {
        let plot_id = |name: &str| format!("{}_{:?}", name, self.id);

        match self.tab {
            StatsTab::Means => ChartPlotter::draw_value_bars(
                ui,
                &plot_id("means"),
                "Mean per column",
                &self.means,
                BarOrientation::Horizontal,
                MEAN_COLOR,
                "Mean value",
            ),
            StatsTab::Medians => ChartPlotter::draw_boxplots(
                ui,
                &plot_id("medians"),
                "Median and spread (boxplot)",
                &self.boxes,
                true,
            ),
            StatsTab::StdDev => ChartPlotter::draw_value_bars(
                ui,
                &plot_id("stds"),
                "Standard deviation per column",
                &self.stds,
                BarOrientation::Vertical,
                STD_COLOR,
                "Standard deviation",
            ),
            StatsTab::Missing => {
                ChartPlotter::draw_missing_map(ui, "Missing value map", &self.missing)
            }
            StatsTab::Histograms => ChartPlotter::draw_histograms(
                ui,
                &plot_id("histograms"),
                "Combined histograms",
                &self.histograms,
            ),
        }
    }
}
