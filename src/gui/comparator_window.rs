//! Comparator Window
//! Side-by-side statistics of every loaded dataset.

use crate::charts::ChartPlotter;
use crate::config::DashboardConfig;
use crate::stats::{BoxSummary, ComparisonTable, StatsCalculator};
use polars::prelude::DataFrame;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompareTab {
    Means,
    StdDev,
    Distributions,
    Missing,
    Boxplots,
}

impl CompareTab {
    const ALL: [CompareTab; 5] = [
        CompareTab::Means,
        CompareTab::StdDev,
        CompareTab::Distributions,
        CompareTab::Missing,
        CompareTab::Boxplots,
    ];

    fn label(&self) -> &'static str {
        match self {
            CompareTab::Means => "Means",
            CompareTab::StdDev => "Std deviations",
            CompareTab::Distributions => "Distributions",
            CompareTab::Missing => "Missing values",
            CompareTab::Boxplots => "Boxplots",
        }
    }
}

/// Comparison of numeric snapshots taken when the window opened.
pub struct ComparatorWindow {
    id: egui::Id,
    open: bool,
    tab: CompareTab,
    means: ComparisonTable,
    stds: ComparisonTable,
    missing: ComparisonTable,
    /// First common column in sorted order.
    common_column: Option<String>,
    densities: Vec<(String, Vec<[f64; 2]>)>,
    boxes: Vec<(String, BoxSummary)>,
}

impl ComparatorWindow {
    /// `frames` are (dataset name, numeric-only frame) pairs.
    pub fn new(window_id: u64, frames: Vec<(String, DataFrame)>, config: &DashboardConfig) -> Self {
        let common_column = StatsCalculator::common_columns(&frames).into_iter().next();

        let mut densities = Vec::new();
        let mut boxes = Vec::new();
        if let Some(column) = &common_column {
            for (name, df) in &frames {
                let values = StatsCalculator::column_values(df, column);
                if let Some(curve) = StatsCalculator::kde(&values, config.kde_points) {
                    densities.push((name.clone(), curve));
                }
                if let Some(summary) = StatsCalculator::box_summary(&values) {
                    boxes.push((name.clone(), summary));
                }
            }
        }

        info!(
            "Comparator window over {} datasets (common column: {:?})",
            frames.len(),
            common_column
        );

        Self {
            id: egui::Id::new(("comparator_window", window_id)),
            open: true,
            tab: CompareTab::Means,
            means: StatsCalculator::comparison_table(&frames, StatsCalculator::column_means),
            stds: StatsCalculator::comparison_table(&frames, StatsCalculator::column_stds),
            missing: StatsCalculator::comparison_table(&frames, StatsCalculator::missing_counts_f64),
            common_column,
            densities,
            boxes,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn show(&mut self, ctx: &egui::Context) {
        let mut open = self.open;
        egui::Window::new("Dataset comparison")
            .id(self.id)
            .open(&mut open)
            .default_size([1200.0, 700.0])
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    for tab in CompareTab::ALL {
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
            CompareTab::Means => ChartPlotter::draw_grouped_bars(
                ui,
                &plot_id("means"),
                "Mean per column",
                &self.means,
                "Value",
            ),
            CompareTab::StdDev => ChartPlotter::draw_grouped_bars(
                ui,
                &plot_id("stds"),
                "Standard deviation per column",
                &self.stds,
                "Standard deviation",
            ),
            CompareTab::Distributions => match &self.common_column {
                None => ChartPlotter::draw_message(ui, "No common column"),
                Some(column) => ChartPlotter::draw_density(
                    ui,
                    &plot_id("density"),
                    &format!("Compared distribution - {}", column),
                    &self.densities,
                ),
            },
            CompareTab::Missing => ChartPlotter::draw_grouped_bars(
                ui,
                &plot_id("missing"),
                "Missing values per file",
                &self.missing,
                "Null values",
            ),
            CompareTab::Boxplots => match &self.common_column {
                None => ChartPlotter::draw_message(ui, "No common column"),
                Some(column) => ChartPlotter::draw_boxplots(
                    ui,
                    &plot_id("boxplots"),
                    &format!("Compared boxplot - {}", column),
                    &self.boxes,
                    false,
                ),
            },
        }
    }
}
