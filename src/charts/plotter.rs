//! Chart Plotter Module
//! Draws the dashboard charts with egui_plot.

use crate::charts::{pie_wedge, ChartBody, PieSlice, XyChart};
use crate::stats::{BoxSummary, ComparisonTable, Histogram, MissingMap};
use egui::{Align2, Color32, FontId, RichText, Sense, Stroke};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoint, PlotPoints, Points,
    Polygon, Text,
};

pub const MEAN_COLOR: Color32 = Color32::from_rgb(135, 206, 235); // Sky blue
pub const STD_COLOR: Color32 = Color32::from_rgb(255, 127, 80); // Coral
pub const MISSING_COLOR: Color32 = Color32::from_rgb(203, 24, 29);

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

/// Bar direction for single-series bar charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarOrientation {
    Vertical,
    Horizontal,
}

/// Creates interactive charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Label formatter for categorical axes placed at integer positions.
    fn category_formatter(
        labels: Vec<String>,
    ) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
        move |mark, _range| {
            let rounded = mark.value.round();
            if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            labels.get(rounded as usize).cloned().unwrap_or_default()
        }
    }

    /// Centred inline text, used in place of a chart.
    pub fn draw_message(ui: &mut egui::Ui, text: &str) {
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new(text).size(16.0));
        });
    }

    fn draw_title(ui: &mut egui::Ui, title: &str) {
        ui.vertical_centered(|ui| {
            ui.label(RichText::new(title).size(16.0).strong());
        });
        ui.add_space(4.0);
    }

    /// One bar per (label, value), hover shows "label : value".
    pub fn draw_value_bars(
        ui: &mut egui::Ui,
        id: &str,
        title: &str,
        pairs: &[(String, f64)],
        orientation: BarOrientation,
        color: Color32,
        value_label: &str,
    ) {
        Self::draw_title(ui, title);
        if pairs.is_empty() {
            Self::draw_message(ui, "No numeric column");
            return;
        }

        let labels: Vec<String> = pairs.iter().map(|(l, _)| l.clone()).collect();
        let bars: Vec<Bar> = pairs
            .iter()
            .enumerate()
            .map(|(i, (label, value))| Bar::new(i as f64, *value).width(0.6).name(label))
            .collect();

        let mut chart = BarChart::new(bars)
            .color(color)
            .element_formatter(Box::new(|bar, _chart| format!("{} : {:.3}", bar.name, bar.value)));

        let mut plot = Plot::new(id.to_string()).allow_scroll(false);
        plot = match orientation {
            BarOrientation::Vertical => {
                chart = chart.vertical();
                plot.x_axis_formatter(Self::category_formatter(labels))
                    .y_axis_label(value_label)
            }
            BarOrientation::Horizontal => {
                chart = chart.horizontal();
                plot.y_axis_formatter(Self::category_formatter(labels))
                    .x_axis_label(value_label)
            }
        };

        plot.show(ui, |plot_ui| {
            plot_ui.bar_chart(chart);
        });
    }

    /// Grouped bars: one group per column, one colored series per dataset.
    pub fn draw_grouped_bars(
        ui: &mut egui::Ui,
        id: &str,
        title: &str,
        table: &ComparisonTable,
        value_label: &str,
    ) {
        Self::draw_title(ui, title);
        if table.is_empty() {
            Self::draw_message(ui, "No numeric column");
            return;
        }

        let series_count = table.datasets.len();
        let group_width = 0.8;
        let bar_width = group_width / series_count as f64;

        Plot::new(id.to_string())
            .legend(Legend::default())
            .allow_scroll(false)
            .y_axis_label(value_label)
            .x_axis_formatter(Self::category_formatter(table.columns.clone()))
            .show(ui, |plot_ui| {
                for (d, dataset) in table.datasets.iter().enumerate() {
                    let offset = -group_width / 2.0 + bar_width * (d as f64 + 0.5);
                    let bars: Vec<Bar> = table
                        .columns
                        .iter()
                        .enumerate()
                        .filter_map(|(c, column)| {
                            table.get(d, c).map(|value| {
                                Bar::new(c as f64 + offset, value)
                                    .width(bar_width * 0.95)
                                    .name(format!("{} / {}", column, dataset))
                            })
                        })
                        .collect();

                    plot_ui.bar_chart(
                        BarChart::new(bars)
                            .color(Self::series_color(d))
                            .name(dataset)
                            .element_formatter(Box::new(|bar, _chart| {
                                format!("{} : {:.3}", bar.name, bar.value)
                            })),
                    );
                }
            });
    }

    /// One box per series, laid out along the category axis.
    pub fn draw_boxplots(
        ui: &mut egui::Ui,
        id: &str,
        title: &str,
        series: &[(String, BoxSummary)],
        horizontal: bool,
    ) {
        Self::draw_title(ui, title);
        if series.is_empty() {
            Self::draw_message(ui, "No valid data for boxplot");
            return;
        }

        let labels: Vec<String> = series.iter().map(|(l, _)| l.clone()).collect();
        let mut plot = Plot::new(id.to_string()).allow_scroll(false);
        plot = if horizontal {
            plot.y_axis_formatter(Self::category_formatter(labels))
        } else {
            plot.x_axis_formatter(Self::category_formatter(labels))
        };

        plot.show(ui, |plot_ui| {
            for (i, (label, summary)) in series.iter().enumerate() {
                let color = Self::series_color(i);
                let elem = BoxElem::new(
                    i as f64,
                    BoxSpread::new(
                        summary.lower_whisker,
                        summary.q1,
                        summary.median,
                        summary.q3,
                        summary.upper_whisker,
                    ),
                )
                .name(label)
                .box_width(0.5)
                .fill(color.gamma_multiply(0.4))
                .stroke(Stroke::new(1.5, color));

                let mut boxes = BoxPlot::new(vec![elem]).name(label);
                if horizontal {
                    boxes = boxes.horizontal();
                }
                plot_ui.box_plot(boxes);

                if !summary.outliers.is_empty() {
                    let outliers: PlotPoints = summary
                        .outliers
                        .iter()
                        .map(|&v| if horizontal { [v, i as f64] } else { [i as f64, v] })
                        .collect();
                    plot_ui.points(Points::new(outliers).radius(2.5).color(color));
                }
            }
        });
    }

    /// Overlaid histograms, one per series.
    pub fn draw_histograms(ui: &mut egui::Ui, id: &str, title: &str, series: &[(String, Histogram)]) {
        Self::draw_title(ui, title);
        if series.is_empty() {
            Self::draw_message(ui, "No numeric column");
            return;
        }

        Plot::new(id.to_string())
            .legend(Legend::default())
            .allow_scroll(false)
            .y_axis_label("Count")
            .show(ui, |plot_ui| {
                for (i, (label, hist)) in series.iter().enumerate() {
                    let bars: Vec<Bar> = hist
                        .counts
                        .iter()
                        .enumerate()
                        .map(|(b, &count)| {
                            Bar::new(hist.bin_center(b), count as f64).width(hist.bin_width)
                        })
                        .collect();
                    let name = label.clone();
                    plot_ui.bar_chart(
                        BarChart::new(bars)
                            .color(Self::series_color(i))
                            .name(label)
                            .element_formatter(Box::new(move |bar, _chart| {
                                format!("{} @ {:.3} : {}", name, bar.argument, bar.value)
                            })),
                    );
                }
            });
    }

    /// Filled density curves with a legend.
    pub fn draw_density(ui: &mut egui::Ui, id: &str, title: &str, series: &[(String, Vec<[f64; 2]>)]) {
        Self::draw_title(ui, title);
        if series.is_empty() {
            Self::draw_message(ui, "Not enough data for a distribution");
            return;
        }

        Plot::new(id.to_string())
            .legend(Legend::default())
            .allow_scroll(false)
            .y_axis_label("Density")
            .show(ui, |plot_ui| {
                for (i, (label, curve)) in series.iter().enumerate() {
                    plot_ui.line(
                        Line::new(PlotPoints::from_iter(curve.iter().copied()))
                            .color(Self::series_color(i))
                            .width(1.5)
                            .fill(0.0)
                            .name(label),
                    );
                }
            });
    }

    /// Heatmap of missing cells: one column strip per table column, rows top to bottom.
    pub fn draw_missing_map(ui: &mut egui::Ui, title: &str, map: &MissingMap) {
        Self::draw_title(ui, title);
        if map.columns.is_empty() || map.rows == 0 {
            Self::draw_message(ui, "No data");
            return;
        }

        let label_band = 20.0;
        let size = ui.available_size();
        let (rect, response) = ui.allocate_exact_size(size, Sense::hover());
        let grid = egui::Rect::from_min_max(rect.min, egui::pos2(rect.max.x, rect.max.y - label_band));

        let painter = ui.painter_at(rect);
        painter.rect_filled(grid, 0.0, Color32::WHITE);

        let cell_w = grid.width() / map.columns.len() as f32;
        let cell_h = (grid.height() / map.rows as f32).max(1.0);
        for &(row, col) in &map.cells {
            let min = egui::pos2(
                grid.min.x + col as f32 * cell_w,
                grid.min.y + row as f32 * grid.height() / map.rows as f32,
            );
            painter.rect_filled(
                egui::Rect::from_min_size(min, egui::vec2(cell_w, cell_h)),
                0.0,
                MISSING_COLOR,
            );
        }
        painter.rect_stroke(grid, 0.0, Stroke::new(1.0, Color32::GRAY));

        for (c, name) in map.columns.iter().enumerate() {
            painter.text(
                egui::pos2(grid.min.x + (c as f32 + 0.5) * cell_w, grid.max.y + 4.0),
                Align2::CENTER_TOP,
                name,
                FontId::proportional(11.0),
                ui.visuals().text_color(),
            );
        }

        if let Some(pos) = response.hover_pos() {
            if grid.contains(pos) {
                let col = ((pos.x - grid.min.x) / cell_w) as usize;
                if let Some(name) = map.columns.get(col) {
                    let missing = map.cells.iter().filter(|(_, c)| *c == col).count();
                    response.on_hover_text(format!("{} : {} missing", name, missing));
                }
            }
        }
    }

    /// Draw a chart built by the visualization window.
    pub fn draw_xy_chart(ui: &mut egui::Ui, chart: &XyChart) {
        Self::draw_title(ui, &chart.title);

        match &chart.body {
            ChartBody::Bars { labels, values } => {
                let bars: Vec<Bar> = labels
                    .iter()
                    .zip(values)
                    .enumerate()
                    .map(|(i, (label, &v))| Bar::new(i as f64, v).width(0.6).name(label))
                    .collect();
                Plot::new("xy_chart")
                    .legend(Legend::default())
                    .allow_scroll(false)
                    .x_axis_label(chart.x_label.as_str())
                    .y_axis_label(chart.y_label.as_str())
                    .x_axis_formatter(Self::category_formatter(labels.clone()))
                    .show(ui, |plot_ui| {
                        plot_ui.bar_chart(
                            BarChart::new(bars)
                                .color(Self::series_color(0))
                                .name(&chart.y_label)
                                .element_formatter(Box::new(|bar, _chart| {
                                    format!("{} : {:.3}", bar.name, bar.value)
                                })),
                        );
                    });
            }
            ChartBody::Line { points, x_labels } => {
                let mut plot = Plot::new("xy_chart")
                    .legend(Legend::default())
                    .allow_scroll(false)
                    .x_axis_label(chart.x_label.as_str())
                    .y_axis_label(chart.y_label.as_str());
                if let Some(labels) = x_labels {
                    plot = plot.x_axis_formatter(Self::category_formatter(labels.clone()));
                }
                plot.show(ui, |plot_ui| {
                    plot_ui.line(
                        Line::new(PlotPoints::from_iter(points.iter().copied()))
                            .color(Self::series_color(0))
                            .width(1.5)
                            .name(&chart.y_label),
                    );
                });
            }
            ChartBody::Scatter { points } => {
                Plot::new("xy_chart")
                    .allow_scroll(false)
                    .x_axis_label(chart.x_label.as_str())
                    .y_axis_label(chart.y_label.as_str())
                    .show(ui, |plot_ui| {
                        plot_ui.points(
                            Points::new(PlotPoints::from_iter(points.iter().copied()))
                                .radius(3.0)
                                .color(Self::series_color(0)),
                        );
                    });
            }
            ChartBody::Pie { slices } => Self::draw_pie(ui, slices),
        }
    }

    pub fn draw_pie(ui: &mut egui::Ui, slices: &[PieSlice]) {
        Plot::new("pie_chart")
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                let mut start = 0.0;
                for (i, slice) in slices.iter().enumerate() {
                    let end = start + slice.fraction * std::f64::consts::TAU;
                    let color = Self::series_color(i);
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(pie_wedge(start, end)))
                            .fill_color(color.gamma_multiply(0.8))
                            .stroke(Stroke::new(1.0, Color32::WHITE))
                            .name(format!("{} ({})", slice.label, slice.count)),
                    );

                    let mid = (start + end) / 2.0;
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(-mid.sin() * 0.65, mid.cos() * 0.65),
                            RichText::new(slice.percent_label()).color(Color32::BLACK),
                        )
                        .anchor(Align2::CENTER_CENTER),
                    );
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(-mid.sin() * 1.15, mid.cos() * 1.15),
                            slice.label.as_str(),
                        )
                        .anchor(Align2::CENTER_CENTER),
                    );
                    start = end;
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_wraps() {
        assert_eq!(ChartPlotter::series_color(0), ChartPlotter::series_color(PALETTE.len()));
    }
}
