//! Static Chart Renderer
//! Writes visualization charts to PNG files with plotters.

use crate::charts::{pie_wedge, ChartBody, ChartPlotter, PieSlice, XyChart};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart rendering failed: {0}")]
    Plot(String),
    #[error("Image size {0}x{1} is too small")]
    TooSmall(u32, u32),
}

fn plot_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Plot(e.to_string())
}

const MIN_SIDE: u32 = 200;
const FONT: &str = "sans-serif";

fn palette(index: usize) -> RGBColor {
    let c = ChartPlotter::series_color(index);
    RGBColor(c.r(), c.g(), c.b())
}

/// Padded value range; with `include_zero` the range reaches the bar baseline.
pub fn value_range(values: impl Iterator<Item = f64>, include_zero: bool) -> (f64, f64) {
    let (mut min, mut max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min.is_infinite() {
        return (0.0, 1.0);
    }
    if include_zero {
        min = min.min(0.0);
        max = max.max(0.0);
    }
    if max == min {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (
        if include_zero && min == 0.0 { 0.0 } else { min - pad },
        if include_zero && max == 0.0 { 0.0 } else { max + pad },
    )
}

/// Renders charts built by the visualization window to static images.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Draw `chart` into a PNG at `path`.
    pub fn render_png(chart: &XyChart, path: &Path, width: u32, height: u32) -> Result<(), RenderError> {
        if width < MIN_SIDE || height < MIN_SIDE {
            return Err(RenderError::TooSmall(width, height));
        }

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        match &chart.body {
            ChartBody::Bars { labels, values } => Self::draw_bars(&root, chart, labels, values)?,
            ChartBody::Line { points, x_labels } => {
                Self::draw_points(&root, chart, points, x_labels.as_deref(), true)?
            }
            ChartBody::Scatter { points } => Self::draw_points(&root, chart, points, None, false)?,
            ChartBody::Pie { slices } => Self::draw_pie(&root, chart, slices)?,
        }

        root.present().map_err(plot_err)?;
        info!("Exported '{}' to {}", chart.title, path.display());
        Ok(())
    }

    fn draw_bars(
        root: &DrawingArea<BitMapBackend, Shift>,
        chart: &XyChart,
        labels: &[String],
        values: &[f64],
    ) -> Result<(), RenderError> {
        let (y_min, y_max) = value_range(values.iter().copied(), true);

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, (FONT, 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d((0..values.len()).into_segmented(), y_min..y_max)
            .map_err(plot_err)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_label_formatter(&|v| match v {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
                    labels.get(*i).cloned().unwrap_or_default()
                }
                SegmentValue::Last => String::new(),
            })
            .draw()
            .map_err(plot_err)?;

        ctx.draw_series(
            Histogram::vertical(&ctx)
                .style(palette(0).filled())
                .margin(5)
                .data(values.iter().enumerate().map(|(i, &v)| (i, v))),
        )
        .map_err(plot_err)?;

        Ok(())
    }

    fn draw_points(
        root: &DrawingArea<BitMapBackend, Shift>,
        chart: &XyChart,
        points: &[[f64; 2]],
        x_labels: Option<&[String]>,
        joined: bool,
    ) -> Result<(), RenderError> {
        let (x_min, x_max) = value_range(points.iter().map(|p| p[0]), false);
        let (y_min, y_max) = value_range(points.iter().map(|p| p[1]), false);

        let mut ctx = ChartBuilder::on(root)
            .caption(&chart.title, (FONT, 24))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(plot_err)?;

        let label_at = |v: &f64| -> String {
            match x_labels {
                Some(labels) => {
                    let rounded = v.round();
                    if (v - rounded).abs() > 1e-6 || rounded < 0.0 {
                        String::new()
                    } else {
                        labels.get(rounded as usize).cloned().unwrap_or_default()
                    }
                }
                None => format!("{}", v),
            }
        };

        ctx.configure_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .x_label_formatter(&label_at)
            .draw()
            .map_err(plot_err)?;

        let color = palette(0);
        if joined {
            ctx.draw_series(LineSeries::new(
                points.iter().map(|p| (p[0], p[1])),
                color.stroke_width(2),
            ))
            .map_err(plot_err)?;
        } else {
            ctx.draw_series(
                points
                    .iter()
                    .map(|p| Circle::new((p[0], p[1]), 3, color.filled())),
            )
            .map_err(plot_err)?;
        }

        Ok(())
    }

    fn draw_pie(
        root: &DrawingArea<BitMapBackend, Shift>,
        chart: &XyChart,
        slices: &[PieSlice],
    ) -> Result<(), RenderError> {
        let area = root.titled(&chart.title, (FONT, 24)).map_err(plot_err)?;
        let (w, h) = area.dim_in_pixel();
        let center = (w as f64 / 2.0, h as f64 / 2.0);
        let radius = (w.min(h) as f64) * 0.38;
        let to_px = |p: [f64; 2], scale: f64| -> (i32, i32) {
            (
                (center.0 + p[0] * radius * scale) as i32,
                (center.1 - p[1] * radius * scale) as i32,
            )
        };

        let mut start = 0.0;
        for (i, slice) in slices.iter().enumerate() {
            let end = start + slice.fraction * std::f64::consts::TAU;
            let outline: Vec<(i32, i32)> = pie_wedge(start, end)
                .into_iter()
                .map(|p| to_px(p, 1.0))
                .collect();
            area.draw(&Polygon::new(outline, palette(i).filled()))
                .map_err(plot_err)?;

            let mid = (start + end) / 2.0;
            let direction = [-mid.sin(), mid.cos()];
            let percent_style = TextStyle::from((FONT, 16).into_font())
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center));
            area.draw(&Text::new(
                slice.percent_label(),
                to_px(direction, 0.65),
                percent_style,
            ))
            .map_err(plot_err)?;

            let label_style = TextStyle::from((FONT, 16).into_font())
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center));
            area.draw(&Text::new(slice.label.clone(), to_px(direction, 1.15), label_style))
                .map_err(plot_err)?;

            start = end;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_range_includes_zero() {
        let (lo, hi) = value_range([2.0, 4.0].into_iter(), true);
        assert_eq!(lo, 0.0);
        assert!((hi - 4.2).abs() < 1e-9);

        let (lo, hi) = value_range([-2.0, -1.0].into_iter(), true);
        assert!((lo + 2.1).abs() < 1e-9);
        assert_eq!(hi, 0.0);
    }

    #[test]
    fn degenerate_ranges_are_widened() {
        assert_eq!(value_range(std::iter::empty(), false), (0.0, 1.0));
        assert_eq!(value_range([3.0, 3.0].into_iter(), false), (2.0, 4.0));
    }

    #[test]
    fn every_chart_kind_renders_a_png() {
        use crate::charts::{build_chart, ChartKind};
        use polars::prelude::*;

        let frame = df! {
            "region" => ["north", "south", "east", "north", "west"],
            "units" => [3.0, 7.0, 5.0, 2.0, 9.0],
            "price" => [1.5, 2.5, 2.0, 4.0, 3.0],
        }
        .unwrap();
        let dir = tempfile::tempdir().unwrap();

        for (kind, x, y) in [
            (ChartKind::Bar, "region", "units"),
            (ChartKind::Line, "units", "price"),
            (ChartKind::Scatter, "units", "price"),
            (ChartKind::Pie, "region", ""),
        ] {
            let chart = build_chart(&frame, kind, x, y).unwrap();
            let path = dir.path().join(format!("{}.png", kind.label().to_lowercase()));
            StaticChartRenderer::render_png(&chart, &path, 600, 400).unwrap();

            let size = std::fs::metadata(&path).unwrap().len();
            assert!(size > 0, "{} chart wrote an empty file", kind.label());
        }
    }

    #[test]
    fn tiny_images_are_rejected() {
        let chart = XyChart {
            kind: crate::charts::ChartKind::Scatter,
            title: "Scatter - a vs b".into(),
            x_label: "a".into(),
            y_label: "b".into(),
            body: ChartBody::Scatter {
                points: vec![[1.0, 2.0]],
            },
        };
        let dir = tempfile::tempdir().unwrap();
        let err = StaticChartRenderer::render_png(&chart, &dir.path().join("x.png"), 10, 10)
            .unwrap_err();
        assert!(matches!(err, RenderError::TooSmall(10, 10)));
    }
}
