//! Ad-hoc X/Y charts: chart kind selection and data extraction.

use crate::data::{any_value_text, is_numeric_dtype};
use crate::stats::StatsCalculator;
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ChartError {
    #[error("Select an X column")]
    NoXColumn,
    #[error("{0} chart needs a Y column")]
    NoYColumn(ChartKind),
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),
    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),
    #[error("Nothing to plot")]
    NoData,
}

/// Kinds offered by the visualization window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Scatter,
    Pie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Scatter,
        ChartKind::Pie,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar",
            ChartKind::Line => "Line",
            ChartKind::Scatter => "Scatter",
            ChartKind::Pie => "Pie",
        }
    }

    pub fn needs_y(&self) -> bool {
        !matches!(self, ChartKind::Pie)
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One pie wedge.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    /// Share of the whole, 0..=1.
    pub fraction: f64,
}

impl PieSlice {
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.fraction * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartBody {
    /// One bar per row, labelled by the X value.
    Bars { labels: Vec<String>, values: Vec<f64> },
    /// Points in row order; `x_labels` is set when X is categorical.
    Line {
        points: Vec<[f64; 2]>,
        x_labels: Option<Vec<String>>,
    },
    Scatter { points: Vec<[f64; 2]> },
    Pie { slices: Vec<PieSlice> },
}

/// A chart ready to draw on screen or export.
#[derive(Debug, Clone, PartialEq)]
pub struct XyChart {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub body: ChartBody,
}

/// Segments used for a full circle when outlining pie wedges.
const PIE_SEGMENTS: usize = 90;

/// Outline of a unit-circle wedge between two angles in radians.
///
/// Angles run counter-clockwise from 12 o'clock; the first point is the centre.
pub fn pie_wedge(start: f64, end: f64) -> Vec<[f64; 2]> {
    let steps = (((end - start) / std::f64::consts::TAU) * PIE_SEGMENTS as f64).ceil() as usize;
    let steps = steps.max(1);
    let mut points = vec![[0.0, 0.0]];
    for s in 0..=steps {
        let angle = start + (end - start) * s as f64 / steps as f64;
        points.push([-angle.sin(), angle.cos()]);
    }
    points
}

/// "Kind - x vs y", or "Kind - x" without a Y column.
pub fn chart_title(kind: ChartKind, x: &str, y: &str) -> String {
    if y.is_empty() {
        format!("{} - {}", kind, x)
    } else {
        format!("{} - {} vs {}", kind, x, y)
    }
}

fn numeric_cells(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>, ChartError> {
    let col = df
        .column(column)
        .map_err(|_| ChartError::UnknownColumn(column.to_string()))?;
    if !is_numeric_dtype(col.dtype()) {
        return Err(ChartError::NotNumeric(column.to_string()));
    }

    let cast = col
        .as_materialized_series()
        .cast(&DataType::Float64)
        .map_err(|_| ChartError::NotNumeric(column.to_string()))?;
    let ca = cast
        .f64()
        .map_err(|_| ChartError::NotNumeric(column.to_string()))?;
    Ok(ca
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

fn text_cells(df: &DataFrame, column: &str) -> Result<Vec<String>, ChartError> {
    let col = df
        .column(column)
        .map_err(|_| ChartError::UnknownColumn(column.to_string()))?;
    Ok(col
        .as_materialized_series()
        .iter()
        .map(|v| any_value_text(&v))
        .collect())
}

fn is_numeric_column(df: &DataFrame, column: &str) -> bool {
    df.column(column)
        .map(|c| is_numeric_dtype(c.dtype()))
        .unwrap_or(false)
}

/// Extract the data for `kind` from the `x` and `y` columns of `df`.
pub fn build_chart(df: &DataFrame, kind: ChartKind, x: &str, y: &str) -> Result<XyChart, ChartError> {
    if x.is_empty() {
        return Err(ChartError::NoXColumn);
    }
    if kind.needs_y() && y.is_empty() {
        return Err(ChartError::NoYColumn(kind));
    }

    let body = match kind {
        ChartKind::Bar => {
            let labels = text_cells(df, x)?;
            let ys = numeric_cells(df, y)?;
            let (labels, values): (Vec<String>, Vec<f64>) = labels
                .into_iter()
                .zip(ys)
                .filter_map(|(label, v)| v.map(|v| (label, v)))
                .unzip();
            if values.is_empty() {
                return Err(ChartError::NoData);
            }
            ChartBody::Bars { labels, values }
        }
        ChartKind::Line => {
            let ys = numeric_cells(df, y)?;
            if is_numeric_column(df, x) {
                let xs = numeric_cells(df, x)?;
                let points: Vec<[f64; 2]> = xs
                    .into_iter()
                    .zip(ys)
                    .filter_map(|(a, b)| Some([a?, b?]))
                    .collect();
                if points.is_empty() {
                    return Err(ChartError::NoData);
                }
                ChartBody::Line {
                    points,
                    x_labels: None,
                }
            } else {
                let labels = text_cells(df, x)?;
                let points: Vec<[f64; 2]> = ys
                    .iter()
                    .enumerate()
                    .filter_map(|(i, v)| v.map(|v| [i as f64, v]))
                    .collect();
                if points.is_empty() {
                    return Err(ChartError::NoData);
                }
                ChartBody::Line {
                    points,
                    x_labels: Some(labels),
                }
            }
        }
        ChartKind::Scatter => {
            let xs = numeric_cells(df, x)?;
            let ys = numeric_cells(df, y)?;
            let points: Vec<[f64; 2]> = xs
                .into_iter()
                .zip(ys)
                .filter_map(|(a, b)| Some([a?, b?]))
                .collect();
            if points.is_empty() {
                return Err(ChartError::NoData);
            }
            ChartBody::Scatter { points }
        }
        ChartKind::Pie => {
            if df.column(x).is_err() {
                return Err(ChartError::UnknownColumn(x.to_string()));
            }
            let counts = StatsCalculator::value_counts(df, x);
            let total: usize = counts.iter().map(|(_, c)| c).sum();
            if total == 0 {
                return Err(ChartError::NoData);
            }
            let slices = counts
                .into_iter()
                .map(|(label, count)| PieSlice {
                    label,
                    count,
                    fraction: count as f64 / total as f64,
                })
                .collect();
            ChartBody::Pie { slices }
        }
    };

    Ok(XyChart {
        kind,
        title: chart_title(kind, x, y),
        x_label: x.to_string(),
        y_label: y.to_string(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales() -> DataFrame {
        df! {
            "month" => ["jan", "feb", "mar", "apr"],
            "units" => [Some(10i64), Some(12), None, Some(9)],
            "price" => [2.0, 2.5, 3.0, 2.0],
            "region" => ["n", "s", "n", "n"],
        }
        .unwrap()
    }

    #[test]
    fn titles() {
        assert_eq!(chart_title(ChartKind::Line, "a", "b"), "Line - a vs b");
        assert_eq!(chart_title(ChartKind::Pie, "a", ""), "Pie - a");
    }

    #[test]
    fn bar_skips_missing_values() {
        let chart = build_chart(&sales(), ChartKind::Bar, "month", "units").unwrap();
        assert_eq!(chart.title, "Bar - month vs units");
        assert_eq!(
            chart.body,
            ChartBody::Bars {
                labels: vec!["jan".into(), "feb".into(), "apr".into()],
                values: vec![10.0, 12.0, 9.0],
            }
        );
    }

    #[test]
    fn line_over_text_axis_uses_row_positions() {
        let chart = build_chart(&sales(), ChartKind::Line, "month", "price").unwrap();
        match chart.body {
            ChartBody::Line { points, x_labels } => {
                assert_eq!(points[3], [3.0, 2.0]);
                assert_eq!(x_labels.unwrap()[0], "jan");
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn line_over_numeric_axis_uses_values() {
        let chart = build_chart(&sales(), ChartKind::Line, "price", "units").unwrap();
        assert_eq!(
            chart.body,
            ChartBody::Line {
                points: vec![[2.0, 10.0], [2.5, 12.0], [2.0, 9.0]],
                x_labels: None,
            }
        );
    }

    #[test]
    fn scatter_needs_numeric_axes() {
        let err = build_chart(&sales(), ChartKind::Scatter, "month", "units").unwrap_err();
        assert_eq!(err, ChartError::NotNumeric("month".into()));

        let chart = build_chart(&sales(), ChartKind::Scatter, "price", "units").unwrap();
        assert_eq!(
            chart.body,
            ChartBody::Scatter {
                points: vec![[2.0, 10.0], [2.5, 12.0], [2.0, 9.0]],
            }
        );
    }

    #[test]
    fn pie_counts_x_and_ignores_y() {
        let chart = build_chart(&sales(), ChartKind::Pie, "region", "").unwrap();
        assert_eq!(chart.title, "Pie - region");
        let ChartBody::Pie { slices } = chart.body else {
            panic!("expected pie");
        };
        assert_eq!(slices[0].label, "n");
        assert_eq!(slices[0].percent_label(), "75.0%");
        let total: f64 = slices.iter().map(|s| s.fraction).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn selection_errors() {
        let df = sales();
        assert_eq!(build_chart(&df, ChartKind::Bar, "", "units"), Err(ChartError::NoXColumn));
        assert_eq!(
            build_chart(&df, ChartKind::Line, "month", ""),
            Err(ChartError::NoYColumn(ChartKind::Line))
        );
        assert_eq!(
            build_chart(&df, ChartKind::Bar, "month", "region"),
            Err(ChartError::NotNumeric("region".into()))
        );
        assert_eq!(
            build_chart(&df, ChartKind::Pie, "nope", ""),
            Err(ChartError::UnknownColumn("nope".into()))
        );
    }

    #[test]
    fn quarter_wedge_spans_top_to_left() {
        let points = pie_wedge(0.0, std::f64::consts::FRAC_PI_2);
        assert_eq!(points[0], [0.0, 0.0]);
        let first = points[1];
        let last = points[points.len() - 1];
        assert!(first[0].abs() < 1e-12 && (first[1] - 1.0).abs() < 1e-12);
        assert!((last[0] + 1.0).abs() < 1e-12 && last[1].abs() < 1e-12);
    }
}
