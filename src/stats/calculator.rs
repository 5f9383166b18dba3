//! Statistics Calculator Module
//! Descriptive statistics over dataset columns, per dataset and across datasets.

use crate::data::{any_value_text, is_numeric_dtype};
use polars::prelude::*;
use rayon::prelude::*;
use statrs::distribution::{Continuous, Normal};
use statrs::statistics::Statistics;
use std::collections::{BTreeSet, HashMap};

/// Default number of histogram bins.
pub const DEFAULT_BINS: usize = 10;

/// Kernel density evaluation extends this many bandwidths past the data.
const KDE_CUT: f64 = 3.0;

/// Five-number summary used to draw a boxplot.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Equal-width histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub start: f64,
    pub bin_width: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Centre of bin `i`.
    pub fn bin_center(&self, i: usize) -> f64 {
        self.start + (i as f64 + 0.5) * self.bin_width
    }
}

/// Coordinates of the missing cells of a table.
#[derive(Debug, Clone, Default)]
pub struct MissingMap {
    pub columns: Vec<String>,
    pub rows: usize,
    /// (row, column) pairs.
    pub cells: Vec<(usize, usize)>,
}

/// One aggregate per (dataset, column); columns are the sorted union.
#[derive(Debug, Clone, Default)]
pub struct ComparisonTable {
    pub columns: Vec<String>,
    pub datasets: Vec<String>,
    /// Indexed `[dataset][column]`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl ComparisonTable {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.datasets.is_empty()
    }

    pub fn get(&self, dataset: usize, column: usize) -> Option<f64> {
        self.values.get(dataset)?.get(column).copied().flatten()
    }
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Non-null, non-NaN values of a column as f64. Non-numeric columns give nothing.
    pub fn column_values(df: &DataFrame, column: &str) -> Vec<f64> {
        let Ok(col) = df.column(column) else {
            return Vec::new();
        };
        if !is_numeric_dtype(col.dtype()) {
            return Vec::new();
        }

        col.as_materialized_series()
            .cast(&DataType::Float64)
            .ok()
            .and_then(|s| {
                s.f64()
                    .ok()
                    .map(|ca| ca.into_iter().flatten().filter(|v| !v.is_nan()).collect())
            })
            .unwrap_or_default()
    }

    fn numeric_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Mean of each numeric column; empty columns are skipped.
    pub fn column_means(df: &DataFrame) -> Vec<(String, f64)> {
        Self::numeric_columns(df)
            .into_iter()
            .filter_map(|name| {
                let values = Self::column_values(df, &name);
                if values.is_empty() {
                    None
                } else {
                    Some((name, values.iter().mean()))
                }
            })
            .collect()
    }

    /// Sample standard deviation of each numeric column; needs two values.
    pub fn column_stds(df: &DataFrame) -> Vec<(String, f64)> {
        Self::numeric_columns(df)
            .into_iter()
            .filter_map(|name| {
                let values = Self::column_values(df, &name);
                if values.len() < 2 {
                    None
                } else {
                    Some((name, values.iter().std_dev()))
                }
            })
            .collect()
    }

    /// Order (label, value) pairs by value, smallest first.
    pub fn sorted_ascending(mut pairs: Vec<(String, f64)>) -> Vec<(String, f64)> {
        pairs.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        pairs
    }

    fn missing_mask(col: &Column) -> Vec<bool> {
        let series = col.as_materialized_series();
        if matches!(series.dtype(), DataType::Float32 | DataType::Float64) {
            if let Ok(s) = series.cast(&DataType::Float64) {
                if let Ok(ca) = s.f64() {
                    return ca
                        .into_iter()
                        .map(|v| v.map_or(true, f64::is_nan))
                        .collect();
                }
            }
        }
        series.is_null().into_iter().map(|v| v.unwrap_or(true)).collect()
    }

    /// Count of null or NaN cells in every column.
    pub fn missing_counts(df: &DataFrame) -> Vec<(String, usize)> {
        df.get_columns()
            .iter()
            .map(|col| {
                let count = Self::missing_mask(col).into_iter().filter(|m| *m).count();
                (col.name().to_string(), count)
            })
            .collect()
    }

    /// Locate every missing cell of the table.
    pub fn missing_map(df: &DataFrame) -> MissingMap {
        let mut cells = Vec::new();
        for (c, col) in df.get_columns().iter().enumerate() {
            for (r, missing) in Self::missing_mask(col).into_iter().enumerate() {
                if missing {
                    cells.push((r, c));
                }
            }
        }

        MissingMap {
            columns: df.get_column_names().iter().map(|s| s.to_string()).collect(),
            rows: df.height(),
            cells,
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Quartiles and 1.5 × IQR whiskers.
    pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
        if values.is_empty() {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let q1 = Self::percentile(&sorted, 25.0);
        let median = Self::percentile(&sorted, 50.0);
        let q3 = Self::percentile(&sorted, 75.0);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < low_fence || v > high_fence)
            .collect();

        Some(BoxSummary {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }

    /// Equal-width bins spanning the data range.
    pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
        if values.is_empty() {
            return None;
        }
        let bins = bins.max(1);

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if max == min {
            return Some(Histogram {
                start: min - 0.5,
                bin_width: 1.0,
                counts: vec![values.len()],
            });
        }

        let bin_width = (max - min) / bins as f64;
        let mut counts = vec![0usize; bins];
        for &v in values {
            let idx = (((v - min) / bin_width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Some(Histogram {
            start: min,
            bin_width,
            counts,
        })
    }

    /// Gaussian kernel density estimate with Scott's bandwidth.
    ///
    /// Returns `points` evenly spaced [x, density] pairs, or None when the
    /// data has fewer than two values or no spread.
    pub fn kde(values: &[f64], points: usize) -> Option<Vec<[f64; 2]>> {
        let n = values.len();
        if n < 2 {
            return None;
        }
        let std = values.iter().std_dev();
        if std.is_nan() || std <= 0.0 {
            return None;
        }

        let bandwidth = std * (n as f64).powf(-0.2);
        let kernel = Normal::new(0.0, 1.0).ok()?;

        let min = values.iter().copied().fold(f64::INFINITY, f64::min) - KDE_CUT * bandwidth;
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max) + KDE_CUT * bandwidth;
        let points = points.max(2);
        let step = (max - min) / (points - 1) as f64;
        let norm = 1.0 / (n as f64 * bandwidth);

        let curve = (0..points)
            .map(|i| {
                let x = min + i as f64 * step;
                let density = values
                    .iter()
                    .map(|&v| kernel.pdf((x - v) / bandwidth))
                    .sum::<f64>()
                    * norm;
                [x, density]
            })
            .collect();

        Some(curve)
    }

    /// Distinct non-null values of a column with their counts, most frequent first.
    pub fn value_counts(df: &DataFrame, column: &str) -> Vec<(String, usize)> {
        let Ok(col) = df.column(column) else {
            return Vec::new();
        };

        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for value in col.as_materialized_series().iter() {
            if value.is_null() {
                continue;
            }
            let key = any_value_text(&value);
            let entry = counts.entry(key.clone()).or_insert_with(|| {
                order.push(key);
                0
            });
            *entry += 1;
        }

        let mut result: Vec<(String, usize)> = order
            .into_iter()
            .map(|key| {
                let count = counts[&key];
                (key, count)
            })
            .collect();
        // Stable sort keeps first-appearance order among ties.
        result.sort_by(|a, b| b.1.cmp(&a.1));
        result
    }

    /// Column names present in every frame, sorted.
    pub fn common_columns(frames: &[(String, DataFrame)]) -> Vec<String> {
        let mut iter = frames.iter().map(|(_, df)| {
            df.get_column_names()
                .iter()
                .map(|s| s.to_string())
                .collect::<BTreeSet<String>>()
        });

        let Some(first) = iter.next() else {
            return Vec::new();
        };
        iter.fold(first, |acc, set| acc.intersection(&set).cloned().collect())
            .into_iter()
            .collect()
    }

    /// Per-dataset aggregates aligned on the union of columns.
    ///
    /// Datasets are aggregated in parallel.
    pub fn comparison_table<F>(frames: &[(String, DataFrame)], per_frame: F) -> ComparisonTable
    where
        F: Fn(&DataFrame) -> Vec<(String, f64)> + Sync,
    {
        let aggregates: Vec<HashMap<String, f64>> = frames
            .par_iter()
            .map(|(_, df)| per_frame(df).into_iter().collect())
            .collect();

        let columns: Vec<String> = frames
            .iter()
            .flat_map(|(_, df)| df.get_column_names().into_iter().map(|s| s.to_string()))
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();

        let values = aggregates
            .iter()
            .map(|agg| columns.iter().map(|c| agg.get(c).copied()).collect())
            .collect();

        ComparisonTable {
            columns,
            datasets: frames.iter().map(|(name, _)| name.clone()).collect(),
            values,
        }
    }

    /// Missing-cell counts as a comparison aggregate.
    pub fn missing_counts_f64(df: &DataFrame) -> Vec<(String, f64)> {
        Self::missing_counts(df)
            .into_iter()
            .map(|(name, count)| (name, count as f64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df! {
            "a" => [1.0, 2.0, 3.0, 4.0],
            "b" => [Some(10i64), None, Some(30), Some(20)],
            "label" => ["w", "x", "w", "w"],
        }
        .unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn means_skip_nulls_and_text() {
        let means = StatsCalculator::column_means(&sample());
        assert_eq!(means.len(), 2);
        assert_eq!(means[0].0, "a");
        assert!(approx(means[0].1, 2.5));
        assert_eq!(means[1].0, "b");
        assert!(approx(means[1].1, 20.0));
    }

    #[test]
    fn stds_are_sample_deviations() {
        let stds = StatsCalculator::column_stds(&sample());
        // var(a) = 5/3, var(b) = 100
        assert!(approx(stds[0].1, (5.0f64 / 3.0).sqrt()));
        assert!(approx(stds[1].1, 10.0));
    }

    #[test]
    fn sorted_ascending_orders_by_value() {
        let pairs = vec![("x".to_string(), 3.0), ("y".to_string(), -1.0), ("z".to_string(), 2.0)];
        let labels: Vec<String> = StatsCalculator::sorted_ascending(pairs)
            .into_iter()
            .map(|(l, _)| l)
            .collect();
        assert_eq!(labels, vec!["y", "z", "x"]);
    }

    #[test]
    fn missing_counts_include_nan() {
        let df = df! {
            "f" => [Some(1.0), Some(f64::NAN), None],
            "s" => [Some("a"), None, Some("c")],
        }
        .unwrap();
        let counts = StatsCalculator::missing_counts(&df);
        assert_eq!(counts, vec![("f".to_string(), 2), ("s".to_string(), 1)]);

        let map = StatsCalculator::missing_map(&df);
        assert_eq!(map.rows, 3);
        assert_eq!(map.cells, vec![(1, 0), (2, 0), (1, 1)]);
    }

    #[test]
    fn box_summary_flags_outliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
        let summary = StatsCalculator::box_summary(&values).unwrap();
        assert!(approx(summary.q1, 2.25));
        assert!(approx(summary.median, 3.5));
        assert!(approx(summary.q3, 4.75));
        assert!(approx(summary.lower_whisker, 1.0));
        assert!(approx(summary.upper_whisker, 5.0));
        assert_eq!(summary.outliers, vec![100.0]);
        assert!(StatsCalculator::box_summary(&[]).is_none());
    }

    #[test]
    fn histogram_counts_every_value() {
        let values: Vec<f64> = (0..=100).map(|v| v as f64).collect();
        let hist = StatsCalculator::histogram(&values, DEFAULT_BINS).unwrap();
        assert_eq!(hist.counts.len(), 10);
        assert_eq!(hist.counts.iter().sum::<usize>(), 101);
        assert_eq!(hist.counts[9], 11);
        assert!(approx(hist.bin_center(0), 5.0));
    }

    #[test]
    fn constant_histogram_has_one_bin() {
        let hist = StatsCalculator::histogram(&[4.0, 4.0], 10).unwrap();
        assert_eq!(hist.counts, vec![2]);
        assert!(approx(hist.bin_center(0), 4.0));
    }

    #[test]
    fn kde_integrates_to_one() {
        let values = [1.0, 2.0, 2.5, 3.0, 7.0];
        let curve = StatsCalculator::kde(&values, 400).unwrap();
        let area: f64 = curve
            .windows(2)
            .map(|w| (w[1][0] - w[0][0]) * (w[0][1] + w[1][1]) / 2.0)
            .sum();
        assert!((area - 1.0).abs() < 0.01, "area = {}", area);
        assert!(StatsCalculator::kde(&[1.0, 1.0], 50).is_none());
        assert!(StatsCalculator::kde(&[1.0], 50).is_none());
    }

    #[test]
    fn value_counts_most_frequent_first() {
        let counts = StatsCalculator::value_counts(&sample(), "label");
        assert_eq!(counts, vec![("w".to_string(), 3), ("x".to_string(), 1)]);
        assert!(StatsCalculator::value_counts(&sample(), "nope").is_empty());
    }

    #[test]
    fn common_columns_intersect_all_frames() {
        let frames = vec![
            ("one".to_string(), df! { "z" => [1.0], "a" => [1.0], "m" => [1.0] }.unwrap()),
            ("two".to_string(), df! { "m" => [2.0], "z" => [2.0] }.unwrap()),
        ];
        assert_eq!(StatsCalculator::common_columns(&frames), vec!["m", "z"]);
        assert!(StatsCalculator::common_columns(&[]).is_empty());
    }

    #[test]
    fn comparison_table_aligns_on_column_union() {
        let frames = vec![
            ("one".to_string(), df! { "a" => [1.0, 3.0] }.unwrap()),
            ("two".to_string(), df! { "a" => [10.0, 20.0], "b" => [5.0, 5.0] }.unwrap()),
        ];
        let table = StatsCalculator::comparison_table(&frames, StatsCalculator::column_means);
        assert_eq!(table.columns, vec!["a", "b"]);
        assert_eq!(table.datasets, vec!["one", "two"]);
        assert_eq!(table.get(0, 0), Some(2.0));
        assert_eq!(table.get(0, 1), None);
        assert_eq!(table.get(1, 0), Some(15.0));
        assert_eq!(table.get(1, 1), Some(5.0));
    }
}
