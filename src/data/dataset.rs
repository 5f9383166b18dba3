//! Dataset Module
//! A named in-memory table with column sorting and manual row appends.

use polars::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),
    #[error("Expected {expected} values, got {got}")]
    WrongValueCount { expected: usize, got: usize },
}

/// Whether a dtype counts as numeric for statistics and charts.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    is_integer_dtype(dtype) || matches!(dtype, DataType::Float32 | DataType::Float64)
}

fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Text shown in the grid for one cell. Nulls render empty.
pub fn any_value_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

/// Per-column sort direction memory.
#[derive(Debug, Clone, Default)]
struct SortState {
    /// Direction the next click on a column will sort in; absent means ascending.
    next_ascending: HashMap<String, bool>,
    sorted_column: Option<String>,
}

impl SortState {
    fn sorted_column(&self) -> Option<&str> {
        self.sorted_column.as_deref()
    }

    fn next_ascending(&self, column: &str) -> bool {
        self.next_ascending.get(column).copied().unwrap_or(true)
    }
}

/// A named table loaded from a CSV file.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    source: Option<PathBuf>,
    frame: DataFrame,
    sort: SortState,
}

impl Dataset {
    pub fn new(name: impl Into<String>, frame: DataFrame) -> Self {
        Self {
            name: name.into(),
            source: None,
            frame,
            sort: SortState::default(),
        }
    }

    pub fn with_source(mut self, source: PathBuf) -> Self {
        self.source = Some(source);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> Option<&PathBuf> {
        self.source.as_ref()
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn row_count(&self) -> usize {
        self.frame.height()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn numeric_column_names(&self) -> Vec<String> {
        self.frame
            .get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Copy of the table restricted to numeric columns.
    pub fn numeric_frame(&self) -> DataFrame {
        let columns: Vec<Column> = self
            .frame
            .get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .cloned()
            .collect();
        DataFrame::new(columns).unwrap_or_default()
    }

    /// Display text for one cell; out-of-range cells are empty.
    pub fn cell_text(&self, row: usize, column: usize) -> String {
        self.frame
            .get_columns()
            .get(column)
            .and_then(|col| col.get(row).ok())
            .map(|v| any_value_text(&v))
            .unwrap_or_default()
    }

    /// Header text, with an arrow on the last sorted column.
    ///
    /// The arrow points the way the next click will sort.
    pub fn header_label(&self, column: &str) -> String {
        if self.sort.sorted_column() == Some(column) {
            let arrow = if self.sort.next_ascending(column) {
                "▲"
            } else {
                "▼"
            };
            format!("{} {}", column, arrow)
        } else {
            column.to_string()
        }
    }

    /// Sort rows by `column`, alternating direction on each call.
    ///
    /// Text columns whose values all parse as numbers are converted first.
    pub fn sort_by_column(&mut self, column: &str) -> Result<(), DatasetError> {
        let series = self
            .frame
            .column(column)
            .map_err(|_| DatasetError::UnknownColumn(column.to_string()))?
            .as_materialized_series()
            .clone();

        if let Some(numeric) = coerce_numeric(&series) {
            debug!("Column '{}' coerced to {}", column, numeric.dtype());
            self.frame.with_column(numeric)?;
        }

        let ascending = self.sort.next_ascending(column);
        self.frame = self.frame.sort(
            [column],
            SortMultipleOptions::default()
                .with_order_descending(!ascending)
                .with_nulls_last(true)
                .with_maintain_order(true),
        )?;

        self.sort.next_ascending.insert(column.to_string(), !ascending);
        self.sort.sorted_column = Some(column.to_string());
        debug!(
            "Sorted '{}' by '{}' ({})",
            self.name,
            column,
            if ascending { "asc" } else { "desc" }
        );
        Ok(())
    }

    /// Append one row given as text, one value per column in column order.
    pub fn append_row(&mut self, values: &[String]) -> Result<(), DatasetError> {
        let width = self.frame.width();
        if values.len() != width {
            return Err(DatasetError::WrongValueCount {
                expected: width,
                got: values.len(),
            });
        }

        let columns = self
            .frame
            .get_columns()
            .iter()
            .zip(values)
            .map(|(col, raw)| append_value(col.as_materialized_series(), raw).map(Column::from))
            .collect::<PolarsResult<Vec<Column>>>()?;

        self.frame = DataFrame::new(columns)?;
        Ok(())
    }
}

/// Best-effort numeric conversion of a text column.
fn coerce_numeric(series: &Series) -> Option<Series> {
    if series.dtype() != &DataType::String || series.null_count() == series.len() {
        return None;
    }

    let trimmed: StringChunked = series
        .str()
        .ok()?
        .into_iter()
        .map(|v| v.map(str::trim))
        .collect();
    let trimmed = trimmed.with_name(series.name().clone()).into_series();
    trimmed
        .strict_cast(&DataType::Int64)
        .or_else(|_| trimmed.strict_cast(&DataType::Float64))
        .ok()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Extend `series` with one parsed value, widening to text when it does not fit.
fn append_value(series: &Series, raw: &str) -> PolarsResult<Series> {
    let name = series.name().clone();
    let dtype = series.dtype().clone();
    let trimmed = raw.trim();

    let parsed = if dtype == DataType::String {
        Some(Series::new(name.clone(), [raw]))
    } else if trimmed.is_empty() {
        Some(Series::full_null(name.clone(), 1, &dtype))
    } else if dtype == DataType::Boolean {
        parse_bool(trimmed).map(|b| Series::new(name.clone(), [b]))
    } else if is_integer_dtype(&dtype) {
        trimmed
            .parse::<i64>()
            .ok()
            .and_then(|v| Series::new(name.clone(), [v]).strict_cast(&dtype).ok())
    } else if is_numeric_dtype(&dtype) {
        trimmed
            .parse::<f64>()
            .ok()
            .and_then(|v| Series::new(name.clone(), [v]).cast(&dtype).ok())
    } else {
        None
    };

    match parsed {
        Some(value) => {
            let mut out = series.clone();
            out.append(&value)?;
            Ok(out)
        }
        None => {
            let mut out = series.cast(&DataType::String)?;
            out.append(&Series::new(name, [raw]))?;
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Dataset {
        let frame = df! {
            "name" => ["carol", "alice", "bob"],
            "age" => [41i64, 29, 35],
            "score" => [Some(7.5), None, Some(9.5)],
            "code" => ["10", "9", "100"],
        }
        .unwrap();
        Dataset::new("people.csv", frame)
    }

    fn column_text(ds: &Dataset, column: usize) -> Vec<String> {
        (0..ds.row_count()).map(|r| ds.cell_text(r, column)).collect()
    }

    #[test]
    fn numeric_columns_skip_text() {
        let ds = people();
        assert_eq!(ds.numeric_column_names(), vec!["age", "score"]);
        assert_eq!(ds.numeric_frame().width(), 2);
    }

    #[test]
    fn sort_alternates_direction() {
        let mut ds = people();
        ds.sort_by_column("age").unwrap();
        assert_eq!(column_text(&ds, 0), vec!["alice", "bob", "carol"]);
        assert_eq!(ds.header_label("age"), "age ▼");
        assert_eq!(ds.header_label("name"), "name");

        ds.sort_by_column("age").unwrap();
        assert_eq!(column_text(&ds, 0), vec!["carol", "bob", "alice"]);
        assert_eq!(ds.header_label("age"), "age ▲");
    }

    #[test]
    fn numeric_text_sorts_numerically() {
        let mut ds = people();
        ds.sort_by_column("code").unwrap();
        assert_eq!(column_text(&ds, 3), vec!["9", "10", "100"]);
        assert_eq!(ds.frame().column("code").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn mixed_text_falls_back_to_lexical_order() {
        let frame = df! { "id" => ["b2", "10", "a1"] }.unwrap();
        let mut ds = Dataset::new("mixed.csv", frame);
        ds.sort_by_column("id").unwrap();
        assert_eq!(column_text(&ds, 0), vec!["10", "a1", "b2"]);
        assert_eq!(ds.frame().column("id").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn nulls_sort_last() {
        let mut ds = people();
        ds.sort_by_column("score").unwrap();
        assert_eq!(column_text(&ds, 2), vec!["7.5", "9.5", ""]);
    }

    #[test]
    fn sort_unknown_column_fails() {
        let mut ds = people();
        assert!(matches!(
            ds.sort_by_column("missing"),
            Err(DatasetError::UnknownColumn(_))
        ));
    }

    #[test]
    fn append_parses_into_column_types() {
        let mut ds = people();
        let row = ["dave", "52", "", "7"].map(String::from);
        ds.append_row(&row).unwrap();

        assert_eq!(ds.row_count(), 4);
        assert_eq!(ds.column_names(), vec!["name", "age", "score", "code"]);
        assert_eq!(ds.frame().column("age").unwrap().dtype(), &DataType::Int64);
        assert_eq!(ds.cell_text(3, 1), "52");
        assert_eq!(ds.cell_text(3, 2), "");
    }

    #[test]
    fn append_widens_column_on_mismatch() {
        let mut ds = people();
        let row = ["erin", "unknown", "8.25", "3"].map(String::from);
        ds.append_row(&row).unwrap();

        assert_eq!(ds.frame().column("age").unwrap().dtype(), &DataType::String);
        assert_eq!(ds.cell_text(0, 1), "41");
        assert_eq!(ds.cell_text(3, 1), "unknown");
        assert_eq!(ds.frame().column("score").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn append_rejects_wrong_value_count() {
        let mut ds = people();
        let err = ds.append_row(&["x".to_string()]).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::WrongValueCount { expected: 4, got: 1 }
        ));
        assert_eq!(ds.row_count(), 3);
    }
}
