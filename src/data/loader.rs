//! CSV Data Loader Module
//! Reads delimited text files into datasets using Polars.

use super::Dataset;
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Separator must be a single character, got '{0}'")]
    InvalidSeparator(String),
}

/// Schema inference window, in rows.
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Turn the separator typed by the user into a byte.
///
/// Accepts one ASCII character, or `\t` / `tab` for a tab.
pub fn parse_separator(text: &str) -> Result<u8, LoaderError> {
    match text {
        "\\t" | "\t" => return Ok(b'\t'),
        t if t.eq_ignore_ascii_case("tab") => return Ok(b'\t'),
        _ => {}
    }

    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() && c != '\n' && c != '\r' && c != '"' => Ok(c as u8),
        _ => Err(LoaderError::InvalidSeparator(text.to_string())),
    }
}

/// Load a CSV file with a header row; the dataset is named after the file.
pub fn load_csv(path: &Path, separator: u8) -> Result<Dataset, LoaderError> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_separator(separator)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string());

    info!(
        "Loaded '{}': {} rows, {} columns",
        name,
        df.height(),
        df.width()
    );

    Ok(Dataset::new(name, df).with_source(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_semicolon_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "sales.csv",
            "region;units;price\nnorth;10;2.5\nsouth;4;3.0\neast;7;1.25\n",
        );

        let ds = load_csv(&path, parse_separator(";").unwrap()).unwrap();
        assert_eq!(ds.name(), "sales.csv");
        assert_eq!(ds.column_names(), vec!["region", "units", "price"]);
        assert_eq!(ds.row_count(), 3);
        assert_eq!(ds.numeric_column_names(), vec!["units", "price"]);
    }

    #[test]
    fn wrong_separator_gives_single_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "semi.csv", "a;b\n1;2\n");

        let ds = load_csv(&path, b',').unwrap();
        assert_eq!(ds.column_names(), vec!["a;b"]);
    }

    #[test]
    fn empty_cells_load_as_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "gaps.csv", "x,y\n1,\n2,5\n,6\n");

        let ds = load_csv(&path, b',').unwrap();
        let frame = ds.frame();
        assert_eq!(frame.column("x").unwrap().null_count(), 1);
        assert_eq!(frame.column("y").unwrap().null_count(), 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_csv(&dir.path().join("nope.csv"), b',').is_err());
    }

    #[test]
    fn separator_parsing() {
        assert_eq!(parse_separator(",").unwrap(), b',');
        assert_eq!(parse_separator("|").unwrap(), b'|');
        assert_eq!(parse_separator("\\t").unwrap(), b'\t');
        assert_eq!(parse_separator("TAB").unwrap(), b'\t');
        assert!(parse_separator("").is_err());
        assert!(parse_separator(";;").is_err());
        assert!(parse_separator("é").is_err());
    }
}
