//! Data module - CSV loading and dataset management

mod dataset;
mod loader;
mod registry;

pub use dataset::{any_value_text, is_numeric_dtype, Dataset};
pub use loader::{load_csv, parse_separator, LoaderError};
pub use registry::DatasetRegistry;
