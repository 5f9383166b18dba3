//! Stats module - Descriptive statistics

mod calculator;

pub use calculator::{
    BoxSummary, ComparisonTable, Histogram, MissingMap, StatsCalculator, DEFAULT_BINS,
};
