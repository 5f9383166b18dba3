//! Dataset Registry Module
//! Insertion-ordered collection of the datasets loaded in this session.

use super::Dataset;
use polars::prelude::DataFrame;

/// Named datasets kept for the lifetime of the application.
#[derive(Debug, Default)]
pub struct DatasetRegistry {
    datasets: Vec<Dataset>,
}

impl DatasetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dataset; an existing dataset with the same name is replaced in place.
    pub fn insert(&mut self, dataset: Dataset) {
        match self.position(dataset.name()) {
            Some(idx) => self.datasets[idx] = dataset,
            None => self.datasets.push(dataset),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Dataset> {
        self.position(name).map(|idx| &self.datasets[idx])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Dataset> {
        self.position(name).map(move |idx| &mut self.datasets[idx])
    }

    pub fn names(&self) -> Vec<String> {
        self.datasets.iter().map(|d| d.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter()
    }

    /// Numeric-only snapshot of every dataset, in load order.
    pub fn numeric_frames(&self) -> Vec<(String, DataFrame)> {
        self.datasets
            .iter()
            .map(|d| (d.name().to_string(), d.numeric_frame()))
            .collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.datasets.iter().position(|d| d.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn dataset(name: &str, rows: i64) -> Dataset {
        let values: Vec<i64> = (0..rows).collect();
        Dataset::new(name, df! { "v" => values }.unwrap())
    }

    #[test]
    fn keeps_load_order() {
        let mut registry = DatasetRegistry::new();
        assert!(registry.is_empty());
        registry.insert(dataset("b.csv", 1));
        registry.insert(dataset("a.csv", 2));
        assert_eq!(registry.names(), vec!["b.csv", "a.csv"]);
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
    }

    #[test]
    fn same_name_replaces_in_place() {
        let mut registry = DatasetRegistry::new();
        registry.insert(dataset("a.csv", 1));
        registry.insert(dataset("b.csv", 1));
        registry.insert(dataset("a.csv", 5));

        assert_eq!(registry.names(), vec!["a.csv", "b.csv"]);
        assert_eq!(registry.get("a.csv").unwrap().row_count(), 5);
    }

    #[test]
    fn mutations_are_visible_through_lookup() {
        let mut registry = DatasetRegistry::new();
        registry.insert(dataset("a.csv", 2));
        registry
            .get_mut("a.csv")
            .unwrap()
            .append_row(&["7".to_string()])
            .unwrap();
        assert_eq!(registry.get("a.csv").unwrap().row_count(), 3);
        assert!(registry.get_mut("zzz.csv").is_none());
    }

    #[test]
    fn numeric_frames_drop_text_columns() {
        let mut registry = DatasetRegistry::new();
        let frame = df! { "label" => ["x", "y"], "v" => [1.0, 2.0] }.unwrap();
        registry.insert(Dataset::new("mixed.csv", frame));

        let frames = registry.numeric_frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].0, "mixed.csv");
        assert_eq!(frames[0].1.get_column_names(), vec!["v"]);
    }
}
