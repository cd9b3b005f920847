use std::path::PathBuf;

use rusqlite::Connection;

use crate::config::ExportConfig;
use crate::error::Result;
use crate::export::{export_dataset, ExportScope, Manifest};

/// Builder for configuring and running a dataset export
///
/// Starts from the default [`ExportConfig`]; every setter overrides one
/// field. Validation happens in [`DatasetExportBuilder::scope`] and
/// [`DatasetExportBuilder::build`], before anything is read or written.
#[derive(Debug, Clone, Default)]
pub struct DatasetExportBuilder {
    config: ExportConfig,
}

impl DatasetExportBuilder {
    /// Replace every setting with `config`
    ///
    /// # Example
    /// ```
    /// use cookbook_corpus::{CorpusConfig, DatasetExport};
    ///
    /// let config = CorpusConfig::default();
    /// let builder = DatasetExport::builder().config(config.export);
    /// ```
    pub fn config(mut self, config: ExportConfig) -> Self {
        self.config = config;
        self
    }

    /// Maximum recipes kept per source
    ///
    /// # Example
    /// ```
    /// use cookbook_corpus::DatasetExport;
    ///
    /// let scope = DatasetExport::builder().cap_per_source(50).scope().unwrap();
    /// assert_eq!(scope.cap_per_source, 50);
    /// ```
    pub fn cap_per_source(mut self, cap: usize) -> Self {
        self.config.cap_per_source = cap;
        self
    }

    /// Seed of the per-source sampling order
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn max_failed(mut self, max_failed: u32) -> Self {
        self.config.max_failed = max_failed;
        self
    }

    pub fn min_ingredients(mut self, min: u32) -> Self {
        self.config.min_ingredients = min;
        self
    }

    pub fn min_steps(mut self, min: u32) -> Self {
        self.config.min_steps = min;
        self
    }

    /// Inclusive bounds on total instruction characters
    ///
    /// # Example
    /// ```
    /// use cookbook_corpus::DatasetExport;
    ///
    /// // min above max is rejected
    /// assert!(DatasetExport::builder().char_range(500, 100).scope().is_err());
    /// ```
    pub fn char_range(mut self, min: u64, max: u64) -> Self {
        self.config.min_chars = min;
        self.config.max_chars = max;
        self
    }

    /// Leave recipes of `category` out (case-insensitive)
    pub fn exclude_category(mut self, category: impl Into<String>) -> Self {
        self.config.excluded_categories.push(category.into());
        self
    }

    /// Replace the excluded category list
    pub fn excluded_categories(mut self, categories: Vec<String>) -> Self {
        self.config.excluded_categories = categories;
        self
    }

    /// Version tag recorded in the manifest
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.dataset_version = version.into();
        self
    }

    /// Directory the artifacts are written to
    pub fn out_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// The effective settings
    pub fn settings(&self) -> &ExportConfig {
        &self.config
    }

    /// Validate the settings into an [`ExportScope`]
    pub fn scope(&self) -> Result<ExportScope> {
        ExportScope::new(&self.config)
    }

    /// Validate, select and write the artifact set
    ///
    /// # Errors
    /// Returns `CorpusError` if:
    /// - the scope is invalid (zero cap, min chars above max chars)
    /// - a database query fails
    /// - the output directory or a file cannot be written
    ///
    /// # Example
    /// ```no_run
    /// # use cookbook_corpus::{DatasetExport, Store};
    /// # use std::path::Path;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let store = Store::open(Path::new("cookbooks.sqlite3"))?;
    /// let manifest = DatasetExport::builder()
    ///     .seed(7)
    ///     .out_dir("exports/v2")
    ///     .version("v2")
    ///     .build(store.connection())?;
    /// println!("{} recipes", manifest.totals.recipes);
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self, conn: &Connection) -> Result<Manifest> {
        let scope = self.scope()?;
        export_dataset(
            conn,
            &scope,
            &self.config.output_dir,
            &self.config.dataset_version,
        )
    }
}

/// Main entry point for the export builder API
pub struct DatasetExport;

impl DatasetExport {
    /// Creates a new builder with default settings
    ///
    /// # Example
    /// ```
    /// use cookbook_corpus::DatasetExport;
    ///
    /// let builder = DatasetExport::builder();
    /// assert_eq!(builder.settings().seed, 42);
    /// ```
    pub fn builder() -> DatasetExportBuilder {
        DatasetExportBuilder::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CorpusError;

    #[test]
    fn test_setters_override_defaults() {
        let builder = DatasetExport::builder()
            .cap_per_source(5)
            .seed(9)
            .max_failed(0)
            .min_ingredients(1)
            .min_steps(2)
            .char_range(10, 20)
            .excluded_categories(vec![])
            .exclude_category("Drinks")
            .version("v9")
            .out_dir("out");
        let settings = builder.settings();
        assert_eq!(settings.cap_per_source, 5);
        assert_eq!(settings.seed, 9);
        assert_eq!(settings.max_failed, 0);
        assert_eq!(settings.min_steps, 2);
        assert_eq!((settings.min_chars, settings.max_chars), (10, 20));
        assert_eq!(settings.excluded_categories, vec!["Drinks".to_string()]);
        assert_eq!(settings.output_dir, PathBuf::from("out"));

        let scope = builder.scope().unwrap();
        assert!(scope.excluded_categories.contains("drinks"));
    }

    #[test]
    fn test_zero_cap_fails_before_export() {
        let conn = Connection::open_in_memory().unwrap();
        // no tables: an attempted query would fail with a database error instead
        let err = DatasetExport::builder().cap_per_source(0).build(&conn).unwrap_err();
        assert!(matches!(err, CorpusError::InvalidScope(_)));
    }
}
