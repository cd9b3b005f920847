//! Which recipes go into a dataset export.
//!
//! Filters run against per-recipe aggregates; the survivors are then capped
//! per source in a seeded pseudo-random order (md5 of the recipe id followed
//! by the seed, ascending), so a given seed and database always yield the
//! same selection.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info};
use md5::{Digest, Md5};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::config::ExportConfig;
use crate::error::{CorpusError, Result};

const METRICS_SQL: &str = "
    SELECT r.id,
           r.source_id,
           s.publication_year,
           r.category,
           COALESCE(NULLIF(TRIM(r.parsed_title), ''), r.raw_title),
           COALESCE(ing.n, 0),
           COALESCE(ins.n, 0),
           COALESCE(ins.chars, 0)
    FROM recipes r
    JOIN sources s ON s.id = r.source_id
    LEFT JOIN (
        SELECT recipe_id, COUNT(*) AS n FROM ingredients GROUP BY recipe_id
    ) ing ON ing.recipe_id = r.id
    LEFT JOIN (
        SELECT recipe_id, COUNT(*) AS n, SUM(LENGTH(text)) AS chars
        FROM instructions GROUP BY recipe_id
    ) ins ON ins.recipe_id = r.id
    WHERE s.included = 1
      AND r.not_a_recipe = 0
      AND r.status = 'success'
      AND r.failed_attempts <= ?1
    ORDER BY r.id";

/// Aggregates of one recipe used for filtering and for the export tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeMetrics {
    pub recipe_id: i64,
    pub source_id: i64,
    pub publication_year: Option<i32>,
    pub category: Option<String>,
    /// Parsed title when present, raw title otherwise
    pub title: String,
    pub ingredient_count: u32,
    pub instruction_steps: u32,
    pub instruction_chars: u64,
}

impl RecipeMetrics {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let chars: i64 = row.get(7)?;
        Ok(Self {
            recipe_id: row.get(0)?,
            source_id: row.get(1)?,
            publication_year: row.get(2)?,
            category: row.get(3)?,
            title: row.get(4)?,
            ingredient_count: row.get(5)?,
            instruction_steps: row.get(6)?,
            instruction_chars: u64::try_from(chars).unwrap_or(0),
        })
    }
}

/// Immutable selection rules of one export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportScope {
    pub cap_per_source: usize,
    pub seed: u64,
    pub max_failed: u32,
    pub min_ingredients: u32,
    pub min_steps: u32,
    pub min_chars: u64,
    pub max_chars: u64,
    /// Lower-cased, sorted
    pub excluded_categories: BTreeSet<String>,
}

impl ExportScope {
    /// Validate `config` into a scope. Fails before any query runs.
    pub fn new(config: &ExportConfig) -> Result<Self> {
        if config.cap_per_source == 0 {
            return Err(CorpusError::InvalidScope(
                "cap_per_source must be at least 1".to_string(),
            ));
        }
        if config.min_chars > config.max_chars {
            return Err(CorpusError::InvalidScope(format!(
                "min_chars ({}) exceeds max_chars ({})",
                config.min_chars, config.max_chars
            )));
        }
        Ok(Self {
            cap_per_source: config.cap_per_source,
            seed: config.seed,
            max_failed: config.max_failed,
            min_ingredients: config.min_ingredients,
            min_steps: config.min_steps,
            min_chars: config.min_chars,
            max_chars: config.max_chars,
            excluded_categories: config
                .excluded_categories
                .iter()
                .map(|category| category.trim().to_lowercase())
                .filter(|category| !category.is_empty())
                .collect(),
        })
    }

    /// Threshold, title and category checks on precomputed metrics. The
    /// status, inclusion and retry checks happen in SQL.
    pub fn admits(&self, metrics: &RecipeMetrics) -> bool {
        let category_allowed = metrics.category.as_deref().map_or(true, |category| {
            !self
                .excluded_categories
                .contains(&category.trim().to_lowercase())
        });
        !metrics.title.trim().is_empty()
            && category_allowed
            && metrics.ingredient_count >= self.min_ingredients
            && metrics.instruction_steps >= self.min_steps
            && (self.min_chars..=self.max_chars).contains(&metrics.instruction_chars)
    }

    /// Run the filters and the per-source cap against the corpus database.
    pub fn select(&self, conn: &Connection) -> Result<Selection> {
        let mut stmt = conn.prepare(METRICS_SQL)?;
        let candidates = stmt
            .query_map(params![self.max_failed], RecipeMetrics::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        let scanned = candidates.len();

        let mut pre_cap_counts: BTreeMap<i64, usize> = BTreeMap::new();
        let mut included = conn.prepare("SELECT id FROM sources WHERE included = 1")?;
        for source_id in included.query_map([], |row| row.get::<_, i64>(0))? {
            pre_cap_counts.insert(source_id?, 0);
        }

        let mut by_source: BTreeMap<i64, Vec<(String, i64)>> = BTreeMap::new();
        let mut metrics = BTreeMap::new();
        for candidate in candidates.into_iter().filter(|m| self.admits(m)) {
            by_source
                .entry(candidate.source_id)
                .or_default()
                .push((sampling_key(candidate.recipe_id, self.seed), candidate.recipe_id));
            metrics.insert(candidate.recipe_id, candidate);
        }

        let mut recipe_ids = BTreeSet::new();
        for (source_id, mut keyed) in by_source {
            pre_cap_counts.insert(source_id, keyed.len());
            keyed.sort();
            keyed.truncate(self.cap_per_source);
            debug!(
                "Source #{}: kept {} of {} qualifying recipes",
                source_id,
                keyed.len(),
                pre_cap_counts[&source_id]
            );
            recipe_ids.extend(keyed.into_iter().map(|(_, id)| id));
        }
        metrics.retain(|id, _| recipe_ids.contains(id));

        info!(
            "Selected {} recipes from {} candidates across {} sources",
            recipe_ids.len(),
            scanned,
            pre_cap_counts.len()
        );
        Ok(Selection {
            recipe_ids,
            metrics,
            pre_cap_counts,
        })
    }

    /// Convenience for [`ExportScope::select`] when only the ids matter.
    pub fn recipe_ids(&self, conn: &Connection) -> Result<BTreeSet<i64>> {
        Ok(self.select(conn)?.recipe_ids)
    }
}

impl Default for ExportScope {
    fn default() -> Self {
        let config = ExportConfig::default();
        Self {
            cap_per_source: config.cap_per_source,
            seed: config.seed,
            max_failed: config.max_failed,
            min_ingredients: config.min_ingredients,
            min_steps: config.min_steps,
            min_chars: config.min_chars,
            max_chars: config.max_chars,
            excluded_categories: config.excluded_categories.into_iter().collect(),
        }
    }
}

/// Result of applying a scope: computed once, shared by the export tables
/// and the manifest statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    recipe_ids: BTreeSet<i64>,
    metrics: BTreeMap<i64, RecipeMetrics>,
    pre_cap_counts: BTreeMap<i64, usize>,
}

impl Selection {
    pub fn recipe_ids(&self) -> &BTreeSet<i64> {
        &self.recipe_ids
    }

    /// Metrics of the selected recipes, by recipe id
    pub fn recipe_metrics(&self) -> &BTreeMap<i64, RecipeMetrics> {
        &self.metrics
    }

    /// Qualifying recipes per included source before capping. Sources with
    /// nothing qualifying are present with 0.
    pub fn pre_cap_counts_per_source(&self) -> &BTreeMap<i64, usize> {
        &self.pre_cap_counts
    }

    /// Selected recipes per source
    pub fn selected_counts_per_source(&self) -> BTreeMap<i64, usize> {
        let mut counts: BTreeMap<i64, usize> =
            self.pre_cap_counts.keys().map(|id| (*id, 0)).collect();
        for metrics in self.metrics.values() {
            *counts.entry(metrics.source_id).or_default() += 1;
        }
        counts
    }
}

/// Sort key of a recipe in the seeded sampling order: lower-case hex md5 of
/// the decimal id immediately followed by the decimal seed.
pub fn sampling_key(recipe_id: i64, seed: u64) -> String {
    let mut hasher = Md5::new();
    hasher.update(format!("{}{}", recipe_id, seed).as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> RecipeMetrics {
        RecipeMetrics {
            recipe_id: 1,
            source_id: 1,
            publication_year: Some(1769),
            category: Some("Soup".to_string()),
            title: "To make Gravy Soup.".to_string(),
            ingredient_count: 3,
            instruction_steps: 1,
            instruction_chars: 80,
        }
    }

    #[test]
    fn test_sampling_key_is_md5_hex() {
        // md5("142")
        assert_eq!(sampling_key(1, 42), "a8baa56554f96369ab93e4f3bb068c22");
        assert_eq!(sampling_key(1, 42).len(), 32);
        assert_ne!(sampling_key(1, 42), sampling_key(1, 43));
    }

    #[test]
    fn test_validation() {
        let mut config = ExportConfig::default();
        assert!(ExportScope::new(&config).is_ok());

        config.cap_per_source = 0;
        assert!(matches!(ExportScope::new(&config), Err(CorpusError::InvalidScope(_))));

        config.cap_per_source = 5;
        config.min_chars = 100;
        config.max_chars = 99;
        assert!(matches!(ExportScope::new(&config), Err(CorpusError::InvalidScope(_))));
    }

    #[test]
    fn test_admits_boundaries_are_inclusive() {
        let scope = ExportScope::default();
        let mut m = metrics();
        assert!(scope.admits(&m));

        m.instruction_chars = 79;
        assert!(!scope.admits(&m));
        m.instruction_chars = 50_000;
        assert!(scope.admits(&m));
        m.instruction_chars = 50_001;
        assert!(!scope.admits(&m));
    }

    #[test]
    fn test_admits_category_and_title() {
        let scope = ExportScope::default();
        let mut m = metrics();
        m.category = Some(" Medicinal ".to_string());
        assert!(!scope.admits(&m));
        m.category = None;
        assert!(scope.admits(&m));
        m.title = "   ".to_string();
        assert!(!scope.admits(&m));
    }

    #[test]
    fn test_default_matches_config_defaults() {
        assert_eq!(ExportScope::default(), ExportScope::new(&ExportConfig::default()).unwrap());
    }
}
