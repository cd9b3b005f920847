//! Writes the artifact set of one export run: the recipe table, the long
//! ingredient-token table and the manifest.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{SecondsFormat, Utc};
use log::{debug, info, warn};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::scope::{ExportScope, RecipeMetrics, Selection};
use super::slices::{slice_for, Slice};
use super::tokenizer::{recipe_tokens, IngredientRow, TOKENIZATION_RULE};
use crate::error::Result;

pub const RECIPES_FILE: &str = "recipes.jsonl";
pub const INGREDIENTS_FILE: &str = "ingredients_long.jsonl";
pub const MANIFEST_FILE: &str = "manifest.json";

const INGREDIENTS_SQL: &str = "
    SELECT original_string, product, cross_reference, referenced_recipe_id
    FROM ingredients
    WHERE recipe_id = ?1
    ORDER BY position, id";

#[derive(Serialize)]
struct RecipeRow<'a> {
    recipe_id: i64,
    source_id: i64,
    source_external_id: &'a str,
    publication_year: Option<i32>,
    slice: Slice,
    category: Option<&'a str>,
    title: &'a str,
    ingredient_count: u32,
    instruction_steps: u32,
    instruction_chars: u64,
}

#[derive(Serialize)]
struct TokenRow<'a> {
    recipe_id: i64,
    source_id: i64,
    slice: Slice,
    token: &'a str,
}

/// Recipe, row and vocabulary counts of one group of recipes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupStats {
    pub recipes: usize,
    pub ingredient_rows: usize,
    pub vocabulary: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStats {
    pub title: String,
    pub external_id: String,
    /// Recipes that passed every filter, before the per-source cap
    pub qualifying_before_cap: usize,
    pub selected: usize,
    pub vocabulary: usize,
}

/// Everything needed to reproduce or interpret an export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub dataset_version: String,
    /// UTC, RFC 3339. The only field that differs between identical runs.
    pub generated_at: String,
    pub git_revision: Option<String>,
    pub selection: ExportScope,
    pub totals: GroupStats,
    /// Keyed by slice label; every label is present
    pub slices: BTreeMap<String, GroupStats>,
    /// Keyed by source id; every included source is present
    pub sources: BTreeMap<i64, SourceStats>,
    pub tokenization: String,
    pub files: Vec<String>,
}

struct SourceInfo {
    title: String,
    external_id: String,
}

#[derive(Default)]
struct Tally {
    recipes: usize,
    ingredient_rows: usize,
    vocabulary: BTreeSet<String>,
}

impl Tally {
    fn add(&mut self, tokens: &[String]) {
        self.recipes += 1;
        self.ingredient_rows += tokens.len();
        self.vocabulary.extend(tokens.iter().cloned());
    }

    fn stats(&self) -> GroupStats {
        GroupStats {
            recipes: self.recipes,
            ingredient_rows: self.ingredient_rows,
            vocabulary: self.vocabulary.len(),
        }
    }
}

/// Select recipes with `scope` and write the three artifacts into `out_dir`,
/// replacing earlier ones. Returns the manifest that was written.
pub fn export_dataset(
    conn: &Connection,
    scope: &ExportScope,
    out_dir: &Path,
    dataset_version: &str,
) -> Result<Manifest> {
    let selection = scope.select(conn)?;
    let sources = included_sources(conn)?;
    fs::create_dir_all(out_dir)?;

    let mut recipes_out = BufWriter::new(File::create(out_dir.join(RECIPES_FILE))?);
    let mut tokens_out = BufWriter::new(File::create(out_dir.join(INGREDIENTS_FILE))?);
    let mut ingredients = conn.prepare(INGREDIENTS_SQL)?;

    let mut totals = Tally::default();
    let mut slices: BTreeMap<Slice, Tally> = Slice::ALL.iter().map(|s| (*s, Tally::default())).collect();
    let mut per_source: BTreeMap<i64, Tally> = BTreeMap::new();

    for metrics in selection.recipe_metrics().values() {
        let slice = slice_for(metrics.publication_year);
        let external_id = sources
            .get(&metrics.source_id)
            .map(|source| source.external_id.as_str())
            .unwrap_or_default();
        write_line(&mut recipes_out, &recipe_row(metrics, external_id, slice))?;

        let rows = ingredients
            .query_map(params![metrics.recipe_id], ingredient_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        let tokens = recipe_tokens(&rows);
        debug!(
            "Recipe #{}: {} ingredients, {} tokens",
            metrics.recipe_id,
            rows.len(),
            tokens.len()
        );
        for token in &tokens {
            write_line(
                &mut tokens_out,
                &TokenRow {
                    recipe_id: metrics.recipe_id,
                    source_id: metrics.source_id,
                    slice,
                    token,
                },
            )?;
        }

        totals.add(&tokens);
        slices.entry(slice).or_default().add(&tokens);
        per_source.entry(metrics.source_id).or_default().add(&tokens);
    }
    recipes_out.flush()?;
    tokens_out.flush()?;

    let manifest = Manifest {
        dataset_version: dataset_version.to_string(),
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        git_revision: git_revision(),
        selection: scope.clone(),
        totals: totals.stats(),
        slices: slices
            .iter()
            .map(|(slice, tally)| (slice.as_str().to_string(), tally.stats()))
            .collect(),
        sources: source_stats(&selection, &sources, &per_source),
        tokenization: TOKENIZATION_RULE.to_string(),
        files: [RECIPES_FILE, INGREDIENTS_FILE, MANIFEST_FILE]
            .iter()
            .map(|name| name.to_string())
            .collect(),
    };
    let mut manifest_out = BufWriter::new(File::create(out_dir.join(MANIFEST_FILE))?);
    serde_json::to_writer_pretty(&mut manifest_out, &manifest)?;
    writeln!(manifest_out)?;
    manifest_out.flush()?;

    info!(
        "Exported {} recipes and {} ingredient rows ({} distinct tokens) to {}",
        manifest.totals.recipes,
        manifest.totals.ingredient_rows,
        manifest.totals.vocabulary,
        out_dir.display()
    );
    Ok(manifest)
}

/// Paths of the artifacts `export_dataset` writes into `out_dir`
pub fn artifact_paths(out_dir: &Path) -> [PathBuf; 3] {
    [
        out_dir.join(RECIPES_FILE),
        out_dir.join(INGREDIENTS_FILE),
        out_dir.join(MANIFEST_FILE),
    ]
}

fn recipe_row<'a>(metrics: &'a RecipeMetrics, external_id: &'a str, slice: Slice) -> RecipeRow<'a> {
    RecipeRow {
        recipe_id: metrics.recipe_id,
        source_id: metrics.source_id,
        source_external_id: external_id,
        publication_year: metrics.publication_year,
        slice,
        category: metrics.category.as_deref(),
        title: metrics.title.trim(),
        ingredient_count: metrics.ingredient_count,
        instruction_steps: metrics.instruction_steps,
        instruction_chars: metrics.instruction_chars,
    }
}

fn source_stats(
    selection: &Selection,
    sources: &BTreeMap<i64, SourceInfo>,
    per_source: &BTreeMap<i64, Tally>,
) -> BTreeMap<i64, SourceStats> {
    let qualifying = selection.pre_cap_counts_per_source();
    sources
        .iter()
        .map(|(id, source)| {
            let tally = per_source.get(id);
            let stats = SourceStats {
                title: source.title.clone(),
                external_id: source.external_id.clone(),
                qualifying_before_cap: qualifying.get(id).copied().unwrap_or(0),
                selected: tally.map_or(0, |t| t.recipes),
                vocabulary: tally.map_or(0, |t| t.vocabulary.len()),
            };
            (*id, stats)
        })
        .collect()
}

fn included_sources(conn: &Connection) -> Result<BTreeMap<i64, SourceInfo>> {
    let mut stmt = conn.prepare("SELECT id, title, external_id FROM sources WHERE included = 1")?;
    let sources = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                SourceInfo {
                    title: row.get(1)?,
                    external_id: row.get(2)?,
                },
            ))
        })?
        .collect::<rusqlite::Result<BTreeMap<_, _>>>()?;
    Ok(sources)
}

fn ingredient_from_row(row: &Row<'_>) -> rusqlite::Result<IngredientRow> {
    Ok(IngredientRow {
        original_string: row.get(0)?,
        product: row.get(1)?,
        cross_reference: row.get(2)?,
        referenced_recipe_id: row.get(3)?,
    })
}

fn write_line<W: Write, T: Serialize>(out: &mut W, row: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, row)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Commit hash of the working directory's git checkout, if there is one.
pub fn git_revision() -> Option<String> {
    let output = match Command::new("git").args(["rev-parse", "HEAD"]).output() {
        Ok(output) => output,
        Err(err) => {
            warn!("Could not run git to determine the revision: {}", err);
            return None;
        }
    };
    if !output.status.success() {
        warn!("Not inside a git checkout; manifest git_revision will be null");
        return None;
    }
    let revision = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if revision.is_empty() {
        None
    } else {
        Some(revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExtractionStatus, NewIngredient, NewRecipe, NewSource, Provider, RecipeChunk};
    use crate::store::Store;

    fn seeded_store() -> Store {
        let store = Store::open_in_memory().unwrap();
        let mut source = NewSource::new("The Virginia House-Wife", Provider::InternetArchive, "virg1824");
        source.publication_year = Some(1824);
        let source_id = store.insert_source(&source).unwrap();

        let chunk = RecipeChunk {
            text: "TO MAKE GRAVY SOUP.\nTake a shin of beef.".to_string(),
            section_header: Some("SOUPS".to_string()),
            page_number: Some(3),
            recipe_number: None,
        };
        let mut recipe = NewRecipe::pending(source_id, &chunk);
        recipe.status = ExtractionStatus::Success;
        recipe.category = Some("Soup".to_string());
        let recipe_id = store.insert_recipe(&recipe).unwrap();

        for (original, product) in [
            ("a shin of beef", Some("Beef")),
            ("salt & pepper", Some("salt & pepper")),
            ("more beef", Some("beef")),
            ("three onions", None),
        ] {
            let ingredient = NewIngredient {
                original_string: original.to_string(),
                product: product.map(str::to_string),
                ..Default::default()
            };
            store.insert_ingredient(recipe_id, &ingredient).unwrap();
        }
        store
            .insert_ingredient(
                recipe_id,
                &NewIngredient {
                    original_string: "gravy (see No. 2)".to_string(),
                    cross_reference: true,
                    ..Default::default()
                },
            )
            .unwrap();
        store
            .insert_instruction(
                recipe_id,
                "Cut the beef into pieces, put it into a pot with the onions and four quarts of water.",
            )
            .unwrap();
        store
    }

    #[test]
    fn test_export_writes_rows_and_manifest() {
        let store = seeded_store();
        let dir = tempfile::tempdir().unwrap();
        let manifest =
            export_dataset(store.connection(), &ExportScope::default(), dir.path(), "v-test").unwrap();

        let recipes = fs::read_to_string(dir.path().join(RECIPES_FILE)).unwrap();
        let lines: Vec<&str> = recipes.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("{\"recipe_id\":1,\"source_id\":1,\"source_external_id\":\"virg1824\""));
        assert!(lines[0].contains("\"slice\":\"victorian\""));
        assert!(lines[0].contains("\"ingredient_count\":5"));

        let tokens: Vec<String> = fs::read_to_string(dir.path().join(INGREDIENTS_FILE))
            .unwrap()
            .lines()
            .map(|line| {
                let value: serde_json::Value = serde_json::from_str(line).unwrap();
                value["token"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(tokens, vec!["beef", "salt pepper", "three onions"]);

        assert_eq!(manifest.dataset_version, "v-test");
        assert_eq!(manifest.totals, GroupStats { recipes: 1, ingredient_rows: 3, vocabulary: 3 });
        assert_eq!(manifest.slices.len(), 4);
        assert_eq!(manifest.slices["victorian"].recipes, 1);
        assert_eq!(manifest.slices["early"], GroupStats::default());
        assert_eq!(manifest.sources[&1].selected, 1);
        assert_eq!(manifest.sources[&1].qualifying_before_cap, 1);
        assert_eq!(manifest.tokenization, TOKENIZATION_RULE);

        let written: Manifest =
            serde_json::from_str(&fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap()).unwrap();
        assert_eq!(written, manifest);
    }

    #[test]
    fn test_empty_selection_still_writes_artifacts() {
        let store = seeded_store();
        store.set_included(1, false).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let manifest =
            export_dataset(store.connection(), &ExportScope::default(), dir.path(), "v1").unwrap();

        for path in artifact_paths(dir.path()) {
            assert!(path.exists(), "{} missing", path.display());
        }
        assert_eq!(fs::read_to_string(dir.path().join(RECIPES_FILE)).unwrap(), "");
        assert_eq!(manifest.totals, GroupStats::default());
        assert!(manifest.sources.is_empty());
    }
}
