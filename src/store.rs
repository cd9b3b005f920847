//! SQLite persistence for sources, recipes, ingredients and instructions.

use std::path::Path;

use log::{debug, info};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{CorpusError, Result};
use crate::model::{BookSource, NewIngredient, NewRecipe, NewSource, Provider, RecipeChunk};

const SOURCE_COLUMNS: &str = "id, title, author, publication_year, provider, external_id, \
                              split_strategy, region, included";

impl ToSql for Provider {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Provider {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|err: CorpusError| FromSqlError::Other(Box::new(err)))
    }
}

/// The corpus database
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        let store = Self { conn };
        store.create_tables()?;
        debug!("Opened corpus database {}", path.display());
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let store = Self { conn };
        store.create_tables()?;
        Ok(store)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create every table and index that does not exist yet.
    pub fn create_tables(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS sources (
                id               INTEGER PRIMARY KEY,
                title            TEXT NOT NULL,
                author           TEXT,
                publication_year INTEGER,
                provider         TEXT NOT NULL,
                external_id      TEXT NOT NULL,
                split_strategy   TEXT,
                region           TEXT,
                included         BOOLEAN NOT NULL DEFAULT 1,
                UNIQUE(provider, external_id)
            );

            CREATE TABLE IF NOT EXISTS recipes (
                id              INTEGER PRIMARY KEY,
                source_id       INTEGER NOT NULL REFERENCES sources(id),
                raw_title       TEXT NOT NULL,
                parsed_title    TEXT,
                category        TEXT,
                section_header  TEXT,
                page_number     INTEGER,
                recipe_number   INTEGER,
                status          TEXT NOT NULL DEFAULT 'pending',
                not_a_recipe    BOOLEAN NOT NULL DEFAULT 0,
                failed_attempts INTEGER NOT NULL DEFAULT 0,
                input_text      TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_recipes_source ON recipes(source_id);

            CREATE TABLE IF NOT EXISTS ingredients (
                id                   INTEGER PRIMARY KEY,
                recipe_id            INTEGER NOT NULL REFERENCES recipes(id),
                position             INTEGER NOT NULL,
                original_string      TEXT NOT NULL,
                product              TEXT,
                cross_reference      BOOLEAN NOT NULL DEFAULT 0,
                referenced_recipe_id INTEGER REFERENCES recipes(id)
            );
            CREATE INDEX IF NOT EXISTS idx_ingredients_recipe ON ingredients(recipe_id);

            CREATE TABLE IF NOT EXISTS instructions (
                id        INTEGER PRIMARY KEY,
                recipe_id INTEGER NOT NULL REFERENCES recipes(id),
                position  INTEGER NOT NULL,
                text      TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_instructions_recipe ON instructions(recipe_id);
            ",
        )?;
        Ok(())
    }

    pub fn insert_source(&self, source: &NewSource) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO sources
                (title, author, publication_year, provider, external_id, split_strategy, region)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                source.title,
                source.author,
                source.publication_year,
                source.provider,
                source.external_id,
                source.split_strategy,
                source.region,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!("Registered source {} ({}) as #{}", source.external_id, source.provider, id);
        Ok(id)
    }

    /// The source with `external_id`, or [`CorpusError::UnknownSource`].
    pub fn find_source(&self, external_id: &str) -> Result<BookSource> {
        let sql = format!(
            "SELECT {} FROM sources WHERE external_id = ?1 ORDER BY id LIMIT 1",
            SOURCE_COLUMNS
        );
        self.conn
            .query_row(&sql, params![external_id], source_from_row)
            .optional()?
            .ok_or_else(|| CorpusError::UnknownSource(external_id.to_string()))
    }

    /// Every source, ordered by id.
    pub fn list_sources(&self) -> Result<Vec<BookSource>> {
        let sql = format!("SELECT {} FROM sources ORDER BY id", SOURCE_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let sources = stmt
            .query_map([], source_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(sources)
    }

    pub fn set_split_strategy(&self, source_id: i64, strategy: Option<&str>) -> Result<()> {
        self.conn.execute(
            "UPDATE sources SET split_strategy = ?1 WHERE id = ?2",
            params![strategy, source_id],
        )?;
        Ok(())
    }

    /// Include or exclude a whole source from the corpus.
    pub fn set_included(&self, source_id: i64, included: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE sources SET included = ?1 WHERE id = ?2",
            params![included, source_id],
        )?;
        Ok(())
    }

    pub fn insert_recipe(&self, recipe: &NewRecipe) -> Result<i64> {
        insert_recipe_with(&self.conn, recipe)
    }

    /// Append an ingredient after the recipe's existing ones.
    pub fn insert_ingredient(&self, recipe_id: i64, ingredient: &NewIngredient) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO ingredients
                (recipe_id, position, original_string, product, cross_reference, referenced_recipe_id)
             VALUES (
                ?1,
                (SELECT COALESCE(MAX(position), 0) + 1 FROM ingredients WHERE recipe_id = ?1),
                ?2, ?3, ?4, ?5
             )",
            params![
                recipe_id,
                ingredient.original_string,
                ingredient.product,
                ingredient.cross_reference,
                ingredient.referenced_recipe_id,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Append an instruction step after the recipe's existing ones.
    pub fn insert_instruction(&self, recipe_id: i64, text: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO instructions (recipe_id, position, text)
             VALUES (
                ?1,
                (SELECT COALESCE(MAX(position), 0) + 1 FROM instructions WHERE recipe_id = ?1),
                ?2
             )",
            params![recipe_id, text],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Persist a split result as pending recipes, in chunk order. Blank
    /// chunks are skipped. Returns the number of recipes written.
    pub fn save_chunks(&mut self, source_id: i64, chunks: &[RecipeChunk]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut saved = 0;
        for chunk in chunks {
            if chunk.text.trim().is_empty() {
                debug!("Skipping blank chunk for source #{}", source_id);
                continue;
            }
            insert_recipe_with(&tx, &NewRecipe::pending(source_id, chunk))?;
            saved += 1;
        }
        tx.commit()?;
        info!("Saved {} chunks for source #{}", saved, source_id);
        Ok(saved)
    }
}

fn insert_recipe_with(conn: &Connection, recipe: &NewRecipe) -> Result<i64> {
    conn.execute(
        "INSERT INTO recipes
            (source_id, raw_title, parsed_title, category, section_header, page_number,
             recipe_number, status, not_a_recipe, failed_attempts, input_text)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            recipe.source_id,
            recipe.raw_title,
            recipe.parsed_title,
            recipe.category,
            recipe.section_header,
            recipe.page_number,
            recipe.recipe_number,
            recipe.status.as_str(),
            recipe.not_a_recipe,
            recipe.failed_attempts,
            recipe.input_text,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn source_from_row(row: &Row<'_>) -> rusqlite::Result<BookSource> {
    Ok(BookSource {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        publication_year: row.get(3)?,
        provider: row.get(4)?,
        external_id: row.get(5)?,
        split_strategy: row.get(6)?,
        region: row.get(7)?,
        included: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str) -> RecipeChunk {
        RecipeChunk {
            text: text.to_string(),
            section_header: Some("SOUPS".to_string()),
            page_number: Some(12),
            recipe_number: None,
        }
    }

    #[test]
    fn test_source_round_trip() {
        let store = Store::open_in_memory().unwrap();
        let mut source = NewSource::new("The Experienced English Housekeeper", Provider::InternetArchive, "raff1769");
        source.publication_year = Some(1769);
        source.split_strategy = Some("raffald_1769".to_string());
        let id = store.insert_source(&source).unwrap();

        let found = store.find_source("raff1769").unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.provider, Provider::InternetArchive);
        assert_eq!(found.publication_year, Some(1769));
        assert_eq!(found.split_strategy.as_deref(), Some("raffald_1769"));
        assert!(found.included);

        store.set_included(id, false).unwrap();
        store.set_split_strategy(id, None).unwrap();
        let found = store.find_source("raff1769").unwrap();
        assert!(!found.included);
        assert_eq!(found.split_strategy, None);
    }

    #[test]
    fn test_find_unknown_source() {
        let store = Store::open_in_memory().unwrap();
        let err = store.find_source("nope").unwrap_err();
        assert!(matches!(err, CorpusError::UnknownSource(id) if id == "nope"));
    }

    #[test]
    fn test_duplicate_source_rejected() {
        let store = Store::open_in_memory().unwrap();
        let source = NewSource::new("American Cookery", Provider::Gutenberg, "12815");
        store.insert_source(&source).unwrap();
        assert!(store.insert_source(&source).is_err());
    }

    #[test]
    fn test_save_chunks_skips_blank() {
        let mut store = Store::open_in_memory().unwrap();
        let id = store
            .insert_source(&NewSource::new("Book", Provider::Gutenberg, "1"))
            .unwrap();
        let chunks = vec![chunk("Pea Soup.\nSoak the peas."), chunk("  \n "), chunk("Broth.\nBoil.")];
        assert_eq!(store.save_chunks(id, &chunks).unwrap(), 2);

        let titles: Vec<String> = store
            .connection()
            .prepare("SELECT raw_title FROM recipes ORDER BY id")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(titles, vec!["Pea Soup.", "Broth."]);
    }

    #[test]
    fn test_positions_increase_per_recipe() {
        let store = Store::open_in_memory().unwrap();
        let source_id = store
            .insert_source(&NewSource::new("Book", Provider::Gutenberg, "1"))
            .unwrap();
        let recipe_id = store
            .insert_recipe(&NewRecipe::pending(source_id, &chunk("Broth.\nBoil.")))
            .unwrap();
        store
            .insert_ingredient(recipe_id, &NewIngredient::product("a leg of beef", "beef"))
            .unwrap();
        store
            .insert_ingredient(recipe_id, &NewIngredient::product("salt", "salt"))
            .unwrap();
        store.insert_instruction(recipe_id, "Boil it.").unwrap();

        let positions: Vec<i64> = store
            .connection()
            .prepare("SELECT position FROM ingredients WHERE recipe_id = ?1 ORDER BY id")
            .unwrap()
            .query_map([recipe_id], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(positions, vec![1, 2]);
    }
}
