use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CorpusError;

/// Where a book's text comes from. Each provider delivers one content format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    /// Project Gutenberg HTML editions
    Gutenberg,
    /// Internet Archive OCR plain text
    InternetArchive,
}

/// The shape of a book's cached content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Markup,
    Ocr,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Gutenberg, Provider::InternetArchive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gutenberg => "gutenberg",
            Provider::InternetArchive => "internet_archive",
        }
    }

    pub fn format(&self) -> SourceFormat {
        match self {
            Provider::Gutenberg => SourceFormat::Markup,
            Provider::InternetArchive => SourceFormat::Ocr,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = CorpusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gutenberg" => Ok(Provider::Gutenberg),
            "internet_archive" | "archive" => Ok(Provider::InternetArchive),
            other => Err(CorpusError::UnknownProvider(other.to_string())),
        }
    }
}

/// Bibliographic record of one cookbook
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookSource {
    pub id: i64,
    pub title: String,
    pub author: Option<String>,
    pub publication_year: Option<i32>,
    pub provider: Provider,
    pub external_id: String,
    pub split_strategy: Option<String>,
    pub region: Option<String>,
    pub included: bool,
}

/// Fields needed to register a new source
#[derive(Debug, Clone)]
pub struct NewSource {
    pub title: String,
    pub author: Option<String>,
    pub publication_year: Option<i32>,
    pub provider: Provider,
    pub external_id: String,
    pub split_strategy: Option<String>,
    pub region: Option<String>,
}

impl NewSource {
    pub fn new(title: impl Into<String>, provider: Provider, external_id: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: None,
            publication_year: None,
            provider,
            external_id: external_id.into(),
            split_strategy: None,
            region: None,
        }
    }
}

/// One candidate recipe cut out of a book by a split strategy.
///
/// `text` is never blank; chunks are produced in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeChunk {
    pub text: String,
    pub section_header: Option<String>,
    pub page_number: Option<u32>,
    pub recipe_number: Option<u32>,
}

impl RecipeChunk {
    /// First line of the chunk, which every strategy keeps as the recipe title
    pub fn title(&self) -> &str {
        self.text.lines().next().unwrap_or("").trim()
    }
}

/// Outcome of the LLM extraction step for one recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStatus {
    Pending,
    Success,
    Failed,
    Excluded,
}

impl ExtractionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStatus::Pending => "pending",
            ExtractionStatus::Success => "success",
            ExtractionStatus::Failed => "failed",
            ExtractionStatus::Excluded => "excluded",
        }
    }
}

/// A recipe row as written by the extraction step
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub source_id: i64,
    pub raw_title: String,
    pub parsed_title: Option<String>,
    pub category: Option<String>,
    pub section_header: Option<String>,
    pub page_number: Option<u32>,
    pub recipe_number: Option<u32>,
    pub status: ExtractionStatus,
    pub not_a_recipe: bool,
    pub failed_attempts: u32,
    pub input_text: String,
}

impl NewRecipe {
    pub fn pending(source_id: i64, chunk: &RecipeChunk) -> Self {
        Self {
            source_id,
            raw_title: chunk.title().to_string(),
            parsed_title: None,
            category: None,
            section_header: chunk.section_header.clone(),
            page_number: chunk.page_number,
            recipe_number: chunk.recipe_number,
            status: ExtractionStatus::Pending,
            not_a_recipe: false,
            failed_attempts: 0,
            input_text: chunk.text.clone(),
        }
    }
}

/// An ingredient line belonging to a recipe
#[derive(Debug, Clone, Default)]
pub struct NewIngredient {
    pub original_string: String,
    pub product: Option<String>,
    /// The line points at another recipe ("see No. 12") instead of a food item
    pub cross_reference: bool,
    pub referenced_recipe_id: Option<i64>,
}

impl NewIngredient {
    pub fn product(original: impl Into<String>, product: impl Into<String>) -> Self {
        Self {
            original_string: original.into(),
            product: Some(product.into()),
            ..Default::default()
        }
    }
}
