pub mod archive;
pub mod gutenberg;
pub mod lines;
pub mod markup;
mod registry;

pub use registry::{preferred_strategy, StrategyRegistry};

use scraper::Html;

use crate::model::{RecipeChunk, SourceFormat};

/// A book-specific splitting algorithm.
///
/// Strategies are plain functions: they hold no state between calls, so the
/// same input always produces the same chunk list.
#[derive(Clone, Copy)]
pub enum Strategy {
    /// Works on the cleaned lines of an OCR text
    Ocr(fn(&[&str]) -> Vec<RecipeChunk>),
    /// Works on a parsed HTML document
    Markup(fn(&Html) -> Vec<RecipeChunk>),
}

impl Strategy {
    pub fn format(&self) -> SourceFormat {
        match self {
            Strategy::Ocr(_) => SourceFormat::Ocr,
            Strategy::Markup(_) => SourceFormat::Markup,
        }
    }

    /// Prepare the raw cached content for this strategy and run it.
    pub fn call(&self, raw: &str) -> Vec<RecipeChunk> {
        match self {
            Strategy::Ocr(split) => {
                let text = lines::clean_ocr_text(raw);
                let lines = lines::split_lines(&text);
                split(&lines)
            }
            Strategy::Markup(split) => {
                let document = markup::parse(raw);
                split(&document)
            }
        }
    }
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Ocr(_) => f.write_str("Strategy::Ocr"),
            Strategy::Markup(_) => f.write_str("Strategy::Markup"),
        }
    }
}
