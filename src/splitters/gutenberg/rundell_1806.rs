//! Maria Rundell, *A New System of Domestic Cookery* (1806).
//!
//! Receipts have no headings of their own: a paragraph opening with an
//! italic title (`<i>To boil Cod.</i>—Put it …`) starts a receipt. Sections
//! are `h3` headings.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::model::RecipeChunk;
use crate::splitters::markup::{self, MarkupBoundary};

lazy_static! {
    static ref CONTINUATION_RE: Regex = Regex::new(r"(?i)^(?:another\s+way|ditto)\.?$").unwrap();
}

const MAX_TITLE_LEN: usize = 80;

fn italic_title(paragraph: ElementRef<'_>) -> Option<String> {
    let lead = markup::leading_element(paragraph)?;
    if !matches!(markup::tag(&lead), "i" | "em") {
        return None;
    }
    let title = markup::extract_text(lead);
    let is_title = title.ends_with('.')
        && title.len() <= MAX_TITLE_LEN
        && !CONTINUATION_RE.is_match(&title)
        && !markup::is_index_heading(&title);
    is_title.then_some(title)
}

fn is_title(block: ElementRef<'_>) -> bool {
    markup::tag(&block) == "p" && italic_title(block).is_some()
}

pub fn split(document: &Html) -> Vec<RecipeChunk> {
    let blocks = markup::blocks(document);
    let Some(first_title) = markup::first_landmark(&blocks, is_title) else {
        return Vec::new();
    };
    let stop = markup::find_index_block(&blocks, first_title + 1, &["h2", "h3"]);
    let end = stop.unwrap_or(blocks.len());

    let mut section = None;
    let mut boundaries = Vec::new();
    let mut cuts = Vec::new();
    for (i, block) in blocks[..end].iter().enumerate() {
        match markup::tag(block) {
            "h2" | "h3" => {
                section = markup::section_name(&markup::extract_text(*block));
                cuts.push(i);
            }
            "p" if is_title(*block) => {
                boundaries.push(MarkupBoundary::new(i, &section));
            }
            _ => {}
        }
    }

    markup::assemble_blocks(&blocks, &boundaries, &cuts, stop)
}
