//! Eliza Acton, *Modern Cookery for Private Families* (1845).

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::model::RecipeChunk;
use crate::splitters::markup::{self, MarkupBoundary};

lazy_static! {
    static ref CHAPTER_RE: Regex = Regex::new(r"(?i)^chapter\s+[ivxlc]+\.?\s*(.*)$").unwrap();
    static ref ANOTHER_RE: Regex = Regex::new(r"(?i)^another\b").unwrap();
}

fn is_title(block: ElementRef<'_>) -> bool {
    if markup::tag(&block) != "h3" {
        return false;
    }
    let text = markup::extract_text(block);
    // "ANOTHER RECEIPT FOR …" is a variant of the receipt above
    !text.is_empty() && !ANOTHER_RE.is_match(&text) && !markup::is_index_heading(&text)
}

pub fn split(document: &Html) -> Vec<RecipeChunk> {
    let blocks = markup::blocks(document);
    let Some(first_title) = markup::first_landmark(&blocks, is_title) else {
        return Vec::new();
    };
    let stop = markup::find_index_block(&blocks, first_title + 1, &["h2"]);
    let end = stop.unwrap_or(blocks.len());

    let mut section = None;
    let mut boundaries = Vec::new();
    let mut cuts = Vec::new();
    for (i, block) in blocks[..end].iter().enumerate() {
        match markup::tag(block) {
            "h2" => {
                let text = markup::extract_text(*block);
                section = CHAPTER_RE
                    .captures(&text)
                    .and_then(|caps| markup::section_name(&caps[1]))
                    .or_else(|| markup::section_name(&text));
                cuts.push(i);
            }
            "h3" if is_title(*block) => {
                boundaries.push(MarkupBoundary::new(i, &section));
            }
            _ => {}
        }
    }

    markup::assemble_blocks(&blocks, &boundaries, &cuts, stop)
}
