//! Alexis Soyer, *A Shilling Cookery for the People* (1855).
//!
//! Receipts open with their name in small capitals (`span.smcap`) at the
//! start of an ordinary paragraph.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::model::RecipeChunk;
use crate::splitters::markup::{self, MarkupBoundary};

lazy_static! {
    static ref CONTINUATION_RE: Regex = Regex::new(r"(?i)^(?:another|ditto)\b").unwrap();
}

const MAX_TITLE_LEN: usize = 60;

fn small_caps_title(paragraph: ElementRef<'_>) -> Option<String> {
    let lead = markup::leading_element(paragraph)?;
    if markup::tag(&lead) != "span" || !markup::has_class(&lead, "smcap") {
        return None;
    }
    let title = markup::extract_text(lead);
    let is_title = !title.is_empty()
        && title.len() <= MAX_TITLE_LEN
        && !CONTINUATION_RE.is_match(&title)
        && !markup::is_index_heading(&title);
    is_title.then_some(title)
}

fn is_title(block: ElementRef<'_>) -> bool {
    markup::tag(&block) == "p" && small_caps_title(block).is_some()
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
