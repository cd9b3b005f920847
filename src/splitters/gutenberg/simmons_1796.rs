//! Amelia Simmons, *American Cookery* (1796).
//!
//! The shortest book of the corpus. Receipt titles are whole paragraphs set
//! in bold, some numbered (`No. 3`), and the text closes with "FINIS." when
//! there is no index.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::model::RecipeChunk;
use crate::splitters::markup::{self, MarkupBoundary};

lazy_static! {
    static ref STOP_RE: Regex = Regex::new(r"(?i)^(?:(?:general\s+)?index|finis)\.?$").unwrap();
    static ref NUMBER_RE: Regex = Regex::new(r"No\.\s*(\d{1,4})").unwrap();
}

const MAX_TITLE_LEN: usize = 80;

fn bold_title(paragraph: ElementRef<'_>) -> Option<String> {
    let lead = markup::leading_element(paragraph)?;
    if !matches!(markup::tag(&lead), "b" | "strong") {
        return None;
    }
    let title = markup::extract_text(lead);
    let whole = !title.is_empty()
        && title.len() <= MAX_TITLE_LEN
        && title == markup::extract_text(paragraph)
        && !STOP_RE.is_match(&title);
    whole.then_some(title)
}

pub fn split(document: &Html) -> Vec<RecipeChunk> {
    let blocks = markup::blocks(document);
    let first_title = markup::first_landmark(&blocks, |block| {
        markup::tag(&block) == "p" && bold_title(block).is_some()
    });
    let Some(first_title) = first_title else {
        return Vec::new();
    };
    let stop = (first_title + 1..blocks.len()).find(|&i| {
        markup::tag(&blocks[i]) == "h2" && STOP_RE.is_match(&markup::extract_text(blocks[i]))
    });
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
            "p" => {
                if let Some(title) = bold_title(*block) {
                    let number = NUMBER_RE
                        .captures(&title)
                        .and_then(|caps| caps[1].parse().ok());
                    boundaries.push(MarkupBoundary::numbered(i, &section, number));
                }
            }
            _ => {}
        }
    }

    markup::assemble_blocks(&blocks, &boundaries, &cuts, stop)
}
