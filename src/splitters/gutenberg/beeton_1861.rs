//! Isabella Beeton, *The Book of Household Management* (1861).
//!
//! A `CHAPTER N.` `h2` is followed by an `h3` naming the subject. Receipts
//! are numbered `h4` headings (`106. BROWN GRAVY.`); unnumbered `h4`
//! headings introduce essays on cuts, natural history and the like, and end
//! the receipt before them.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::Html;

use crate::model::RecipeChunk;
use crate::splitters::markup::{self, MarkupBoundary};

lazy_static! {
    static ref CHAPTER_RE: Regex = Regex::new(r"(?i)^chapter\s+[ivxlc]+\.?$").unwrap();
    static ref TITLE_RE: Regex = Regex::new(r"^(\d{1,4})\.\s*(?:[—–-]\s*)?(.+)$").unwrap();
}

fn numbered_title(text: &str) -> Option<u32> {
    let caps = TITLE_RE.captures(text)?;
    let title = &caps[2];
    let caps_only = title.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase)
        && title.chars().any(char::is_alphabetic);
    if caps_only {
        caps[1].parse().ok()
    } else {
        None
    }
}

pub fn split(document: &Html) -> Vec<RecipeChunk> {
    let blocks = markup::blocks(document);
    let first_title = markup::first_landmark(&blocks, |block| {
        markup::tag(&block) == "h4" && numbered_title(&markup::extract_text(block)).is_some()
    });
    let Some(first_title) = first_title else {
        return Vec::new();
    };
    let stop = markup::find_index_block(&blocks, first_title + 1, &["h2"]);
    let end = stop.unwrap_or(blocks.len());

    let mut section = None;
    let mut boundaries = Vec::new();
    let mut cuts = Vec::new();
    let mut i = 0;
    while i < end {
        let block = blocks[i];
        match markup::tag(&block) {
            "h2" => {
                cuts.push(i);
                let text = markup::extract_text(block);
                if !CHAPTER_RE.is_match(&text) {
                    section = markup::section_name(&text);
                } else if let Some(subject) = blocks
                    .get(i + 1)
                    .filter(|next| i + 1 < end && markup::tag(next) == "h3")
                {
                    section = markup::section_name(&markup::extract_text(*subject));
                    cuts.push(i + 1);
                    i += 1;
                }
            }
            "h3" => cuts.push(i),
            "h4" => match numbered_title(&markup::extract_text(block)) {
                Some(number) => boundaries.push(MarkupBoundary::numbered(i, &section, Some(number))),
                None => cuts.push(i),
            },
            _ => {}
        }
        i += 1;
    }

    markup::assemble_blocks(&blocks, &boundaries, &cuts, stop)
}
