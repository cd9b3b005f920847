//! Meg Dods (Christian Isobel Johnstone), *The Cook and Housewife's Manual* (1826).
//!
//! Titles run into their receipt on the same line, `Scotch Broth.—Take …`.
//! Observations and variants use the same shape and stay with the receipt
//! above them.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::RecipeChunk;
use crate::splitters::lines::{self, Boundary, Layout, PageNumbers};

lazy_static! {
    static ref CHAPTER_RE: Regex = Regex::new(r"^CHAPTER\s+[IVXLC]+\.?$").unwrap();
    static ref INLINE_TITLE_RE: Regex =
        Regex::new(r"^([A-Z][^.—–]{1,60}?)\.\s*(?:[—–]+|--)\s*\S").unwrap();
    static ref CONTINUATION_RE: Regex =
        Regex::new(r"(?i)^(?:obs|another\s+way|another|ditto|or|n\.\s*b|note)$").unwrap();
    static ref HEADER_RE: Regex = Regex::new(
        r"^(?:\d+\s+)?(?:THE\s+)?COOK\s+AND\s+HOUSEWIFE'?S\s+MANUAL\.?(?:\s+\d+)?$"
    )
    .unwrap();
}

fn is_noise(line: &str) -> bool {
    HEADER_RE.is_match(line) || lines::is_page_number_line(line)
}

fn inline_title(line: &str) -> Option<&str> {
    INLINE_TITLE_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|title| title.as_str().trim())
        .filter(|title| !CONTINUATION_RE.is_match(title))
}

pub fn split(lines: &[&str]) -> Vec<RecipeChunk> {
    let Some(first_chapter) = lines.iter().position(|line| CHAPTER_RE.is_match(line.trim())) else {
        return Vec::new();
    };
    let stop = lines::find_index_heading(lines, first_chapter + 1);
    let end = stop.unwrap_or(lines.len());

    let mut section = None;
    let mut boundaries = Vec::new();
    let mut cuts = Vec::new();
    let mut i = first_chapter;
    while i < end {
        let line = lines[i].trim();
        if CHAPTER_RE.is_match(line) {
            cuts.push(i);
            if let Some(name) = lines::next_non_blank(lines, i).filter(|&name| name < end) {
                section = lines::section_name(lines[name]);
                cuts.push(name);
                i = name;
            }
        } else if inline_title(line).is_some() && lines::follows_break(lines, i, &is_noise, &cuts) {
            boundaries.push(Boundary::new(i, &section));
        }
        i += 1;
    }

    lines::assemble(
        lines,
        &boundaries,
        &Layout {
            cuts: &cuts,
            stop,
            is_noise: &is_noise,
            pages: PageNumbers::Nearby,
        },
    )
}
