//! Lydia Maria Child, *The American Frugal Housewife* (1829).
//!
//! Sections are capitalised headings. Receipts carry short mixed-case titles
//! ending in a full stop, with the body starting on the very next line.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::RecipeChunk;
use crate::splitters::lines::{self, Boundary, Layout, PageNumbers};

lazy_static! {
    static ref SECTION_RE: Regex = Regex::new(r"^[A-Z][A-Z ,&'-]{2,50}\.?$").unwrap();
    static ref TITLE_RE: Regex = Regex::new(r"^[A-Z][^.]{1,58}\.$").unwrap();
    static ref CONTINUATION_RE: Regex = Regex::new(r"(?i)^(?:another(?:\s+way)?|ditto)\.?$").unwrap();
    static ref HEADER_RE: Regex =
        Regex::new(r"^(?:\d+\s+)?(?:THE\s+)?AMERICAN\s+FRUGAL\s+HOUSEWIFE\.?(?:\s+\d+)?$").unwrap();
}

const MAX_TITLE_WORDS: usize = 8;

fn is_noise(line: &str) -> bool {
    HEADER_RE.is_match(line) || lines::is_page_number_line(line)
}

fn is_section(line: &str) -> bool {
    SECTION_RE.is_match(line) && lines::is_all_caps_line(line) && !is_noise(line)
}

/// Title shape with its body on the next line; the caller checks the break above.
fn is_title_line(lines: &[&str], i: usize) -> bool {
    let line = lines[i].trim();
    if !TITLE_RE.is_match(line)
        || lines::is_all_caps_line(line)
        || CONTINUATION_RE.is_match(line)
        || line.split_whitespace().count() > MAX_TITLE_WORDS
    {
        return false;
    }
    let body_follows = lines
        .get(i + 1)
        .map(|next| next.trim())
        .map_or(false, |next| !next.is_empty() && !is_noise(next));
    body_follows
}

pub fn split(lines: &[&str]) -> Vec<RecipeChunk> {
    let first_title = (0..lines.len())
        .find(|&i| is_title_line(lines, i) && lines::starts_paragraph(lines, i, &is_noise));
    let Some(first_title) = first_title else {
        return Vec::new();
    };
    let stop = lines::find_index_heading(lines, first_title + 1);
    let end = stop.unwrap_or(lines.len());

    let mut section = None;
    let mut boundaries = Vec::new();
    let mut cuts = Vec::new();
    for i in 0..end {
        let line = lines[i].trim();
        if is_section(line) {
            section = lines::section_name(line);
            cuts.push(i);
        } else if is_title_line(lines, i) && lines::follows_break(lines, i, &is_noise, &cuts) {
            boundaries.push(Boundary::new(i, &section));
        }
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
