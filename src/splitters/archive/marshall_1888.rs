//! Agnes B. Marshall, *Mrs. A. B. Marshall's Cookery Book* (1888).
//!
//! Sections are roman-numbered (`IV.—SOUPS.`). Titles are in title case and
//! often followed by the French name in parentheses, which stays with the
//! receipt.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::RecipeChunk;
use crate::splitters::lines::{self, Boundary, Layout, PageNumbers};

lazy_static! {
    static ref SECTION_RE: Regex = Regex::new(r"^[IVXLC]+\.?\s*[—–-]+\s*(.+?)\.?$").unwrap();
    static ref BOOK_HEADER_RE: Regex = Regex::new(
        r"^(?:(\d{1,4})\s+)?MRS\.?\s+A\.\s*B\.\s*MARSHALL'?S\s+COOKERY\s+BOOK\.?(?:\s+(\d{1,4}))?$"
    )
    .unwrap();
    static ref LEADING_PAGE_HEAD_RE: Regex = Regex::new(r"^(\d{1,4})\s+[A-Z][A-Z ,.'&-]+$").unwrap();
    static ref TRAILING_PAGE_HEAD_RE: Regex = Regex::new(r"^[A-Z][A-Z ,.'&-]+\s+(\d{1,4})$").unwrap();
}

const MAX_TITLE_LEN: usize = 70;
const INDEX_WINDOW: usize = 6;

fn page_marker(line: &str) -> Option<u32> {
    [&*BOOK_HEADER_RE, &*LEADING_PAGE_HEAD_RE, &*TRAILING_PAGE_HEAD_RE]
        .iter()
        .find_map(|re| re.captures(line))
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .and_then(|page| page.as_str().parse().ok())
        .or_else(|| lines::page_line_number(line))
}

fn is_noise(line: &str) -> bool {
    page_marker(line).is_some() || BOOK_HEADER_RE.is_match(line)
}

/// Capitalised first word and every word of five letters or more capitalised.
fn is_title_case(line: &str) -> bool {
    let mut words = line.split_whitespace().peekable();
    let opens_upper = words
        .peek()
        .and_then(|word| word.chars().next())
        .map_or(false, char::is_uppercase);
    let word_count = line.split_whitespace().count();
    opens_upper
        && word_count >= 2
        && words.all(|word| {
            let letters = word.chars().filter(|c| c.is_alphabetic()).count();
            letters < 5
                || word
                    .chars()
                    .find(|c| c.is_alphabetic())
                    .map_or(true, char::is_uppercase)
        })
}

fn is_title(line: &str) -> bool {
    line.ends_with('.')
        && line.len() <= MAX_TITLE_LEN
        && !line.starts_with('(')
        && !lines::is_all_caps_line(line)
        && is_title_case(line)
}

pub fn split(lines: &[&str]) -> Vec<RecipeChunk> {
    let stop = lines::find_confirmed_index_heading(lines, 0, INDEX_WINDOW);
    let end = stop.unwrap_or(lines.len());

    let mut section = None;
    let mut boundaries = Vec::new();
    let mut cuts = Vec::new();
    for (i, raw) in lines[..end].iter().enumerate() {
        let line = raw.trim();
        if line.is_empty() || is_noise(line) {
            continue;
        }
        if lines::is_numbered_entry(line) {
            if let Some(caps) = SECTION_RE.captures(line) {
                section = lines::section_name(&caps[1]);
                cuts.push(i);
                continue;
            }
        }
        if is_title(line) && lines::follows_break(lines, i, &is_noise, &cuts) {
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
            pages: PageNumbers::Carried(&page_marker),
        },
    )
}
