//! Eliza Leslie, *Directions for Cookery* (1840).

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::RecipeChunk;
use crate::splitters::lines::{self, Boundary, Layout, PageNumbers};

lazy_static! {
    static ref CHAPTER_RE: Regex = Regex::new(r"^CHAPTER\s+[IVXLC]+\.?$").unwrap();
    static ref BOOK_HEADER_RE: Regex =
        Regex::new(r"^(?:(\d{1,4})\s+)?DIRECTIONS\s+FOR\s+COOKERY\.?(?:\s+(\d{1,4}))?$").unwrap();
    static ref LEADING_PAGE_HEAD_RE: Regex = Regex::new(r"^(\d{1,4})\s+[A-Z][A-Z ,.'&-]+$").unwrap();
    static ref TRAILING_PAGE_HEAD_RE: Regex = Regex::new(r"^[A-Z][A-Z ,.'&-]+\s+(\d{1,4})$").unwrap();
}

const MAX_TITLE_LEN: usize = 90;
const INDEX_WINDOW: usize = 6;

fn page_marker(line: &str) -> Option<u32> {
    for re in [&*BOOK_HEADER_RE, &*LEADING_PAGE_HEAD_RE, &*TRAILING_PAGE_HEAD_RE] {
        if let Some(caps) = re.captures(line) {
            if let Some(page) = caps.get(1).or_else(|| caps.get(2)) {
                return page.as_str().parse().ok();
            }
        }
    }
    lines::page_line_number(line)
}

fn is_noise(line: &str) -> bool {
    BOOK_HEADER_RE.is_match(line)
        || LEADING_PAGE_HEAD_RE.is_match(line)
        || TRAILING_PAGE_HEAD_RE.is_match(line)
        || lines::is_page_number_line(line)
}

fn is_caps_title(line: &str) -> bool {
    lines::is_all_caps_line(line)
        && line.len() <= MAX_TITLE_LEN
        && !CHAPTER_RE.is_match(line)
        && !is_noise(line)
}

pub fn split(lines: &[&str]) -> Vec<RecipeChunk> {
    let stop = lines::find_confirmed_index_heading(lines, 0, INDEX_WINDOW);
    let end = stop.unwrap_or(lines.len());

    let mut section = None;
    let mut boundaries = Vec::new();
    let mut cuts = Vec::new();
    let mut i = 0;
    while i < end {
        let line = lines[i].trim();
        if CHAPTER_RE.is_match(line) {
            cuts.push(i);
            if let Some(name) = lines::next_non_blank(lines, i).filter(|&name| name < end) {
                section = lines::section_name(lines[name]);
                cuts.push(name);
                i = name;
            }
        } else if is_caps_title(line) && lines::follows_break(lines, i, &is_noise, &cuts) {
            if line.ends_with('.') {
                boundaries.push(Boundary::new(i, &section));
            } else if lines
                .get(i + 1)
                .map(|next| next.trim())
                .map_or(false, |next| is_caps_title(next) && next.ends_with('.'))
            {
                boundaries.push(Boundary::new(i, &section));
                i += 1;
            }
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
            pages: PageNumbers::Carried(&page_marker),
        },
    )
}
