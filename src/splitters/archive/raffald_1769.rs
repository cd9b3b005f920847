//! Elizabeth Raffald, *The Experienced English Housekeeper* (1769).
//!
//! Chapters open with `CHAP. I.` and name their subject on the next line.
//! Every receipt is titled `To …` and the title sometimes wraps onto a second
//! line. "Another Way." variants belong to the receipt above them.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::RecipeChunk;
use crate::splitters::lines::{self, Boundary, Layout, PageNumbers};

lazy_static! {
    static ref CHAPTER_RE: Regex = Regex::new(r"^CHAP\.?\s+[IVXLC]+\.?$").unwrap();
    static ref TITLE_START_RE: Regex = Regex::new(r"^To\s+\S").unwrap();
    static ref ANOTHER_RE: Regex = Regex::new(r"(?i)^another\s+way\.?$").unwrap();
    static ref HEADER_RE: Regex = Regex::new(
        r"^(?:\d+\s+)?(?:THE\s+)?(?:EXPERIENCED\s+)?ENGLISH\s+HOUSE-?KEEPER\.?(?:\s+\d+)?$"
    )
    .unwrap();
}

const MAX_TITLE_LEN: usize = 80;
const MAX_WRAPPED_TITLE_LEN: usize = 120;
const INDEX_WINDOW: usize = 6;

fn is_noise(line: &str) -> bool {
    HEADER_RE.is_match(line) || lines::is_page_number_line(line)
}

pub fn split(lines: &[&str]) -> Vec<RecipeChunk> {
    let chapters = lines::find_boundaries(lines, &CHAPTER_RE);
    let Some(&start) = chapters.first() else {
        return Vec::new();
    };
    let stop = lines::find_confirmed_index_heading(lines, start, INDEX_WINDOW);
    let end = stop.unwrap_or(lines.len());

    let mut section = None;
    let mut boundaries = Vec::new();
    let mut cuts = Vec::new();
    let mut i = start;
    while i < end {
        let line = lines[i].trim();
        if chapters.binary_search(&i).is_ok() {
            cuts.push(i);
            match lines::next_non_blank(lines, i) {
                Some(name) if name < end => {
                    section = lines::section_name(lines[name]);
                    cuts.push(name);
                    i = name + 1;
                }
                _ => i += 1,
            }
            continue;
        }

        let candidate = TITLE_START_RE.is_match(line)
            && !ANOTHER_RE.is_match(line)
            && lines::follows_break(lines, i, &is_noise, &cuts);
        if candidate {
            if line.ends_with('.') && line.len() <= MAX_TITLE_LEN {
                boundaries.push(Boundary::new(i, &section));
            } else if let Some(next) = lines.get(i + 1).map(|l| l.trim()) {
                if !line.ends_with('.')
                    && next.ends_with('.')
                    && line.len() + next.len() < MAX_WRAPPED_TITLE_LEN
                {
                    boundaries.push(Boundary::new(i, &section));
                    i += 2;
                    continue;
                }
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
            pages: PageNumbers::Nearby,
        },
    )
}
