//! *Cassell's Dictionary of Cookery* (1883).
//!
//! Arranged alphabetically under single-letter sections. Each entry opens
//! with a capitalised headword run into the text, `ALMOND CAKE.—Take …`,
//! sometimes with a French name in parentheses. Pages carry guide words
//! such as `ALM—ANC` at the top.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::RecipeChunk;
use crate::splitters::lines::{self, Boundary, Layout, PageNumbers};

lazy_static! {
    static ref SECTION_RE: Regex = Regex::new(r"^([A-Z])\.?$").unwrap();
    static ref HEADWORD_RE: Regex =
        Regex::new(r"^([A-Z][A-Z '&,-]{1,60}?)\s*(?:\([^)]*\))?\s*\.?\s*(?:[—–]+|--)\s*\S").unwrap();
    static ref GUIDE_WORDS_RE: Regex = Regex::new(r"^[A-Z]{2,}\s*[—–-]\s*[A-Z]{2,}\.?$").unwrap();
    static ref HEADER_RE: Regex =
        Regex::new(r"(?i)^(?:\d+\s+)?cassell'?s\s+dictionary\s+of\s+cookery\.?(?:\s+\d+)?$").unwrap();
}

fn is_noise(line: &str) -> bool {
    HEADER_RE.is_match(line) || GUIDE_WORDS_RE.is_match(line) || lines::is_page_number_line(line)
}

fn headword(line: &str) -> Option<&str> {
    if is_noise(line) {
        return None;
    }
    let word = HEADWORD_RE.captures(line)?.get(1)?.as_str().trim();
    (lines::is_all_caps_line(word) && !word.starts_with("ANOTHER")).then_some(word)
}

pub fn split(lines: &[&str]) -> Vec<RecipeChunk> {
    let Some(first_entry) = (0..lines.len()).find(|&i| headword(lines[i].trim()).is_some()) else {
        return Vec::new();
    };
    let stop = lines::find_index_heading(lines, first_entry + 1);
    let end = stop.unwrap_or(lines.len());

    let mut section = None;
    let mut boundaries = Vec::new();
    let mut cuts = Vec::new();
    for i in 0..end {
        let line = lines[i].trim();
        if let Some(caps) = SECTION_RE.captures(line) {
            section = Some(caps[1].to_string());
            cuts.push(i);
        } else if headword(line).is_some() && lines::follows_break(lines, i, &is_noise, &cuts) {
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
