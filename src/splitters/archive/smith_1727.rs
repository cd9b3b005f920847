//! Eliza Smith, *The Compleat Housewife* (1727).
//!
//! Every receipt opens "To make …", "To dress …" and so on. The OCR often
//! reads *make* as *rnake* or splits *To*, so the verb list tolerates both.
//! The book closes with "THE TABLE" rather than an index.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::RecipeChunk;
use crate::splitters::lines::{self, Boundary, Layout, PageNumbers};

lazy_static! {
    static ref TITLE_RE: Regex = Regex::new(
        r"(?i)^t\s?o\s+(?:make|rnake|dress|roast|boil|pickle|stew|fry|bake|hash|collar|preserve|candy|dry|keep|pot|force|fricasey|ragoo|butter|souse|season)\b"
    )
    .unwrap();
    static ref STOP_RE: Regex = Regex::new(r"(?i)^(?:index|the\s+table)\.?$").unwrap();
    static ref HEADER_RE: Regex =
        Regex::new(r"(?i)^(?:\d+\s+)?the\s+compleat\s+house-?wife\.?(?:\s+\d+)?$").unwrap();
}

const MAX_TITLE_LEN: usize = 90;

fn is_noise(line: &str) -> bool {
    HEADER_RE.is_match(line) || lines::is_page_number_line(line)
}

fn is_title(lines: &[&str], i: usize, cuts: &[usize]) -> bool {
    let line = lines[i].trim();
    TITLE_RE.is_match(line)
        && line.len() <= MAX_TITLE_LEN
        && lines::follows_break(lines, i, &is_noise, cuts)
}

fn is_section(line: &str) -> bool {
    lines::is_all_caps_line(line) && !is_noise(line) && !TITLE_RE.is_match(line)
}

pub fn split(lines: &[&str]) -> Vec<RecipeChunk> {
    let Some(first_title) = (0..lines.len()).find(|&i| is_title(lines, i, &[])) else {
        return Vec::new();
    };
    let stop = (first_title + 1..lines.len()).find(|&i| STOP_RE.is_match(lines[i].trim()));
    let end = stop.unwrap_or(lines.len());

    let mut section = None;
    let mut boundaries = Vec::new();
    let mut cuts = Vec::new();
    for i in 0..end {
        let line = lines[i].trim();
        if is_title(lines, i, &cuts) {
            boundaries.push(Boundary::new(i, &section));
        } else if is_section(line) {
            section = lines::section_name(line);
            cuts.push(i);
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

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> Vec<RecipeChunk> {
        let cleaned = lines::clean_ocr_text(text);
        split(&lines::split_lines(&cleaned))
    }

    #[test]
    fn test_ocr_tolerant_titles() {
        let lines = vec!["To rnake a Plum Cake.", "", "T o dress a Pike.", "", "Todo list"];
        assert!(is_title(&lines, 0, &[]));
        assert!(is_title(&lines, 2, &[]));
        assert!(!is_title(&lines, 4, &[]));
    }

    #[test]
    fn test_split_until_table() {
        let book = "THE COMPLEAT HOUSEWIFE.\n\nSOUPS.\n\nTo make Gravy Soup.\nTake a leg of beef.\n\n\
[p. 14]\n\nTo rnake Peas Soup.\nTake a quart of peas.\n\nPUDDINGS.\nTO BAKE A RICE PUDDING.\n\
Boil the rice.\n\nTHE TABLE.\nSoups, 14\n";
        let chunks = run(book);
        let titles: Vec<&str> = chunks.iter().map(|c| c.title()).collect();
        assert_eq!(titles, vec!["To make Gravy Soup.", "To rnake Peas Soup.", "TO BAKE A RICE PUDDING."]);
        assert_eq!(chunks[0].section_header.as_deref(), Some("SOUPS"));
        assert_eq!(chunks[1].page_number, Some(14));
        assert_eq!(chunks[2].section_header.as_deref(), Some("PUDDINGS"));
        assert_eq!(chunks[2].text, "TO BAKE A RICE PUDDING.\nBoil the rice.");
    }
}
