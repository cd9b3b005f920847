//! *Warne's Model Cookery and Housekeeping Book* (1868).
//!
//! Receipts are numbered through the whole book, `212. HARICOT MUTTON.`, and
//! the running head `WARNE'S MODEL COOKERY.` carries the page number.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::RecipeChunk;
use crate::splitters::lines::{self, Boundary, Layout, PageNumbers};

lazy_static! {
    static ref CHAPTER_RE: Regex =
        Regex::new(r"^CHAPTER\s+[IVXLC]+\.?\s*(?:[—–-]+\s*(.*?))?\.?$").unwrap();
    static ref TITLE_RE: Regex = Regex::new(r"^(\d{1,4})\.\s+(.+)$").unwrap();
    static ref HEADER_RE: Regex =
        Regex::new(r"^(?:(\d{1,4})\s+)?WARNE'?S\s+MODEL\s+COOKERY\.?(?:\s+(\d{1,4}))?$").unwrap();
}

const INDEX_WINDOW: usize = 6;

fn page_marker(line: &str) -> Option<u32> {
    HEADER_RE
        .captures(line)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .and_then(|page| page.as_str().parse().ok())
        .or_else(|| lines::page_line_number(line))
}

fn is_noise(line: &str) -> bool {
    HEADER_RE.is_match(line) || lines::is_page_number_line(line)
}

fn numbered_title(line: &str) -> Option<u32> {
    if !lines::is_numbered_entry(line) {
        return None;
    }
    let caps = TITLE_RE.captures(line)?;
    if lines::is_all_caps_line(&caps[2]) {
        caps[1].parse().ok()
    } else {
        None
    }
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
        if let Some(caps) = CHAPTER_RE.captures(line) {
            cuts.push(i);
            match caps.get(1).and_then(|name| lines::section_name(name.as_str())) {
                Some(name) => section = Some(name),
                None => {
                    if let Some(next) = lines::next_non_blank(lines, i).filter(|&next| next < end) {
                        section = lines::section_name(lines[next]);
                        cuts.push(next);
                        i = next;
                    }
                }
            }
        } else if let Some(number) = numbered_title(line) {
            boundaries.push(Boundary::numbered(i, &section, Some(number)));
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

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> Vec<RecipeChunk> {
        let cleaned = lines::clean_ocr_text(text);
        split(&lines::split_lines(&cleaned))
    }

    #[test]
    fn test_numbered_titles() {
        assert_eq!(numbered_title("212. HARICOT MUTTON."), Some(212));
        assert_eq!(numbered_title("3. Put it into the oven."), None);
        assert_eq!(numbered_title("HARICOT MUTTON."), None);
    }

    #[test]
    fn test_chapters_and_carried_pages() {
        let book = "CHAPTER I.—SOUPS.\n\n1. GRAVY SOUP.\nTake two pounds of beef.\n\
2. Strain and serve.\n\n18 WARNE'S MODEL COOKERY.\n\n2. PEA SOUP.\nSoak the peas.\n\n\
CHAPTER II.\n\nFISH.\n\n3. BOILED COD.\nPut the cod into water.\n\nINDEX.\n\nPAGE\nCod, 19\n";
        let chunks = run(book);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].recipe_number, Some(1));
        assert_eq!(chunks[0].section_header.as_deref(), Some("SOUPS"));
        assert!(chunks[0].text.contains("2. Strain and serve."));
        assert_eq!(chunks[0].page_number, None);
        assert_eq!(chunks[1].recipe_number, Some(2));
        assert_eq!(chunks[1].page_number, Some(18));
        assert_eq!(chunks[2].section_header.as_deref(), Some("FISH"));
        assert_eq!(chunks[2].recipe_number, Some(3));
        assert_eq!(chunks[2].page_number, Some(18));
    }
}
