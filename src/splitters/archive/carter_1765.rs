//! Susannah Carter, *The Frugal Housewife* (1765).
//!
//! Chapter and subject share one line (`CHAP. III. Of Soups.`). Receipt
//! titles are set in capitals and may wrap.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::RecipeChunk;
use crate::splitters::lines::{self, Boundary, Layout, PageNumbers};

lazy_static! {
    static ref CHAPTER_RE: Regex = Regex::new(r"^CHAP\.?\s+[IVXLC]+\.\s*(.+?)\.?$").unwrap();
    static ref ANOTHER_RE: Regex = Regex::new(r"^ANOTHER\s+WAY\.?$").unwrap();
    static ref HEADER_RE: Regex =
        Regex::new(r"^(?:\d+\s+)?THE\s+FRUGAL\s+HOUSEWIFE\.?(?:\s+\d+)?$").unwrap();
}

const MAX_TITLE_LEN: usize = 90;

fn is_noise(line: &str) -> bool {
    HEADER_RE.is_match(line) || lines::is_page_number_line(line)
}

fn is_title_line(line: &str) -> bool {
    lines::is_all_caps_line(line) && !ANOTHER_RE.is_match(line) && !CHAPTER_RE.is_match(line)
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
        if let Some(caps) = CHAPTER_RE.captures(line) {
            section = lines::section_name(&caps[1]);
            cuts.push(i);
            i += 1;
            continue;
        }
        if is_noise(line)
            || !is_title_line(line)
            || line.len() > MAX_TITLE_LEN
            || !lines::follows_break(lines, i, &is_noise, &cuts)
        {
            i += 1;
            continue;
        }

        if line.ends_with('.') {
            boundaries.push(Boundary::new(i, &section));
        } else {
            let wrapped = lines
                .get(i + 1)
                .map(|next| next.trim())
                .filter(|next| is_title_line(next) && next.ends_with('.'));
            if wrapped.is_some() {
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
    fn test_split_caps_titles() {
        let book = "THE FRUGAL HOUSEWIFE.\nINDEX\n\nCHAP. I. Of Roasting.\n\nTO ROAST A PIG.\n\
Spit your pig and lay it to the fire.\n\nANOTHER WAY.\nBake it in a pan.\n\n12\n\
THE FRUGAL HOUSEWIFE.\n\nTO ROAST A HARE WITH\nA PUDDING IN THE BELLY.\nCase your hare.\n\n\
CHAP. II. Of Soups.\nTO MAKE PEAS SOUP.\nBoil a quart of peas.\n\nINDEX.\nPeas soup, 30\n";
        let chunks = run(book);
        let titles: Vec<&str> = chunks.iter().map(|c| c.title()).collect();
        assert_eq!(titles, vec!["TO ROAST A PIG.", "TO ROAST A HARE WITH", "TO MAKE PEAS SOUP."]);
        assert!(chunks[0].text.contains("ANOTHER WAY."));
        assert!(!chunks[0].text.contains("FRUGAL"));
        assert_eq!(chunks[0].section_header.as_deref(), Some("Of Roasting"));
        assert_eq!(chunks[1].page_number, Some(12));
        assert_eq!(chunks[2].section_header.as_deref(), Some("Of Soups"));
        assert_eq!(chunks[2].text, "TO MAKE PEAS SOUP.\nBoil a quart of peas.");
    }
}
