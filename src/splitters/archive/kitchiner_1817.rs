//! William Kitchiner, *The Cook's Oracle* (1817).
//!
//! Receipts are numbered in the title itself, `Beef Steaks.—(No. 94.)`.
//! Running heads carry the page number beside the book or section name, so
//! pages are carried forward from the last head seen.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::RecipeChunk;
use crate::splitters::lines::{self, Boundary, Layout, PageNumbers};

lazy_static! {
    static ref TITLE_RE: Regex =
        Regex::new(r"^(.{3,80}?)[\s.,]*(?:[—–-]+\s*)?\(No\.\s*(\d{1,4})\.?\)\.?$").unwrap();
    static ref SECTION_RE: Regex = Regex::new(r"^[A-Z][A-Z ,&'-]{2,50}\.$").unwrap();
    static ref BOOK_HEADER_RE: Regex =
        Regex::new(r"^(?:(\d{1,4})\s+)?(?:THE\s+)?COOK'?S\s+ORACLE\.?(?:\s+(\d{1,4}))?$").unwrap();
    static ref LEADING_PAGE_HEAD_RE: Regex = Regex::new(r"^(\d{1,4})\s+[A-Z][A-Z ,.'&-]+$").unwrap();
    static ref TRAILING_PAGE_HEAD_RE: Regex = Regex::new(r"^[A-Z][A-Z ,.'&-]+\s+(\d{1,4})$").unwrap();
}

const INDEX_WINDOW: usize = 6;

fn running_head_page(line: &str) -> Option<u32> {
    [&*BOOK_HEADER_RE, &*LEADING_PAGE_HEAD_RE, &*TRAILING_PAGE_HEAD_RE]
        .iter()
        .find_map(|re| re.captures(line))
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .and_then(|m| m.as_str().parse().ok())
}

fn page_marker(line: &str) -> Option<u32> {
    running_head_page(line).or_else(|| lines::page_line_number(line))
}

fn is_noise(line: &str) -> bool {
    BOOK_HEADER_RE.is_match(line)
        || LEADING_PAGE_HEAD_RE.is_match(line)
        || TRAILING_PAGE_HEAD_RE.is_match(line)
        || lines::is_page_number_line(line)
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
        if let Some(caps) = TITLE_RE.captures(line) {
            if lines::follows_break(lines, i, &is_noise, &cuts) {
                let number = caps[2].parse().ok();
                boundaries.push(Boundary::numbered(i, &section, number));
            }
        } else if SECTION_RE.is_match(line) && lines::is_all_caps_line(line) {
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
    fn test_numbered_titles_and_carried_pages() {
        let book = "THE COOK'S ORACLE.\n\nCONTENTS.\nINDEX\n\n\
156 THE COOK'S ORACLE.\n\nBOILING.\n\nLeg of Mutton.—(No. 1.)\nLet it hang four days.\n\n\
Obs.—Mutton wants no washing.\n\nROASTING 157\n\nROASTING.\n\nBeef Steaks.—(No. 94.)\n\
Cut them half an inch thick.\n\nSauce for Steaks (No. 95).\nButter and walnut ketchup.\n\n\
INDEX.\n\nPAGE\nBeef, 94\n";
        let chunks = run(book);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].recipe_number, Some(1));
        assert_eq!(chunks[0].section_header.as_deref(), Some("BOILING"));
        assert_eq!(chunks[0].page_number, Some(156));
        assert!(chunks[0].text.ends_with("Obs.—Mutton wants no washing."));
        assert_eq!(chunks[1].recipe_number, Some(94));
        assert_eq!(chunks[1].section_header.as_deref(), Some("ROASTING"));
        assert_eq!(chunks[1].page_number, Some(157));
        assert_eq!(chunks[2].recipe_number, Some(95));
        assert_eq!(chunks[2].title(), "Sauce for Steaks (No. 95).");
    }

    #[test]
    fn test_running_heads_are_noise() {
        assert!(is_noise("156 THE COOK'S ORACLE."));
        assert!(is_noise("ROASTING 157"));
        assert!(!is_noise("ROASTING."));
        assert_eq!(page_marker("— 12 —"), Some(12));
    }
}
