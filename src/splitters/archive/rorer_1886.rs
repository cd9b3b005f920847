//! Sarah Tyson Rorer, *Mrs. Rorer's Philadelphia Cook Book* (1886).
//!
//! Section headings are capitals without punctuation; receipt titles are a
//! few title-case words, also unpunctuated, with the body directly below.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::RecipeChunk;
use crate::splitters::lines::{self, Boundary, Layout, PageNumbers};

lazy_static! {
    static ref SECTION_RE: Regex = Regex::new(r"^[A-Z][A-Z ,&'-]{2,50}$").unwrap();
    static ref HEADER_RE: Regex = Regex::new(
        r"^(?:\d+\s+)?(?:MRS\.?\s+RORER'?S\s+)?(?:NEW\s+)?PHILADELPHIA\s+COOK\s+BOOK\.?(?:\s+\d+)?$"
    )
    .unwrap();
}

const MAX_TITLE_WORDS: usize = 6;
const INDEX_WINDOW: usize = 6;

/// Words a title may leave in lower case
const MINOR_WORDS: &[&str] = &[
    "a", "an", "and", "the", "of", "with", "in", "on", "to", "or", "for", "from", "au", "aux",
    "la", "le", "de", "à",
];

fn is_noise(line: &str) -> bool {
    HEADER_RE.is_match(line) || lines::is_page_number_line(line)
}

fn is_section(line: &str) -> bool {
    SECTION_RE.is_match(line) && lines::is_all_caps_line(line) && !is_noise(line)
}

fn is_title_words(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() || words.len() > MAX_TITLE_WORDS {
        return false;
    }
    let unpunctuated = line
        .chars()
        .last()
        .map_or(false, |c| c.is_alphabetic() || c == ')');
    let capitalised = words.iter().enumerate().all(|(n, word)| {
        let first = word.chars().next().map_or(false, char::is_uppercase);
        first || (n > 0 && MINOR_WORDS.contains(word))
    });
    unpunctuated && capitalised && !lines::is_all_caps_line(line)
}

fn is_title(lines: &[&str], i: usize, cuts: &[usize]) -> bool {
    let line = lines[i].trim();
    let next = lines::collect_text_between(lines, i, Some(i + 2));
    let body_follows = !next.is_empty() && !is_noise(&next) && !is_section(&next);
    is_title_words(line) && body_follows && lines::follows_break(lines, i, &is_noise, cuts)
}

pub fn split(lines: &[&str]) -> Vec<RecipeChunk> {
    let stop = lines::find_confirmed_index_heading(lines, 0, INDEX_WINDOW);
    let end = stop.unwrap_or(lines.len());

    let mut section = None;
    let mut boundaries = Vec::new();
    let mut cuts = Vec::new();
    for i in 0..end {
        let line = lines[i].trim();
        if is_section(line) {
            section = lines::section_name(line);
            cuts.push(i);
        } else if is_title(lines, i, &cuts) {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> Vec<RecipeChunk> {
        let cleaned = lines::clean_ocr_text(text);
        split(&lines::split_lines(&cleaned))
    }

    #[test]
    fn test_title_words() {
        assert!(is_title_words("Cream of Celery Soup"));
        assert!(is_title_words("Consommé à la Royale"));
        assert!(!is_title_words("Put the bones in a kettle"));
        assert!(!is_title_words("Mock Turtle Soup."));
        assert!(!is_title_words("SOUPS"));
    }

    #[test]
    fn test_unpunctuated_titles() {
        let book = "MRS. RORER'S PHILADELPHIA COOK BOOK\n\nSOUPS\n\nCream of Celery Soup\n\
1 pint of milk\n1 head of celery\nBoil the celery until tender.\n\n— 40 —\n\n\
Mock Turtle Soup\n1 calf's head\nWash the head.\n\nFISH\n\nBaked Shad\nScale the fish.\n\n\
INDEX\nPAGE\nShad, 60\n";
        let chunks = run(book);
        let titles: Vec<&str> = chunks.iter().map(|c| c.title()).collect();
        assert_eq!(titles, vec!["Cream of Celery Soup", "Mock Turtle Soup", "Baked Shad"]);
        assert_eq!(chunks[0].section_header.as_deref(), Some("SOUPS"));
        assert_eq!(chunks[1].page_number, Some(40));
        assert_eq!(chunks[2].text, "Baked Shad\nScale the fish.");
        assert_eq!(chunks[2].section_header.as_deref(), Some("FISH"));
    }

    #[test]
    fn test_title_needs_body_directly_below() {
        let book = "SOUPS\n\nClear Soup\nBoil the stock.\n\nLeft Overs\n\nUse the scraps.\n\n\
Garnish Ideas\nFISH\nScale it.\n";
        let chunks = run(book);
        let titles: Vec<&str> = chunks.iter().map(|c| c.title()).collect();
        assert_eq!(titles, vec!["Clear Soup"]);
    }
}
