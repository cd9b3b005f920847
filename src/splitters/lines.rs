//! Line-level primitives for OCR books.
//!
//! None of these functions fail: absence is `None` or an empty string, so
//! strategies can call them freely.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::model::RecipeChunk;

lazy_static! {
    static ref BRACKET_PAGE_RE: Regex = Regex::new(r"\[[Pp]\.\s*(\d{1,4})\]").unwrap();
    static ref BRACKET_PAGE_LINE_RE: Regex = Regex::new(r"^\[[Pp]\.\s*\d{1,4}\]$").unwrap();
    static ref DASH_PAGE_RE: Regex = Regex::new(r"^[—–-]+\s*(\d{1,4})\s*[—–-]+$").unwrap();
    static ref BARE_PAGE_RE: Regex = Regex::new(r"^(\d{1,4})$").unwrap();
    static ref NUMBERED_ENTRY_RE: Regex = Regex::new(
        r"^(?:\d+\.\s|No\.\s*\d+|[IVXLCDM]+\.?\s*[—–-]|[IVXLCDM]+\.\s+[A-Z])"
    )
    .unwrap();
    static ref INDEX_HEADING_RE: Regex =
        Regex::new(r"(?i)^(?:general\s+|alphabetical\s+)?index\.?$").unwrap();
    static ref PAGE_COLUMN_RE: Regex = Regex::new(r"^(?:PAGE|Page)\.?$").unwrap();
    static ref INLINE_WS_RE: Regex = Regex::new(r"[ \t\x0C\u{A0}]+").unwrap();
    static ref BLANK_RUN_RE: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// How far above a boundary `find_page_number` looks
const PAGE_LOOKBACK: usize = 5;

/// Split cleaned text into physical lines.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

/// Every line index whose trimmed content matches `pattern`.
pub fn find_boundaries(lines: &[&str], pattern: &Regex) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| pattern.is_match(line.trim()))
        .map(|(idx, _)| idx)
        .collect()
}

/// Lines `start..end` (or to the end of the book) joined with newlines, trimmed.
pub fn collect_chunk(lines: &[&str], start: usize, end: Option<usize>) -> String {
    let end = end.unwrap_or(lines.len()).min(lines.len());
    if start >= end {
        return String::new();
    }
    lines[start..end].join("\n").trim().to_string()
}

/// Like [`collect_chunk`] but leaves out the line at `start`.
pub fn collect_text_between(lines: &[&str], start: usize, end: Option<usize>) -> String {
    collect_chunk(lines, start + 1, end)
}

/// At least three letters and every letter upper case.
pub fn is_all_caps_line(line: &str) -> bool {
    let mut letters = 0;
    for c in line.chars().filter(|c| c.is_alphabetic()) {
        if !c.is_uppercase() {
            return false;
        }
        letters += 1;
    }
    letters >= 3
}

/// `1. `, `No. 1`, `IV.—` or `IV. Capital` at the start of the line.
pub fn is_numbered_entry(line: &str) -> bool {
    NUMBERED_ENTRY_RE.is_match(line.trim())
}

/// A line that holds nothing but a page number marker.
pub fn is_page_number_line(line: &str) -> bool {
    let line = line.trim();
    BARE_PAGE_RE.is_match(line) || DASH_PAGE_RE.is_match(line) || BRACKET_PAGE_LINE_RE.is_match(line)
}

/// The number on a page-number line, `None` for any other line.
pub fn page_line_number(line: &str) -> Option<u32> {
    if is_page_number_line(line) {
        page_marker(line)
    } else {
        None
    }
}

fn page_marker(line: &str) -> Option<u32> {
    let line = line.trim();
    BRACKET_PAGE_RE
        .captures(line)
        .or_else(|| DASH_PAGE_RE.captures(line))
        .or_else(|| BARE_PAGE_RE.captures(line))
        .and_then(|caps| caps[1].parse().ok())
}

/// Page number nearest above `idx`: the boundary line itself first, then up to
/// five lines upwards. Recognises `[p. N]`, `— N —` and bare numeric lines.
pub fn find_page_number(lines: &[&str], idx: usize) -> Option<u32> {
    if idx >= lines.len() {
        return None;
    }
    (idx.saturating_sub(PAGE_LOOKBACK)..=idx)
        .rev()
        .find_map(|i| page_marker(lines[i]))
}

/// Normalise line endings, squeeze inline whitespace and collapse blank runs.
///
/// Archaic typography (long s, ligatures) is left alone for the extraction
/// model to read.
pub fn clean_ocr_text(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let squeezed = normalized
        .lines()
        .map(|line| INLINE_WS_RE.replace_all(line, " ").trim().to_string())
        .collect::<Vec<_>>()
        .join("\n");
    BLANK_RUN_RE
        .replace_all(&squeezed, "\n\n")
        .trim()
        .to_string()
}

/// True when the closest non-noise line above `idx` is blank, or there is none.
pub fn starts_paragraph(lines: &[&str], idx: usize, is_noise: &dyn Fn(&str) -> bool) -> bool {
    follows_break(lines, idx, is_noise, &[])
}

/// Like [`starts_paragraph`], but a heading line listed in `cuts` directly
/// above also counts as a break.
pub fn follows_break(
    lines: &[&str],
    idx: usize,
    is_noise: &dyn Fn(&str) -> bool,
    cuts: &[usize],
) -> bool {
    for i in (0..idx.min(lines.len())).rev() {
        let line = lines[i].trim();
        if line.is_empty() || cuts.contains(&i) {
            return true;
        }
        if !is_noise(line) {
            return false;
        }
    }
    true
}

/// Index of the first non-blank line after `idx`.
pub fn next_non_blank(lines: &[&str], idx: usize) -> Option<usize> {
    (idx + 1..lines.len()).find(|&i| !lines[i].trim().is_empty())
}

/// First `INDEX` heading at or after `from`.
pub fn find_index_heading(lines: &[&str], from: usize) -> Option<usize> {
    (from..lines.len()).find(|&i| INDEX_HEADING_RE.is_match(lines[i].trim()))
}

/// First `INDEX` heading at or after `from` that has a `PAGE` column header
/// within `window` lines below it. Table-of-contents mentions of the index
/// have no such header and are skipped.
pub fn find_confirmed_index_heading(lines: &[&str], from: usize, window: usize) -> Option<usize> {
    let mut cursor = from;
    while let Some(idx) = find_index_heading(lines, cursor) {
        let end = (idx + 1 + window).min(lines.len());
        if lines[idx + 1..end]
            .iter()
            .any(|line| PAGE_COLUMN_RE.is_match(line.trim()))
        {
            return Some(idx);
        }
        cursor = idx + 1;
    }
    None
}

/// A detected recipe start in an OCR line array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    pub line: usize,
    pub section: Option<String>,
    pub recipe_number: Option<u32>,
}

impl Boundary {
    pub fn new(line: usize, section: &Option<String>) -> Self {
        Self {
            line,
            section: section.clone(),
            recipe_number: None,
        }
    }

    pub fn numbered(line: usize, section: &Option<String>, recipe_number: Option<u32>) -> Self {
        Self {
            line,
            section: section.clone(),
            recipe_number,
        }
    }
}

/// Where a chunk's page number comes from
pub enum PageNumbers<'a> {
    /// [`find_page_number`] around the title line
    Nearby,
    /// Closest book-specific marker anywhere above the title line
    Carried(&'a dyn Fn(&str) -> Option<u32>),
}

/// Book-specific knobs for [`assemble`]
pub struct Layout<'a> {
    /// Section heading lines; a chunk never runs past one
    pub cuts: &'a [usize],
    /// Back-matter line; nothing at or after it is emitted
    pub stop: Option<usize>,
    /// Running headers, page numbers and other typographic artifacts
    pub is_noise: &'a dyn Fn(&str) -> bool,
    pub pages: PageNumbers<'a>,
}

/// Turn detected boundaries into chunks.
///
/// A chunk runs from its boundary to the next boundary, cut or stop line.
/// Noise lines are dropped from the text and blank chunks are skipped.
pub fn assemble(lines: &[&str], boundaries: &[Boundary], layout: &Layout<'_>) -> Vec<RecipeChunk> {
    let stop = layout.stop.unwrap_or(lines.len()).min(lines.len());
    let mut chunks = Vec::with_capacity(boundaries.len());

    for (i, boundary) in boundaries.iter().enumerate() {
        if boundary.line >= stop {
            break;
        }
        let next = boundaries
            .get(i + 1)
            .map_or(stop, |b| b.line)
            .min(stop);
        let end = layout
            .cuts
            .iter()
            .copied()
            .filter(|&cut| cut > boundary.line)
            .min()
            .map_or(next, |cut| cut.min(next));

        let text = strip_noise(&lines[boundary.line..end], layout.is_noise);
        if text.is_empty() {
            debug!("Dropping empty chunk at line {}", boundary.line);
            continue;
        }

        let page_number = match &layout.pages {
            PageNumbers::Nearby => find_page_number(lines, boundary.line),
            PageNumbers::Carried(marker) => lines[..=boundary.line]
                .iter()
                .rev()
                .find_map(|line| marker(line.trim())),
        };

        chunks.push(RecipeChunk {
            text,
            section_header: boundary.section.clone(),
            page_number,
            recipe_number: boundary.recipe_number,
        });
    }

    chunks
}

fn strip_noise(span: &[&str], is_noise: &dyn Fn(&str) -> bool) -> String {
    let mut kept: Vec<&str> = Vec::with_capacity(span.len());
    for line in span {
        let line = line.trim();
        if !line.is_empty() && is_noise(line) {
            continue;
        }
        if line.is_empty() && kept.last().map_or(true, |last| last.is_empty()) {
            continue;
        }
        kept.push(line);
    }
    collect_chunk(&kept, 0, None)
}

/// Section name from a heading line: surrounding whitespace and a trailing
/// full stop removed. Empty names become `None`.
pub fn section_name(line: &str) -> Option<String> {
    let name = line.trim().trim_end_matches('.').trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
