//! Fannie Merritt Farmer, *The Boston Cooking-School Cook Book* (1896).
//!
//! Chapters are `h2` headings, receipts `h3` headings. The edition keeps
//! each chapter in its own wrapper, so a receipt body is gathered from the
//! title's following siblings rather than from the flattened block list.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::model::RecipeChunk;
use crate::splitters::markup::{self, MarkupBoundary};

lazy_static! {
    static ref CHAPTER_PREFIX_RE: Regex = Regex::new(r"(?i)^chapter\s+[ivxlc]+\.?\s*").unwrap();
}

fn is_title(block: ElementRef<'_>) -> bool {
    if markup::tag(&block) != "h3" {
        return false;
    }
    let text = markup::extract_text(block);
    !text.is_empty() && !markup::is_index_heading(&text)
}

pub fn split(document: &Html) -> Vec<RecipeChunk> {
    let blocks = markup::blocks(document);
    let Some(first_title) = markup::first_landmark(&blocks, is_title) else {
        return Vec::new();
    };
    let stop = markup::find_index_block(&blocks, first_title + 1, &["h2"]);
    let end = stop.unwrap_or(blocks.len());

    let mut section = None;
    let mut boundaries = Vec::new();
    let mut cuts = Vec::new();
    for (i, block) in blocks[..end].iter().enumerate() {
        match markup::tag(block) {
            "h2" => {
                let text = markup::extract_text(*block);
                section = markup::section_name(&CHAPTER_PREFIX_RE.replace(&text, ""));
                cuts.push(i);
            }
            "h3" if is_title(*block) => {
                boundaries.push(MarkupBoundary::new(i, &section));
            }
            _ => {}
        }
    }

    let mut chunks = Vec::with_capacity(boundaries.len());
    for (n, boundary) in boundaries.iter().enumerate() {
        let end_block = markup::chunk_end(&boundaries, n, &cuts, end);
        let title = blocks[boundary.block];
        let body = markup::collect_text_between(title, blocks.get(end_block).copied());
        let text = [markup::extract_text(title), body]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");
        if text.is_empty() {
            debug!("Dropping empty chunk at block {}", boundary.block);
            continue;
        }
        chunks.push(RecipeChunk {
            text,
            section_header: boundary.section.clone(),
            page_number: markup::find_page_number(title),
            recipe_number: None,
        });
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOK: &str = r##"<html><body>
<div class="chapter">
<h2>CHAPTER VI.<br/>SOUPS.</h2>
<p><span class="pagenum"><a id="Page_78">[78]</a></span>Soup is a liquid food.</p>
<h3>Brown Soup Stock</h3>
<table><tr><td>6 lbs. shin of beef</td></tr></table>
<p>Wipe beef, and cut lean meat in inch cubes.</p>
<h3>White Soup Stock</h3>
<p>Wipe knuckle.</p>
</div>
<div class="chapter">
<h2>CHAPTER VII.<br/>FISH.</h2>
<h3>Boiled Cod</h3>
<p>Clean the fish.</p>
</div>
<h2>INDEX</h2>
<p>Cod, boiled, 120</p>
</body></html>"##;

    #[test]
    fn test_split_sibling_bodies() {
        let chunks = split(&markup::parse(BOOK));
        let titles: Vec<&str> = chunks.iter().map(|c| c.title()).collect();
        assert_eq!(titles, vec!["Brown Soup Stock", "White Soup Stock", "Boiled Cod"]);
        assert_eq!(
            chunks[0].text,
            "Brown Soup Stock\n\n6 lbs. shin of beef\n\nWipe beef, and cut lean meat in inch cubes."
        );
        assert_eq!(chunks[0].section_header.as_deref(), Some("SOUPS"));
        assert_eq!(chunks[0].page_number, Some(78));
        assert_eq!(chunks[1].text, "White Soup Stock\n\nWipe knuckle.");
        assert_eq!(chunks[2].section_header.as_deref(), Some("FISH"));
        assert_eq!(chunks[2].text, "Boiled Cod\n\nClean the fish.");
    }

    #[test]
    fn test_body_stops_at_index_inside_wrapper() {
        let book = r##"<html><body>
<h2>CHAPTER VII.<br/>FISH.</h2>
<h3>Boiled Cod</h3>
<p>Clean the fish.</p>
<div class="backmatter">
<p>Serve with egg sauce.</p>
<h2>INDEX</h2>
<p>Cod, boiled, 120</p>
</div>
</body></html>"##;
        let chunks = split(&markup::parse(book));
        assert_eq!(chunks.len(), 1);
        assert_eq!(
            chunks[0].text,
            "Boiled Cod\n\nClean the fish.\n\nServe with egg sauce."
        );
    }
}
