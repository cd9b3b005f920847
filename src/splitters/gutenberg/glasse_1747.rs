//! Hannah Glasse, *The Art of Cookery Made Plain and Easy* (1747).
//!
//! Chapters are `h2` headings (`CHAP. I. Of Roasting, Boiling, &c.`) and every
//! receipt has an `h4` title. `h4` "Another Way." variants stay with the
//! receipt above.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::model::RecipeChunk;
use crate::splitters::markup::{self, MarkupBoundary};

lazy_static! {
    static ref CHAPTER_RE: Regex = Regex::new(r"(?i)^chap(?:ter)?\.?\s+[ivxlc]+\.?\s*(.*)$").unwrap();
    static ref ANOTHER_RE: Regex = Regex::new(r"(?i)^another\s+way\.?$").unwrap();
}

fn is_title(block: ElementRef<'_>) -> bool {
    if markup::tag(&block) != "h4" {
        return false;
    }
    let text = markup::extract_text(block);
    !text.is_empty() && !ANOTHER_RE.is_match(&text) && !markup::is_index_heading(&text)
}

pub fn split(document: &Html) -> Vec<RecipeChunk> {
    let blocks = markup::blocks(document);
    let Some(first_title) = markup::first_landmark(&blocks, is_title) else {
        return Vec::new();
    };
    let stop = markup::find_index_block(&blocks, first_title + 1, &["h2", "h3"]);
    let end = stop.unwrap_or(blocks.len());

    let mut section = None;
    let mut boundaries = Vec::new();
    let mut cuts = Vec::new();
    for (i, block) in blocks[..end].iter().enumerate() {
        match markup::tag(block) {
            "h2" => {
                let text = markup::extract_text(*block);
                section = match CHAPTER_RE.captures(&text) {
                    Some(caps) => markup::section_name(&caps[1]),
                    None => markup::section_name(&text),
                };
                cuts.push(i);
            }
            "h4" if is_title(*block) => {
                boundaries.push(MarkupBoundary::new(i, &section));
            }
            _ => {}
        }
    }

    markup::assemble_blocks(&blocks, &boundaries, &cuts, stop)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOK: &str = r##"<html><body>
<h1>THE ART OF COOKERY</h1>
<p>CONTENTS</p><p><a href="#index">Index</a></p>
<div class="chapter">
<h2>CHAP. I.<br/>Of Roasting, Boiling, &amp;c.</h2>
<p><span class="pagenum"><a id="Page_1">[1]</a></span></p>
<h4>To roast Beef.</h4>
<p>Take care to spit it well.</p>
<h4>Another Way.</h4>
<p>Bake it.</p>
<h4>To roast Mutton.</h4>
<p>Keep a clear fire.</p>
</div>
<div class="chapter">
<h2>CHAP. II.<br/>Made-Dishes.</h2>
<h4>To dress Scotch Collops.</h4>
<p>Cut the veal.</p>
</div>
<h2>INDEX.</h2>
<p>Beef, 1</p>
</body></html>"##;

    #[test]
    fn test_split_h4_titles() {
        let chunks = split(&markup::parse(BOOK));
        let titles: Vec<&str> = chunks.iter().map(|c| c.title()).collect();
        assert_eq!(titles, vec!["To roast Beef.", "To roast Mutton.", "To dress Scotch Collops."]);
        assert_eq!(
            chunks[0].text,
            "To roast Beef.\n\nTake care to spit it well.\n\nAnother Way.\n\nBake it."
        );
        assert_eq!(chunks[0].section_header.as_deref(), Some("Of Roasting, Boiling, &c"));
        assert_eq!(chunks[0].page_number, Some(1));
        assert_eq!(chunks[1].page_number, Some(1));
        assert_eq!(chunks[2].section_header.as_deref(), Some("Made-Dishes"));
        assert!(!chunks[2].text.contains("Beef, 1"));
    }

    #[test]
    fn test_contents_index_does_not_stop_the_book() {
        let book = r##"<html><body>
<h2>CONTENTS.</h2>
<h3>Index.</h3>
<h2>CHAP. I.</h2>
<h4>To roast Beef.</h4>
<p>Take care to spit it well.</p>
<h2>INDEX.</h2>
<p>Beef, 1</p>
</body></html>"##;
        let chunks = split(&markup::parse(book));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "To roast Beef.\n\nTake care to spit it well.");
    }
}
