//! Charles Elmé Francatelli, *A Plain Cookery Book for the Working Classes* (1852).
//!
//! Receipts are `h3` headings numbered `No. 12. …`. Other `h3` headings are
//! prefaces and household advice, which end the receipt before them.

use lazy_static::lazy_static;
use regex::Regex;
use scraper::Html;

use crate::model::RecipeChunk;
use crate::splitters::markup::{self, MarkupBoundary};

lazy_static! {
    static ref TITLE_RE: Regex = Regex::new(r"^No\.\s*(\d{1,4})\.?").unwrap();
}

pub fn split(document: &Html) -> Vec<RecipeChunk> {
    let blocks = markup::blocks(document);
    let first_title = markup::first_landmark(&blocks, |block| {
        markup::tag(&block) == "h3" && TITLE_RE.is_match(&markup::extract_text(block))
    });
    let Some(first_title) = first_title else {
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
                section = markup::section_name(&markup::extract_text(*block));
                cuts.push(i);
            }
            "h3" => {
                let text = markup::extract_text(*block);
                match TITLE_RE.captures(&text) {
                    Some(caps) => {
                        let number = caps[1].parse().ok();
                        boundaries.push(MarkupBoundary::numbered(i, &section, number));
                    }
                    None => cuts.push(i),
                }
            }
            _ => {}
        }
    }

    markup::assemble_blocks(&blocks, &boundaries, &cuts, stop)
}
