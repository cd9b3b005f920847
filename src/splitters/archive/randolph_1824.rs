//! Mary Randolph, *The Virginia House-Wife* (1824).
//!
//! Sections come from a fixed vocabulary of food headings; anything else
//! set in capitals is a receipt title.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::RecipeChunk;
use crate::splitters::lines::{self, Boundary, Layout, PageNumbers};

lazy_static! {
    static ref HEADER_RE: Regex =
        Regex::new(r"^(?:\d+\s+)?(?:THE\s+)?VIRGINIA\s+HOUSE-?WIFE\.?(?:\s+\d+)?$").unwrap();
}

const SECTIONS: &[&str] = &[
    "SOUPS", "BEEF", "VEAL", "LAMB", "MUTTON", "PORK", "FISH", "POULTRY", "SAUCES", "VEGETABLES",
    "PUDDINGS", "CAKES", "CREAMS", "PRESERVES", "PICKLING", "CORDIALS", "VINEGARS",
];

const MAX_TITLE_LEN: usize = 90;
const INDEX_WINDOW: usize = 6;

fn is_noise(line: &str) -> bool {
    HEADER_RE.is_match(line) || lines::is_page_number_line(line)
}

/// `POULTRY, &c.` and `Soups.` both name the `POULTRY` and `SOUPS` sections.
fn section_key(line: &str) -> Option<&'static str> {
    let upper = line.trim().trim_end_matches('.').to_uppercase();
    let key = upper
        .trim_end_matches("&C")
        .trim_end()
        .trim_end_matches(',')
        .trim();
    SECTIONS.iter().copied().find(|name| *name == key)
}

fn is_caps_title(line: &str) -> bool {
    lines::is_all_caps_line(line)
        && line.len() <= MAX_TITLE_LEN
        && section_key(line).is_none()
        && !is_noise(line)
}

pub fn split(lines: &[&str]) -> Vec<RecipeChunk> {
    let Some(start) = lines.iter().position(|line| section_key(line).is_some()) else {
        return Vec::new();
    };
    let stop = lines::find_confirmed_index_heading(lines, start, INDEX_WINDOW);
    let end = stop.unwrap_or(lines.len());

    let mut section = None;
    let mut boundaries = Vec::new();
    let mut cuts = Vec::new();
    let mut i = start;
    while i < end {
        let line = lines[i].trim();
        if let Some(name) = section_key(line) {
            section = Some(name.to_string());
            cuts.push(i);
        } else if is_caps_title(line) && lines::follows_break(lines, i, &is_noise, &cuts) {
            if line.ends_with('.') {
                boundaries.push(Boundary::new(i, &section));
            } else if lines
                .get(i + 1)
                .map(|next| next.trim())
                .map_or(false, |next| is_caps_title(next) && next.ends_with('.'))
            {
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
