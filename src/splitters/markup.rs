//! Node-level primitives for marked-up (HTML) books.
//!
//! Mirrors [`super::lines`]: find boundaries, collect text between them and
//! infer page numbers, only over a `scraper` document instead of a line array.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use scraper::node::Element;
use scraper::{ElementRef, Html, Node};

use crate::model::RecipeChunk;

lazy_static! {
    static ref PAGE_ID_RE: Regex = Regex::new(r"^[Pp]age_?([0-9]+|[ivxlcdmIVXLCDM]+)$").unwrap();
    static ref PAGE_TEXT_RE: Regex =
        Regex::new(r"^\[?\s*(?:Pg\.?|[Pp]\.|Page)?\s*([0-9]+|[ivxlcdmIVXLCDM]+)\s*\]?$").unwrap();
    static ref INDEX_HEADING_RE: Regex =
        Regex::new(r"(?i)^(?:analytical\s+|general\s+)?index\.?$").unwrap();
}

const WRAPPERS: &[&str] = &["body", "div", "section", "article", "main"];

const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "h1", "h2", "h3", "h4", "h5", "h6", "table", "tr",
    "td", "th", "ul", "ol", "li", "blockquote", "pre", "hr", "dl", "dt", "dd",
];

/// Parse a book's HTML into a traversable document.
pub fn parse(raw: &str) -> Html {
    Html::parse_document(raw)
}

/// Lower-case tag name of an element.
pub fn tag<'a>(element: &ElementRef<'a>) -> &'a str {
    element.value().name()
}

/// Visible text with whitespace collapsed to single spaces. Page markers
/// (`span.pagenum`) are skipped.
pub fn extract_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_text(element, &mut raw);
    collapse_whitespace(&raw)
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    if is_page_marker(element.value()) {
        return;
    }
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(inner) => {
                let block = inner.name() == "br" || BLOCK_TAGS.contains(&inner.name());
                if block {
                    out.push(' ');
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    push_text(child_element, out);
                }
                if block {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_page_marker(element: &Element) -> bool {
    element.classes().any(|class| class == "pagenum")
}

/// Text of every sibling strictly between `start` and `end`, non-blank parts
/// joined by blank lines. Without `end` (or when `end` is not a later
/// sibling) collection runs to the last sibling. A sibling wrapping `end`
/// contributes only what precedes `end` inside it.
pub fn collect_text_between(start: ElementRef<'_>, end: Option<ElementRef<'_>>) -> String {
    let mut parts = Vec::new();

    for sibling in start.next_siblings() {
        if let Some(end) = end {
            if sibling.id() == end.id() {
                break;
            }
            if let Some(wrapper) = ElementRef::wrap(sibling).filter(|w| contains(*w, end)) {
                push_parts_before(wrapper, end, &mut parts);
                break;
            }
        }
        push_part(node_text(sibling.value(), ElementRef::wrap(sibling)), &mut parts);
    }

    parts.join("\n\n")
}

fn contains(wrapper: ElementRef<'_>, element: ElementRef<'_>) -> bool {
    element.ancestors().any(|ancestor| ancestor.id() == wrapper.id())
}

fn push_parts_before(wrapper: ElementRef<'_>, end: ElementRef<'_>, parts: &mut Vec<String>) {
    for child in wrapper.children() {
        if child.id() == end.id() {
            return;
        }
        if let Some(inner) = ElementRef::wrap(child).filter(|inner| contains(*inner, end)) {
            push_parts_before(inner, end, parts);
            return;
        }
        push_part(node_text(child.value(), ElementRef::wrap(child)), parts);
    }
}

fn node_text(node: &Node, element: Option<ElementRef<'_>>) -> String {
    match node {
        Node::Text(text) => collapse_whitespace(text),
        Node::Element(_) => element.map(extract_text).unwrap_or_default(),
        _ => String::new(),
    }
}

fn push_part(text: String, parts: &mut Vec<String>) {
    if !text.is_empty() {
        parts.push(text);
    }
}

enum PageMarker {
    Page(u32),
    FrontMatter,
}

fn marker_value(raw: &str) -> PageMarker {
    raw.parse().map_or(PageMarker::FrontMatter, PageMarker::Page)
}

fn page_marker(element: ElementRef<'_>) -> Option<PageMarker> {
    let value = element.value();
    for attr in [value.id(), value.attr("name")].into_iter().flatten() {
        if let Some(caps) = PAGE_ID_RE.captures(attr) {
            return Some(marker_value(&caps[1]));
        }
    }
    if is_page_marker(value) {
        let text = collapse_whitespace(&element.text().collect::<String>());
        if let Some(caps) = PAGE_TEXT_RE.captures(&text) {
            return Some(marker_value(&caps[1]));
        }
    }
    None
}

/// Scan `element` and its descendants last-to-first for a page marker.
fn last_marker_within(element: ElementRef<'_>) -> Option<PageMarker> {
    let descendants: Vec<ElementRef<'_>> =
        element.descendants().filter_map(ElementRef::wrap).collect();
    descendants.into_iter().rev().find_map(page_marker)
}

/// Page of the title element: the closest page marker before it in document
/// order, looking through preceding siblings (and their descendants), then
/// the parent's preceding siblings, up to `body`. Roman-numeral markers belong
/// to front matter and end the search without a page.
pub fn find_page_number(title: ElementRef<'_>) -> Option<u32> {
    if let Some(marker) = last_marker_within(title) {
        return match marker {
            PageMarker::Page(page) => Some(page),
            PageMarker::FrontMatter => None,
        };
    }

    let mut current = title;
    loop {
        for sibling in current.prev_siblings().filter_map(ElementRef::wrap) {
            match last_marker_within(sibling) {
                Some(PageMarker::Page(page)) => return Some(page),
                Some(PageMarker::FrontMatter) => return None,
                None => {}
            }
        }
        match current.parent().and_then(ElementRef::wrap) {
            Some(parent) if !matches!(tag(&parent), "body" | "html") => current = parent,
            _ => return None,
        }
    }
}

/// The element `element`'s content opens with, ignoring leading whitespace,
/// page markers and empty anchors. `None` when it opens with text.
pub fn leading_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    for child in element.children() {
        match child.value() {
            Node::Text(text) if text.trim().is_empty() => continue,
            Node::Comment(_) => continue,
            Node::Element(inner) if is_page_marker(inner) => continue,
            Node::Element(_) => {
                let child_element = ElementRef::wrap(child)?;
                if tag(&child_element) == "a" && extract_text(child_element).is_empty() {
                    continue;
                }
                return Some(child_element);
            }
            _ => return None,
        }
    }
    None
}

/// Whether `element` carries the CSS class `class`.
pub fn has_class(element: &ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|candidate| candidate == class)
}

/// Block elements of the body in document order, flattened through
/// structural wrappers (`div`, `section`, ...) that hold block content.
pub fn blocks(document: &Html) -> Vec<ElementRef<'_>> {
    let root = document.root_element();
    let body = root
        .children()
        .filter_map(ElementRef::wrap)
        .find(|element| tag(element) == "body")
        .unwrap_or(root);
    let mut out = Vec::new();
    flatten(body, &mut out);
    out
}

fn flatten<'a>(element: ElementRef<'a>, out: &mut Vec<ElementRef<'a>>) {
    for child in element.children().filter_map(ElementRef::wrap) {
        let is_wrapper = WRAPPERS.contains(&tag(&child))
            && !is_page_marker(child.value())
            && child
                .children()
                .filter_map(ElementRef::wrap)
                .any(|inner| BLOCK_TAGS.contains(&tag(&inner)));
        if is_wrapper {
            flatten(child, out);
        } else {
            out.push(child);
        }
    }
}

/// True for headings such as `INDEX.` or `ANALYTICAL INDEX`.
pub fn is_index_heading(text: &str) -> bool {
    INDEX_HEADING_RE.is_match(text.trim())
}

/// First block at or after `from` whose tag is one of `heading_tags` and
/// whose text is an index heading.
pub fn find_index_block(blocks: &[ElementRef<'_>], from: usize, heading_tags: &[&str]) -> Option<usize> {
    (from..blocks.len()).find(|&i| {
        heading_tags.contains(&tag(&blocks[i])) && is_index_heading(&extract_text(blocks[i]))
    })
}

/// The book's first content block: the first block `is_landmark` accepts
/// that is not itself an index heading. Back-matter searches start after it,
/// so an "Index" entry in the contents cannot end the book.
pub fn first_landmark(
    blocks: &[ElementRef<'_>],
    is_landmark: impl Fn(ElementRef<'_>) -> bool,
) -> Option<usize> {
    blocks
        .iter()
        .position(|block| is_landmark(*block) && !is_index_heading(&extract_text(*block)))
}

/// A detected recipe start in a flattened block list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupBoundary {
    pub block: usize,
    pub section: Option<String>,
    pub recipe_number: Option<u32>,
}

impl MarkupBoundary {
    pub fn new(block: usize, section: &Option<String>) -> Self {
        Self {
            block,
            section: section.clone(),
            recipe_number: None,
        }
    }

    pub fn numbered(block: usize, section: &Option<String>, recipe_number: Option<u32>) -> Self {
        Self {
            block,
            section: section.clone(),
            recipe_number,
        }
    }
}

/// Index of the block a chunk starting at `boundaries[i]` runs up to.
pub fn chunk_end(
    boundaries: &[MarkupBoundary],
    i: usize,
    cuts: &[usize],
    stop: usize,
) -> usize {
    let start = boundaries[i].block;
    let next = boundaries.get(i + 1).map_or(stop, |b| b.block).min(stop);
    cuts.iter()
        .copied()
        .filter(|&cut| cut > start)
        .min()
        .map_or(next, |cut| cut.min(next))
}

/// Turn detected boundaries into chunks, block by block.
///
/// A chunk holds its title block and every block up to the next boundary,
/// cut or stop block. Blocks with no visible text are skipped, blank chunks
/// are dropped.
pub fn assemble_blocks(
    blocks: &[ElementRef<'_>],
    boundaries: &[MarkupBoundary],
    cuts: &[usize],
    stop: Option<usize>,
) -> Vec<RecipeChunk> {
    let stop = stop.unwrap_or(blocks.len()).min(blocks.len());
    let mut chunks = Vec::with_capacity(boundaries.len());

    for (i, boundary) in boundaries.iter().enumerate() {
        if boundary.block >= stop {
            break;
        }
        let end = chunk_end(boundaries, i, cuts, stop);
        let text = blocks[boundary.block..end]
            .iter()
            .map(|block| extract_text(*block))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");
        if text.is_empty() {
            debug!("Dropping empty chunk at block {}", boundary.block);
            continue;
        }
        chunks.push(RecipeChunk {
            text,
            section_header: boundary.section.clone(),
            page_number: find_page_number(blocks[boundary.block]),
            recipe_number: boundary.recipe_number,
        });
    }

    chunks
}

/// Section name from heading text: a trailing full stop removed, empty
/// names become `None`.
pub fn section_name(text: &str) -> Option<String> {
    super::lines::section_name(text)
}
