//! Conversion of HTML tables embedded in shortcode content.
//!
//! Table regions are found with a tag-balanced scan and parsed with
//! `html5ever`. Only `<table>`, `<tr>`, `<th>` and `<td>` structure is
//! recognised; each cell's inner HTML is serialised back and normalised as
//! text. A table becomes either a sequence of paragraph and image blocks or a
//! single fixed-layout table block, depending on [`TableMode`].

use std::{ops::Range, sync::LazyLock};

use html5ever::{
    driver::ParseOpts,
    parse_document,
    serialize::{SerializeOpts, serialize},
    tendril::TendrilSink,
};
use log::debug;
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};
use regex::Regex;

use crate::{
    blocks::{Block, ImageRef, Table},
    images::{extract_images, strip_images},
    textproc::collapse_whitespace,
};

static TABLE_START_RE: LazyLock<Regex> =
    lazy_regex!(r"(?i)<table(?:\s|>)", "valid table start regex");
static TABLE_END_RE: LazyLock<Regex> = lazy_regex!(r"(?i)</table\s*>", "valid table end regex");
static BLOCK_TAG_RE: LazyLock<Regex> =
    lazy_regex!(r"(?i)</?(?:h[1-6]|p|div)(?:\s[^>]*)?>", "valid block tag regex");
static BREAK_RE: LazyLock<Regex> = lazy_regex!(r"(?i)<br\s*/?>", "valid line break regex");
static BLANK_RUN_RE: LazyLock<Regex> = lazy_regex!(r"\n\s*\n", "valid blank line regex");
// html5ever writes U+00A0 back out as `&nbsp;`.
static NBSP_RE: LazyLock<Regex> =
    lazy_regex!(r"(?i)&(?:nbsp|#160|#xa0);", "valid non-breaking space regex");
static QUOTE_ENTITY_RE: LazyLock<Regex> =
    lazy_regex!(r"(?i)&(?:quot|#34|#x22);", "valid quote entity regex");
static DOUBLED_QUOTES_RE: LazyLock<Regex> =
    lazy_regex!(r#"""([^"]*)"""#, "valid doubled quote regex");

/// How table regions are converted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableMode {
    /// Flatten every cell into paragraph and image blocks.
    #[default]
    Paragraphs,
    /// Keep the table as a single table block.
    Preserve,
}

impl From<bool> for TableMode {
    fn from(preserve_as_table: bool) -> Self {
        if preserve_as_table {
            Self::Preserve
        } else {
            Self::Paragraphs
        }
    }
}

/// Byte ranges of the balanced `<table>` regions in `text`.
///
/// Scanning stops at the first table that is never closed.
fn table_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut pos = 0;
    while let Some(start) = TABLE_START_RE.find_at(text, pos) {
        let mut depth = 0usize;
        let mut cursor = start.start();
        let mut end = None;
        loop {
            let next_open = TABLE_START_RE.find_at(text, cursor);
            let Some(next_close) = TABLE_END_RE.find_at(text, cursor) else {
                break;
            };
            match next_open {
                Some(open) if open.start() < next_close.start() => {
                    depth += 1;
                    cursor = open.end();
                }
                _ => {
                    depth = depth.saturating_sub(1);
                    cursor = next_close.end();
                    if depth == 0 {
                        end = Some(cursor);
                        break;
                    }
                }
            }
        }
        let Some(end) = end else {
            break;
        };
        spans.push(start.start()..end);
        pos = end;
    }
    spans
}

/// Count the table regions in `content` without converting them.
///
/// # Examples
///
/// ```
/// use slideme_gutenberg::detect_table_count;
///
/// let html = "<table><tr><td>a</td></tr></table> and <TABLE class=\"x\"></TABLE>";
/// assert_eq!(detect_table_count(html), 2);
/// assert_eq!(detect_table_count("<table><tr><td>open"), 0);
/// ```
#[must_use]
pub fn detect_table_count(content: &str) -> usize {
    table_spans(content).len()
}

/// Walks the DOM tree collecting `<table>` nodes under `handle`.
fn collect_tables(handle: &Handle, tables: &mut Vec<Handle>) {
    if let NodeData::Element { name, .. } = &handle.data {
        if name.local.as_ref() == "table" {
            tables.push(handle.clone());
        }
    }
    for child in handle.children.borrow().iter() {
        collect_tables(child, tables);
    }
}

/// Collects all `<tr>` nodes beneath `handle`.
fn collect_rows(handle: &Handle, rows: &mut Vec<Handle>) {
    if let NodeData::Element { name, .. } = &handle.data {
        if name.local.as_ref() == "tr" {
            rows.push(handle.clone());
        }
    }
    for child in handle.children.borrow().iter() {
        collect_rows(child, rows);
    }
}

/// Serialises the children of `handle` back to HTML.
fn inner_html(handle: &Handle) -> String {
    let mut bytes = Vec::new();
    let node: SerializableHandle = handle.clone().into();
    match serialize(&mut bytes, &node, SerializeOpts::default()) {
        Ok(()) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => String::new(),
    }
}

/// A table row as parsed: whether it holds a `<th>` and each cell's inner
/// HTML.
struct RawRow {
    has_header_cell: bool,
    cells: Vec<String>,
}

fn parse_rows(table: &Handle) -> Vec<RawRow> {
    let mut row_handles = Vec::new();
    collect_rows(table, &mut row_handles);
    row_handles
        .iter()
        .map(|row| {
            let mut has_header_cell = false;
            let mut cells = Vec::new();
            for child in row.children.borrow().iter() {
                if let NodeData::Element { name, .. } = &child.data {
                    let tag = name.local.as_ref();
                    if tag == "td" || tag == "th" {
                        has_header_cell |= tag == "th";
                        cells.push(inner_html(child));
                    }
                }
            }
            RawRow {
                has_header_cell,
                cells,
            }
        })
        .collect()
}

/// Split a cell into paragraph texts, keeping its block structure.
fn cell_paragraphs(cell_html: &str) -> Vec<String> {
    let text = strip_images(cell_html);
    let text = NBSP_RE.replace_all(&text, " ");
    let text = BREAK_RE.replace_all(&text, "\n");
    let text = BLOCK_TAG_RE.replace_all(&text, "\n");
    let text = BLANK_RUN_RE.replace_all(&text, "\n\n");
    text.split("\n\n")
        .map(collapse_whitespace)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Flatten a cell to a single line of table text.
fn cell_line(cell_html: &str) -> String {
    let text = strip_images(cell_html);
    let text = NBSP_RE.replace_all(&text, " ");
    let text = BREAK_RE.replace_all(&text, " ");
    let text = BLOCK_TAG_RE.replace_all(&text, " ");
    unescape_quotes(&collapse_whitespace(&text))
}

/// Decode escaped quotes and undo the `""x""` doubling left by earlier
/// escaping round trips.
fn unescape_quotes(text: &str) -> String {
    let decoded = QUOTE_ENTITY_RE.replace_all(text, "\"");
    DOUBLED_QUOTES_RE
        .replace_all(&decoded, "\"${1}\"")
        .into_owned()
}

fn paragraph_blocks(rows: &[RawRow]) -> Vec<Block> {
    let mut blocks = Vec::new();
    for cell in rows.iter().flat_map(|row| &row.cells) {
        blocks.extend(extract_images(cell).into_iter().map(Block::Image));
        blocks.extend(cell_paragraphs(cell).into_iter().map(Block::Paragraph));
    }
    blocks
}

fn table_blocks(rows: &[RawRow]) -> Vec<Block> {
    let mut table = Table::default();
    let mut hoisted: Vec<ImageRef> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let mut cells = Vec::with_capacity(row.cells.len());
        for cell in &row.cells {
            hoisted.extend(extract_images(cell));
            cells.push(cell_line(cell));
        }
        if i == 0 || row.has_header_cell {
            table.head.push(cells);
        } else {
            table.body.push(cells);
        }
    }
    debug!(
        "table with {} header and {} body rows across {} columns; {} images hoisted",
        table.head.len(),
        table.body.len(),
        table.column_count(),
        hoisted.len()
    );
    std::iter::once(Block::Table(table))
        .chain(hoisted.into_iter().map(Block::Image))
        .collect()
}

/// Convert one `<table>` region to rendered blocks separated by blank lines.
///
/// A region without rows yields an empty string.
fn convert_table(html: &str, mode: TableMode) -> String {
    let dom: RcDom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    let mut tables = Vec::new();
    collect_tables(&dom.document, &mut tables);
    let Some(table) = tables.first() else {
        return String::new();
    };
    let rows = parse_rows(table);
    if rows.is_empty() {
        debug!("table without rows dropped");
        return String::new();
    }
    let blocks = match mode {
        TableMode::Paragraphs => paragraph_blocks(&rows),
        TableMode::Preserve => table_blocks(&rows),
    };
    blocks
        .iter()
        .map(Block::render)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Replace every HTML table in `text` with blocks.
///
/// Converted tables are surrounded by blank lines. Tables that are never
/// closed are left untouched, as is everything outside table regions.
///
/// # Examples
///
/// ```
/// use slideme_gutenberg::{TableMode, convert_html_tables};
///
/// let out = convert_html_tables("<table><tr><td>Cell</td></tr></table>", TableMode::Paragraphs);
/// assert!(out.contains("<p>Cell</p>"));
/// ```
#[must_use]
pub fn convert_html_tables(text: &str, mode: TableMode) -> String {
    let spans = table_spans(text);
    if spans.is_empty() {
        return text.to_string();
    }
    debug!("converting {} tables in {mode:?} mode", spans.len());
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for span in spans {
        out.push_str(&text[last..span.start]);
        let converted = convert_table(&text[span.clone()], mode);
        if !converted.is_empty() {
            out.push_str("\n\n");
            out.push_str(&converted);
            out.push_str("\n\n");
        }
        last = span.end;
    }
    out.push_str(&text[last..]);
    out
}
