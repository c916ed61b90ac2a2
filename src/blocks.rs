//! Gutenberg block model and its block-comment serialisation.
//!
//! A block serialises as an opening comment carrying the block name and
//! optional JSON attributes, the HTML fragment, and a matching closing
//! comment:
//!
//! ```text
//! <!-- wp:list {"ordered":true} -->
//! <ol>
//!   <li>one</li>
//! </ol>
//! <!-- /wp:list -->
//! ```
//!
//! The scanner in this module recognises blocks emitted by earlier stages so
//! later stages can leave them alone.

use std::{fmt, sync::LazyLock};

use html_escape::encode_double_quoted_attribute;
use regex::Regex;
use serde::Serialize;

static BLOCK_OPEN_RE: LazyLock<Regex> = lazy_regex!(
    r"<!-- wp:(paragraph|image|list|table)\s",
    "valid block opening regex",
);

/// An image reference with its resolved alt text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
}

/// Header and body rows of a table block.
///
/// Rows keep their own lengths; nothing pads them to [`Table::column_count`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub head: Vec<Vec<String>>,
    pub body: Vec<Vec<String>>,
}

impl Table {
    /// Widest row across header and body.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.head
            .iter()
            .chain(&self.body)
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_empty() && self.body.is_empty()
    }
}

/// A single converted content unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(String),
    Image(ImageRef),
    List { ordered: bool, items: Vec<String> },
    Table(Table),
}

#[derive(Serialize)]
struct ListAttrs {
    ordered: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TableAttrs {
    has_fixed_layout: bool,
}

impl Block {
    /// Block type name as it appears after `wp:`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Paragraph(_) => "paragraph",
            Self::Image(_) => "image",
            Self::List { .. } => "list",
            Self::Table(_) => "table",
        }
    }

    fn attributes(&self) -> Option<String> {
        match self {
            Self::List { ordered: true, .. } => {
                Some(serialize_attributes(&ListAttrs { ordered: true }))
            }
            Self::Table(_) => Some(serialize_attributes(&TableAttrs {
                has_fixed_layout: true,
            })),
            _ => None,
        }
    }

    fn inner_html(&self) -> String {
        match self {
            Self::Paragraph(text) => format!("<p>{text}</p>"),
            Self::Image(image) => format!(
                "<figure class=\"wp-block-image\"><img src=\"{}\" alt=\"{}\"/></figure>",
                encode_double_quoted_attribute(&image.src),
                encode_double_quoted_attribute(&image.alt),
            ),
            Self::List { ordered, items } => {
                let tag = if *ordered { "ol" } else { "ul" };
                let mut html = format!("<{tag}>\n");
                for item in items {
                    html.push_str("  <li>");
                    html.push_str(item);
                    html.push_str("</li>\n");
                }
                html.push_str(&format!("</{tag}>"));
                html
            }
            Self::Table(table) => render_table(table),
        }
    }

    /// Serialise the block to its comment-delimited form.
    #[must_use]
    pub fn render(&self) -> String {
        wrap_block(self.name(), self.attributes().as_deref(), &self.inner_html())
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn render_rows(html: &mut String, rows: &[Vec<String>], cell_tag: &str) {
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<{cell_tag}>{cell}</{cell_tag}>"));
        }
        html.push_str("</tr>");
    }
}

fn render_table(table: &Table) -> String {
    let mut html =
        String::from("<figure class=\"wp-block-table\"><table class=\"has-fixed-layout\">");
    if !table.head.is_empty() {
        html.push_str("<thead>");
        render_rows(&mut html, &table.head, "th");
        html.push_str("</thead>");
    }
    if !table.body.is_empty() {
        html.push_str("<tbody>");
        render_rows(&mut html, &table.body, "td");
        html.push_str("</tbody>");
    }
    html.push_str("</table></figure>");
    html
}

/// Wrap `html` in the opening and closing comments of block `name`.
///
/// Empty `html` produces the two comments on adjacent lines.
#[must_use]
pub fn wrap_block(name: &str, attributes: Option<&str>, html: &str) -> String {
    let open = match attributes {
        Some(attrs) => format!("<!-- wp:{name} {attrs} -->"),
        None => format!("<!-- wp:{name} -->"),
    };
    if html.is_empty() {
        format!("{open}\n<!-- /wp:{name} -->")
    } else {
        format!("{open}\n{html}\n<!-- /wp:{name} -->")
    }
}

/// Serialise block attributes to JSON the way the block editor does.
///
/// Sequences that could end or confuse the surrounding HTML comment are
/// written as unicode escapes.
///
/// # Panics
/// Panics if `attrs` cannot be represented as JSON, which cannot happen for
/// the plain attribute structs used in this crate.
#[must_use]
pub fn serialize_attributes<T: Serialize>(attrs: &T) -> String {
    serde_json::to_string(attrs)
        .expect("block attributes serialise to JSON")
        .replace("--", "\\u002d\\u002d")
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

/// A piece of partially converted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A complete recognised block, markers included.
    Block(&'a str),
    /// Anything between recognised blocks.
    Text(&'a str),
}

/// Split `text` into recognised blocks and the text between them.
///
/// Each opening marker is paired with the nearest following closing marker
/// of the same name. An opening marker without a closing marker ends the
/// scan and the remainder is returned as text. Empty text segments are
/// omitted.
#[must_use]
pub fn split_blocks(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut pos = 0;
    while let Some(caps) = BLOCK_OPEN_RE.captures_at(text, pos) {
        let (Some(open), Some(name)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        let close = format!("<!-- /wp:{} -->", name.as_str());
        let Some(offset) = text[open.end()..].find(&close) else {
            break;
        };
        let end = open.end() + offset + close.len();
        if open.start() > pos {
            segments.push(Segment::Text(&text[pos..open.start()]));
        }
        segments.push(Segment::Block(&text[open.start()..end]));
        pos = end;
    }
    if pos < text.len() {
        segments.push(Segment::Text(&text[pos..]));
    }
    segments
}

/// Apply `f` to every text segment outside recognised blocks, copying the
/// blocks through unchanged.
pub fn map_outside_blocks<F>(text: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(text.len());
    for segment in split_blocks(text) {
        match segment {
            Segment::Block(block) => out.push_str(block),
            Segment::Text(free) => out.push_str(&f(free)),
        }
    }
    out
}

/// Returns `true` if `text` already holds an image block.
#[must_use]
pub fn contains_image_block(text: &str) -> bool {
    split_blocks(text).iter().any(|segment| {
        matches!(segment, Segment::Block(block) if block.starts_with("<!-- wp:image "))
    })
}
