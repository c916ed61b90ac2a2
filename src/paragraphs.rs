//! Final segmentation of a converted region into blocks.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    blocks::{Block, Segment, split_blocks},
    textproc::collapse_whitespace,
};

static BLANK_LINE_RE: LazyLock<Regex> = lazy_regex!(r"\n[ \t\r]*\n", "valid blank line regex");
static COMMENT_RE: LazyLock<Regex> = lazy_regex!(r"(?s)<!--.*?-->", "valid comment regex");

/// Split `text` into rendered blocks.
///
/// Recognised blocks pass through verbatim. The text between them is split on
/// blank lines and each piece becomes a paragraph block with its whitespace
/// collapsed. HTML comments in free text are dropped; a piece holding nothing
/// else yields no block.
#[must_use]
pub fn segment_blocks(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for segment in split_blocks(text) {
        match segment {
            Segment::Block(block) => out.push(block.trim().to_string()),
            Segment::Text(free) => {
                for candidate in BLANK_LINE_RE.split(free) {
                    let text = collapse_whitespace(&COMMENT_RE.replace_all(candidate, " "));
                    if !text.is_empty() {
                        out.push(Block::Paragraph(text).render());
                    }
                }
            }
        }
    }
    out
}

/// Render `text` as newline-joined blocks.
///
/// # Examples
///
/// ```
/// use slideme_gutenberg::emit_blocks;
///
/// assert_eq!(
///     emit_blocks("Hello\nworld"),
///     "<!-- wp:paragraph -->\n<p>Hello world</p>\n<!-- /wp:paragraph -->"
/// );
/// ```
#[must_use]
pub fn emit_blocks(text: &str) -> String {
    segment_blocks(text).join("\n")
}
