//! List conversion.
//!
//! Lightweight `- item` and `1. item` lines are first lifted into explicit
//! `<ul>`/`<ol>` markup, then every explicit list is wrapped in a list block.
//! Lists never nest.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::blocks::{Block, map_outside_blocks};

static UNORDERED_ITEM_RE: LazyLock<Regex> =
    lazy_regex!(r"^[-*+]\s+(.+)", "valid unordered item regex");
static ORDERED_ITEM_RE: LazyLock<Regex> = lazy_regex!(r"^\d+\.\s+(.+)", "valid ordered item regex");
static HTML_LIST_RE: LazyLock<Regex> = lazy_regex!(
    r"(?is)<(ul|ol)(?:\s[^>]*)?>(.*?)</(ul|ol)\s*>",
    "valid html list regex",
);
static LIST_ITEM_RE: LazyLock<Regex> =
    lazy_regex!(r"(?is)<li(?:\s[^>]*)?>(.*?)</li\s*>", "valid list item regex");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            Self::Unordered => "ul",
            Self::Ordered => "ol",
        }
    }
}

fn parse_item(line: &str) -> Option<(ListKind, &str)> {
    if let Some(cap) = UNORDERED_ITEM_RE.captures(line) {
        return Some((ListKind::Unordered, cap.get(1)?.as_str()));
    }
    let cap = ORDERED_ITEM_RE.captures(line)?;
    Some((ListKind::Ordered, cap.get(1)?.as_str()))
}

fn lift_segment(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut open: Option<ListKind> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if let Some((kind, item)) = parse_item(trimmed) {
            if open != Some(kind) {
                if let Some(prev) = open {
                    out.push(format!("</{}>", prev.tag()));
                }
                out.push(format!("<{}>", kind.tag()));
                open = Some(kind);
            }
            out.push(format!("<li>{item}</li>"));
            continue;
        }
        if trimmed.is_empty() {
            // Blank lines inside a list are dropped; elsewhere they still
            // separate paragraphs.
            if open.is_none() {
                out.push(String::new());
            }
            continue;
        }
        if let Some(prev) = open.take() {
            out.push(format!("</{}>", prev.tag()));
        }
        out.push(line.to_string());
    }

    if let Some(prev) = open {
        out.push(format!("</{}>", prev.tag()));
    }
    out.join("\n")
}

/// Lift lightweight list lines into explicit `<ul>`/`<ol>` markup.
///
/// Lines are matched after trimming. At most one list is open at a time:
/// switching between bullet and numbered items closes the old list right
/// before opening the new one, and any other non-blank line closes the open
/// list and passes through unchanged. Blank lines inside a list are dropped.
/// Recognised blocks are copied through untouched.
///
/// # Examples
///
/// ```
/// use slideme_gutenberg::lift_markdown_lists;
///
/// assert_eq!(
///     lift_markdown_lists("- a\n1. b"),
///     "<ul>\n<li>a</li>\n</ul>\n<ol>\n<li>b</li>\n</ol>"
/// );
/// ```
#[must_use]
pub fn lift_markdown_lists(text: &str) -> String {
    map_outside_blocks(text, lift_segment)
}

fn list_block(caps: &Captures<'_>) -> String {
    let (open, close) = (&caps[1], &caps[3]);
    if !open.eq_ignore_ascii_case(close) {
        return caps[0].to_string();
    }
    let ordered = open.eq_ignore_ascii_case("ol");
    let items = LIST_ITEM_RE
        .captures_iter(&caps[2])
        .map(|item| item[1].trim().to_string())
        .collect();
    Block::List { ordered, items }.render()
}

/// Wrap each explicit `<ul>` or `<ol>` list in a list block.
///
/// The shortest span from an opening tag to a closing list tag is taken, so
/// nested lists are not supported. A span whose closing tag does not match
/// its opening tag is left alone.
#[must_use]
pub fn wrap_html_lists(text: &str) -> String {
    map_outside_blocks(text, |free| {
        HTML_LIST_RE.replace_all(free, list_block).into_owned()
    })
}
