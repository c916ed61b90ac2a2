//! Whitespace helpers shared by the conversion stages.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RE: LazyLock<Regex> = lazy_regex!(r"\s+", "valid whitespace regex");

/// Collapse every whitespace run, line breaks included, to a single space and
/// trim the result.
///
/// # Examples
///
/// ```
/// use slideme_gutenberg::textproc::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("  a\n  b\t c "), "a b c");
/// ```
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}
