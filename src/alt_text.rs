//! Alt text for images that arrive without a usable description.
//!
//! Book covers in legacy content are usually named after the book, so the
//! file name is a better description than nothing. Dimension tokens such as
//! `160x235` are thumbnail noise and are dropped.

use std::sync::LazyLock;

use regex::Regex;

use crate::textproc::collapse_whitespace;

/// Returned when neither the existing alt nor the file name are usable.
pub const FALLBACK_ALT: &str = "Book cover image";

/// Alt values that describe nothing and are replaced.
const GENERIC_ALTS: [&str; 5] = ["", "image", "img", "picture", "photo"];

static DIMENSIONS_RE: LazyLock<Regex> =
    lazy_regex!(r"\d+\s*[xX]\s*\d+", "valid dimension regex");

/// Derive alt text for an image.
///
/// A trimmed `existing_alt` is kept unless it is a generic placeholder.
/// Otherwise the description is built from the last path segment of `src`,
/// and [`FALLBACK_ALT`] is used when that is too short to mean anything.
/// The result is never empty.
///
/// # Examples
///
/// ```
/// use slideme_gutenberg::derive_alt_text;
///
/// assert_eq!(derive_alt_text("covers/160x235-my_book.jpg", ""), "My Book");
/// assert_eq!(derive_alt_text("x.png", "Photo"), "Book cover image");
/// assert_eq!(derive_alt_text("x.png", " The Hobbit "), "The Hobbit");
/// ```
#[must_use]
pub fn derive_alt_text(src: &str, existing_alt: &str) -> String {
    let existing = existing_alt.trim();
    if !GENERIC_ALTS.contains(&existing.to_lowercase().as_str()) {
        return existing.to_string();
    }
    let name = name_from_src(src);
    if name.chars().count() > 2 {
        title_case(&name)
    } else {
        FALLBACK_ALT.to_string()
    }
}

fn name_from_src(src: &str) -> String {
    let path = src.split(['?', '#']).next().unwrap_or_default();
    let segment = path.rsplit(['/', '\\']).next().unwrap_or_default();
    let stem = segment.rsplit_once('.').map_or(segment, |(stem, _)| stem);
    let spaced = stem.replace(['-', '_'], " ");
    collapse_whitespace(&DIMENSIONS_RE.replace_all(&spaced, " "))
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
