//! Standalone image conversion and shared `<img>` tag parsing.

use std::sync::LazyLock;

use log::debug;
use regex::{Captures, Regex};

use crate::{
    alt_text::derive_alt_text,
    blocks::{Block, ImageRef, contains_image_block, map_outside_blocks},
};

// An anchor that wraps nothing but an image is consumed together with it.
static IMAGE_RE: LazyLock<Regex> = lazy_regex!(
    r"(?is)<a\b[^>]*>\s*(<img\b[^>]*>)\s*</a\s*>|(<img\b[^>]*>)",
    "valid image regex",
);

static SRC_ATTR_RE: LazyLock<Regex> = lazy_regex!(
    r#"(?is)\ssrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#,
    "valid src attribute regex",
);

static ALT_ATTR_RE: LazyLock<Regex> = lazy_regex!(
    r#"(?is)\salt\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#,
    "valid alt attribute regex",
);

fn attr_value(tag: &str, re: &Regex) -> Option<String> {
    let caps = re.captures(tag)?;
    let raw = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?;
    Some(html_escape::decode_html_entities(raw.as_str()).into_owned())
}

fn image_tag<'t>(caps: &Captures<'t>) -> Option<&'t str> {
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

/// Parse a single `<img>` tag.
///
/// Returns `None` when the tag has no non-empty `src`. Entities in the
/// attribute values are decoded and the alt text is resolved with
/// [`derive_alt_text`].
///
/// # Examples
///
/// ```
/// use slideme_gutenberg::images::parse_img_tag;
///
/// let image = parse_img_tag(r#"<img src="covers/dune.jpg" alt="">"#).unwrap();
/// assert_eq!(image.alt, "Dune");
/// assert!(parse_img_tag("<img alt=\"x\">").is_none());
/// ```
#[must_use]
pub fn parse_img_tag(tag: &str) -> Option<ImageRef> {
    let src = attr_value(tag, &SRC_ATTR_RE)?.trim().to_string();
    if src.is_empty() {
        return None;
    }
    let alt = attr_value(tag, &ALT_ATTR_RE).unwrap_or_default();
    Some(ImageRef {
        alt: derive_alt_text(&src, &alt),
        src,
    })
}

/// All images in `html`, in document order.
#[must_use]
pub fn extract_images(html: &str) -> Vec<ImageRef> {
    IMAGE_RE
        .captures_iter(html)
        .filter_map(|caps| image_tag(&caps).and_then(parse_img_tag))
        .collect()
}

/// Remove image tags, and anchors wrapping only an image, from `html`.
#[must_use]
pub fn strip_images(html: &str) -> String {
    IMAGE_RE.replace_all(html, "").into_owned()
}

/// Replace standalone image tags with image blocks.
///
/// Each block is surrounded by blank lines so the segmenter sees it as its
/// own unit. Tags without a `src` are left as they are. The stage does
/// nothing when `text` already contains an image block, because those images
/// came out of a table and converting again would duplicate them.
#[must_use]
pub fn convert_images(text: &str) -> String {
    if contains_image_block(text) {
        debug!("image blocks already present; skipping image conversion");
        return text.to_string();
    }
    map_outside_blocks(text, |free| {
        IMAGE_RE
            .replace_all(free, |caps: &Captures<'_>| {
                match image_tag(caps).and_then(parse_img_tag) {
                    Some(image) => format!("\n\n{}\n\n", Block::Image(image)),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    })
}
