//! Shortcode extraction and the per-region conversion pipeline.
//!
//! A region is written as `[slideme title="TITLE"]BODY[/slideme]`. The title
//! runs to the next `"`, which must be followed by `]`. The body ends at the
//! first `[/slideme]` after it, so a body that itself contains that text is
//! cut short. Nested and unclosed shortcodes are not matched.

use std::ops::Range;

use log::debug;
use serde::Serialize;

use crate::{
    blocks::{serialize_attributes, wrap_block},
    error::Error,
    html::{TableMode, convert_html_tables},
    images::convert_images,
    lists::{lift_markdown_lists, wrap_html_lists},
    paragraphs::emit_blocks,
};

const SHORTCODE_OPEN: &str = "[slideme title=\"";
const SHORTCODE_CLOSE: &str = "[/slideme]";

/// Name of the block every region is wrapped in.
pub const OUTER_BLOCK: &str = "cu-block/description-custom";

/// Default bound on the size of a single input document.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 16 * 1024 * 1024;

/// Default bound on the number of regions in a single input document.
pub const DEFAULT_MAX_REGIONS: usize = 10_000;

/// A matched shortcode with its title and body, both trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcodeRegion<'a> {
    pub title: &'a str,
    pub body: &'a str,
    /// Byte range of the whole shortcode in the document.
    pub span: Range<usize>,
}

/// Options for [`convert_with_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    pub table_mode: TableMode,
    pub max_input_bytes: usize,
    pub max_regions: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            table_mode: TableMode::default(),
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            max_regions: DEFAULT_MAX_REGIONS,
        }
    }
}

#[derive(Serialize)]
struct RegionAttrs<'a> {
    title: &'a str,
    layout: &'static str,
}

/// Find every shortcode region in `document`, in source order.
///
/// # Examples
///
/// ```
/// use slideme_gutenberg::find_regions;
///
/// let doc = r#"[slideme title=" FAQ "] Body [/slideme]"#;
/// let regions = find_regions(doc);
/// assert_eq!(regions.len(), 1);
/// assert_eq!(regions[0].title, "FAQ");
/// assert_eq!(regions[0].body, "Body");
/// assert_eq!(regions[0].span, 0..doc.len());
/// ```
#[must_use]
pub fn find_regions(document: &str) -> Vec<ShortcodeRegion<'_>> {
    let mut regions = Vec::new();
    let mut pos = 0;
    while let Some(offset) = document[pos..].find(SHORTCODE_OPEN) {
        let start = pos + offset;
        let title_start = start + SHORTCODE_OPEN.len();
        let Some(title_len) = document[title_start..].find('"') else {
            break;
        };
        let title_end = title_start + title_len;
        let body_start = title_end + "\"]".len();
        if !document[title_end..].starts_with("\"]") {
            pos = title_start;
            continue;
        }
        // Without a closing tag here no later region can close either.
        let Some(body_len) = document[body_start..].find(SHORTCODE_CLOSE) else {
            break;
        };
        let body_end = body_start + body_len;
        let end = body_end + SHORTCODE_CLOSE.len();
        regions.push(ShortcodeRegion {
            title: document[title_start..title_end].trim(),
            body: document[body_start..body_end].trim(),
            span: start..end,
        });
        pos = end;
    }
    regions
}

/// Run a region body through the conversion stages and render its blocks.
///
/// Tables are converted first; standalone images next, unless the tables
/// already produced image blocks; then lists are lifted and wrapped; the rest
/// becomes paragraphs.
#[must_use]
pub fn convert_region(body: &str, mode: TableMode) -> String {
    let text = convert_html_tables(body, mode);
    let text = convert_images(&text);
    let text = lift_markdown_lists(&text);
    let text = wrap_html_lists(&text);
    emit_blocks(&text)
}

/// Wrap rendered region blocks in the outer accordion block.
#[must_use]
pub fn wrap_region(title: &str, blocks: &str) -> String {
    let attrs = serialize_attributes(&RegionAttrs {
        title,
        layout: "accordion",
    });
    wrap_block(OUTER_BLOCK, Some(&attrs), blocks)
}

fn render_document(regions: &[ShortcodeRegion<'_>], mode: TableMode) -> String {
    regions
        .iter()
        .map(|region| {
            debug!("converting region {:?} at {:?}", region.title, region.span);
            let mut rendered = wrap_region(region.title, &convert_region(region.body, mode));
            rendered.push('\n');
            rendered
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convert every shortcode region in `document` to block markup.
///
/// Regions are emitted in source order, separated by a blank line. The result
/// is empty when no region matches.
///
/// # Examples
///
/// ```
/// use slideme_gutenberg::convert;
///
/// let out = convert(r#"[slideme title="FAQ"]Hello world[/slideme]"#, false);
/// assert_eq!(
///     out,
///     concat!(
///         "<!-- wp:cu-block/description-custom {\"title\":\"FAQ\",\"layout\":\"accordion\"} -->\n",
///         "<!-- wp:paragraph -->\n<p>Hello world</p>\n<!-- /wp:paragraph -->\n",
///         "<!-- /wp:cu-block/description-custom -->\n",
///     )
/// );
/// assert!(convert("no shortcodes here", false).is_empty());
/// ```
#[must_use]
pub fn convert(document: &str, preserve_as_table: bool) -> String {
    render_document(&find_regions(document), TableMode::from(preserve_as_table))
}

/// Convert `document` after checking it against the bounds in `options`.
///
/// # Errors
/// Returns [`Error::InputTooLarge`] or [`Error::TooManyRegions`] when the
/// document exceeds the configured bounds. Nothing is converted in that case.
pub fn convert_with_options(document: &str, options: &ConvertOptions) -> Result<String, Error> {
    if document.len() > options.max_input_bytes {
        return Err(Error::InputTooLarge {
            len: document.len(),
            limit: options.max_input_bytes,
        });
    }
    let regions = find_regions(document);
    if regions.len() > options.max_regions {
        return Err(Error::TooManyRegions {
            count: regions.len(),
            limit: options.max_regions,
        });
    }
    debug!("found {} shortcode regions", regions.len());
    Ok(render_document(&regions, options.table_mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_shortcode_with_extra_attributes() {
        let doc = r#"[slideme title="A" open="1"]x[/slideme][slideme title="B"]y[/slideme]"#;
        let titles: Vec<_> = find_regions(doc).into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["B"]);
    }

    #[test]
    fn unclosed_shortcode_is_ignored() {
        assert!(find_regions(r#"[slideme title="A"]never closed"#).is_empty());
        assert!(find_regions(r#"[slideme title="A"#).is_empty());
    }

    #[test]
    fn body_stops_at_first_close() {
        let doc = r#"[slideme title="A"]one[/slideme]two[/slideme]"#;
        let regions = find_regions(doc);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].body, "one");
    }

    #[test]
    fn multiline_body_is_trimmed() {
        let doc = "[slideme title=\"A\"]\n\n  text\n\n[/slideme]";
        assert_eq!(find_regions(doc)[0].body, "text");
    }

    #[test]
    fn empty_body_wraps_nothing() {
        assert_eq!(
            wrap_region("T", ""),
            "<!-- wp:cu-block/description-custom {\"title\":\"T\",\"layout\":\"accordion\"} \
             -->\n<!-- /wp:cu-block/description-custom -->"
        );
    }

    #[test]
    fn input_size_is_bounded() {
        let options = ConvertOptions {
            max_input_bytes: 4,
            ..ConvertOptions::default()
        };
        let err = convert_with_options("too long", &options).unwrap_err();
        assert!(matches!(err, Error::InputTooLarge { len: 8, limit: 4 }));
    }

    #[test]
    fn region_count_is_bounded() {
        let options = ConvertOptions {
            max_regions: 1,
            ..ConvertOptions::default()
        };
        let doc = r#"[slideme title="A"]a[/slideme][slideme title="B"]b[/slideme]"#;
        let err = convert_with_options(doc, &options).unwrap_err();
        assert!(matches!(err, Error::TooManyRegions { count: 2, limit: 1 }));
    }

    #[test]
    fn options_select_table_mode() {
        let doc = r#"[slideme title="T"]<table><tr><td>V</td></tr></table>[/slideme]"#;
        let options = ConvertOptions {
            table_mode: TableMode::Preserve,
            ..ConvertOptions::default()
        };
        let out = convert_with_options(doc, &options).unwrap();
        assert_eq!(out, convert(doc, true));
        assert!(out.contains("<!-- wp:table "));
    }
}
