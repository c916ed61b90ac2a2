//! Conversion of `[slideme]` shortcode content into Gutenberg blocks.
//!
//! Each `[slideme title="..."]...[/slideme]` region is converted on its own:
//! HTML tables, standalone images and lists become blocks, the remaining text
//! becomes paragraph blocks, and the result is wrapped in an accordion block
//! carrying the title. The conversion is a pure function of its input.

#[macro_use]
mod macros;

pub mod alt_text;
pub mod blocks;
pub mod error;
pub mod html;
pub mod images;
pub mod io;
pub mod lists;
pub mod paragraphs;
pub mod shortcode;
pub mod textproc;

pub use alt_text::derive_alt_text;
pub use blocks::{Block, ImageRef, Table};
pub use error::Error;
pub use html::{TableMode, convert_html_tables, detect_table_count};
pub use images::convert_images;
pub use io::{DEFAULT_OUTPUT_FILE, convert_file, read_document, write_output};
pub use lists::{lift_markdown_lists, wrap_html_lists};
pub use paragraphs::emit_blocks;
pub use shortcode::{
    ConvertOptions, ShortcodeRegion, convert, convert_region, convert_with_options, find_regions,
};
