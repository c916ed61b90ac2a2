//! File helpers for converting documents on disk.

use std::{fs, path::Path};

use crate::{
    error::Error,
    shortcode::{ConvertOptions, convert_with_options},
};

/// File name offered for converted output when none is given.
pub const DEFAULT_OUTPUT_FILE: &str = "converted-gutenberg-blocks.html";

/// Read a UTF-8 document.
///
/// # Errors
/// Returns [`Error::Read`] if the file cannot be read or is not valid UTF-8.
pub fn read_document(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and convert the document at `path`.
///
/// # Errors
/// Returns an error if the file cannot be read or exceeds the bounds in
/// `options`.
pub fn convert_file(path: &Path, options: &ConvertOptions) -> Result<String, Error> {
    let text = read_document(path)?;
    convert_with_options(&text, options)
}

/// Write converted output to `path`, replacing any existing file.
///
/// # Errors
/// Returns [`Error::Write`] if the file cannot be written.
pub fn write_output(path: &Path, content: &str) -> Result<(), Error> {
    fs::write(path, content).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}
