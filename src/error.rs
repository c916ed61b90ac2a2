//! Errors raised around the conversion core.
//!
//! The conversion itself is best effort and never fails; errors come from
//! the input bounds and from file IO.

use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("input is {len} bytes, exceeding the limit of {limit} bytes")]
    InputTooLarge { len: usize, limit: usize },
    #[error("input contains {count} shortcode regions, exceeding the limit of {limit}")]
    TooManyRegions { count: usize, limit: usize },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
