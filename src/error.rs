//! Error types for bm2epub operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while converting a document or packaging a book.
#[derive(Error, Debug)]
pub enum Error {
    /// The invocation cannot be turned into a conversion (e.g. no output
    /// name can be derived from the input path).
    #[error("invalid invocation: {0}")]
    InvalidInvocation(String),

    /// An input could not be opened for reading, or an output could not be
    /// opened for writing.
    #[error("cannot open {}: {source}", path.display())]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid EPUB: {0}")]
    InvalidEpub(String),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// Build a [`Error::ResourceUnavailable`] for `path`.
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::ResourceUnavailable {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
