//! Export module for rendering finished documents and packaging books.
//!
//! - [`synthesize_xhtml_document`] wraps converted body fragments into the
//!   content document
//! - [`generate_ncx`] renders the navigation document
//! - [`EpubExporter`] assembles the EPUB container
//!
//! # Example
//!
//! ```no_run
//! use bm2epub::export::{EpubExporter, Exporter};
//! use bm2epub::markdown::{ConvertConfig, convert_str};
//! use std::fs::File;
//!
//! let book = convert_str("# Title: Hello\n*1*Start\n", ConvertConfig::default());
//! let mut file = File::create("hello.epub")?;
//! EpubExporter::new().export(&book, &mut file)?;
//! # Ok::<(), bm2epub::Error>(())
//! ```

use std::io::{Seek, Write};

use crate::book::Book;
use crate::error::Result;

mod epub;
mod html_synth;
mod ncx;

pub use epub::{EpubConfig, EpubExporter, write_epub};
pub use html_synth::synthesize_xhtml_document;
pub use ncx::generate_ncx;

/// Trait for exporting books to specific formats.
///
/// Exporters hold their configuration, and `export` writes to any
/// `Write + Seek` destination:
/// - `std::fs::File` for disk output
/// - `std::io::Cursor<Vec<u8>>` for in-memory output
pub trait Exporter {
    /// Export the book to the provided writer.
    fn export<W: Write + Seek>(&self, book: &Book, writer: &mut W) -> Result<()>;
}
