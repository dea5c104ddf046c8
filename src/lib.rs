//! # bm2epub
//!
//! Converts bookmark-style Markdown documents into EPUB ebooks.
//!
//! ## Features
//!
//! - Headings (`#`, `##`, `###`), paragraphs, blank-line breaks and
//!   `_emphasis_`
//! - Chapter markers (`*1*Title`) with a synchronized NCX table of contents
//! - Title, author and year declarations anywhere in the document
//! - In-process EPUB packaging (stored `mimetype` first, then deflated entries)
//!
//! ## Quick Start
//!
//! ```no_run
//! use bm2epub::{ConvertConfig, convert_file, write_epub};
//!
//! let book = convert_file("notes.md", ConvertConfig::default())?;
//! write_epub(&book, "notes.epub")?;
//! # Ok::<(), bm2epub::Error>(())
//! ```
//!
//! ## Working with Books
//!
//! A [`Book`] is the frozen result of a conversion: the XHTML content
//! document, the NCX navigation document, the navigation entries and the
//! final [`Metadata`].
//!
//! ```
//! use bm2epub::{ConvertConfig, convert_str};
//!
//! let book = convert_str(
//!     "# Title: Hello\n## Author: Ada\n*1*The Beginning\nSome _text_.\n",
//!     ConvertConfig::default(),
//! );
//!
//! assert_eq!(book.metadata.author, "Ada");
//! assert_eq!(book.nav_points[0].id, "chap1");
//! assert!(book.content.contains("<h2 id=\"chap1\">*1*The Beginning</h2>"));
//! assert!(book.content.contains("<p>Some <em>text</em>.</p>"));
//! ```

pub mod book;
pub mod epub;
pub mod error;
pub mod export;
pub mod markdown;
pub(crate) mod util;

pub use book::{Book, Metadata, NavPoint};
pub use epub::{PackageInfo, read_package, read_package_from_reader};
pub use error::{Error, Result};
pub use export::{EpubConfig, EpubExporter, Exporter, write_epub};
pub use markdown::{ChapterRule, ConvertConfig, Converter, EmphasisPolicy, convert_file, convert_str};
