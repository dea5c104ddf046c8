//! The Markdown dialect and its conversion to markup.
//!
//! The accepted source is line oriented and deliberately small:
//!
//! - [`classify`]: headings (`#`, `##`, `###`), chapter markers (`*1*`),
//!   blank lines and paragraphs
//! - [`inline`]: `_emphasis_` spans inside any line
//! - [`metadata`]: `# Title: `, `## Author: ` and `## Year: ` declarations
//! - [`escape`]: markup escaping applied to all user text
//! - [`convert`]: the streaming converter tying the above together
//!
//! ## Design Notes
//!
//! Metadata declarations are ordinary lines: they are rendered like any other
//! heading and additionally update the document [`Metadata`](crate::Metadata).
//! The chapter-marker width and the handling of unmatched emphasis markers
//! are explicit choices ([`ChapterRule`], [`EmphasisPolicy`]) rather than
//! fixed behaviour.

pub mod classify;
pub mod convert;
pub mod escape;
pub mod inline;
pub mod metadata;

pub use classify::{ChapterRule, LineKind, MarkerPattern, classify};
pub use convert::{ConvertConfig, Converter, convert_file, convert_str};
pub use escape::{escape_attr, escape_into, escape_text};
pub use inline::{EMPHASIS_MARKER, EmphasisPolicy, format_inline, format_inline_into};
pub use metadata::{MetadataField, extract_metadata};
