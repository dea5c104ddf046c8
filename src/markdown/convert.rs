//! Markdown → XHTML/NCX conversion.
//!
//! The [`Converter`] makes a single streaming pass over the source lines,
//! feeding each one to the metadata extractor and the line classifier and
//! appending markup to two independent streams:
//!
//! - the **content stream**: one XHTML fragment per line;
//! - the **navigation stream**: one [`NavPoint`] per chapter marker.
//!
//! The streams are only correlated through identifiers: the `n`th chapter
//! heading carries `id="chap<n>"` and the `n`th navigation entry has the same
//! id and `play_order == n`.
//!
//! [`Converter::finish`] then wraps the body in a complete XHTML document
//! (whose `<title>` is only known once every line has been seen), renders the
//! NCX and freezes the metadata into a [`Book`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};

use crate::book::{Book, Metadata, NavPoint, chapter_id};
use crate::error::{Error, Result};
use crate::export::{generate_ncx, synthesize_xhtml_document};
use crate::util::decode_text;

use super::classify::{ChapterRule, LineKind, classify};
use super::escape::escape_into;
use super::inline::{EmphasisPolicy, format_inline_into};
use super::metadata::extract_metadata;

/// Configuration for the conversion pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertConfig {
    /// Which marker lines start a chapter.
    pub chapter_rule: ChapterRule,
    /// Handling of emphasis left open at end of line.
    pub emphasis: EmphasisPolicy,
}

impl ConvertConfig {
    pub fn with_chapter_rule(mut self, rule: ChapterRule) -> Self {
        self.chapter_rule = rule;
        self
    }

    pub fn with_emphasis(mut self, policy: EmphasisPolicy) -> Self {
        self.emphasis = policy;
        self
    }
}

/// Streaming converter state.
///
/// # Example
///
/// ```
/// use bm2epub::markdown::{ConvertConfig, Converter};
///
/// let mut converter = Converter::new(ConvertConfig::default());
/// converter.push_line("# Title: Hello\n");
/// converter.push_line("*1*The Beginning\n");
/// let book = converter.finish();
///
/// assert_eq!(book.metadata.title, "Hello");
/// assert_eq!(book.nav_points[0].id, "chap1");
/// ```
pub struct Converter {
    config: ConvertConfig,
    metadata: Metadata,
    body: String,
    nav_points: Vec<NavPoint>,
    chapters: usize,
    lines: usize,
}

impl Converter {
    pub fn new(config: ConvertConfig) -> Self {
        Self {
            config,
            metadata: Metadata::default(),
            body: String::new(),
            nav_points: Vec::new(),
            chapters: 0,
            lines: 0,
        }
    }

    /// Metadata accumulated so far.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Process one source line. A trailing `\n` or `\r\n` is ignored.
    pub fn push_line(&mut self, line: &str) {
        let line = strip_line_terminator(line);
        self.lines += 1;

        extract_metadata(line, &mut self.metadata);

        match classify(line, self.config.chapter_rule) {
            LineKind::Heading { level, text } => {
                self.push_element(heading_tag(level), None, text);
            }
            LineKind::Chapter { label } => self.push_chapter(label),
            LineKind::Section { text } => self.push_element("h4", None, text),
            LineKind::Blank => self.body.push_str("<br/>\n"),
            LineKind::Paragraph { text } => self.push_element("p", None, text),
        }
    }

    /// Process every line of `text`.
    pub fn convert_str(&mut self, text: &str) {
        for line in text.split_inclusive('\n') {
            self.push_line(line);
        }
    }

    /// Process every line readable from `reader`.
    ///
    /// The input is read in full and its encoding decided once, so lines have
    /// no length limit. UTF-8 is preferred; input with no valid multi-byte
    /// UTF-8 at all is decoded as Windows-1252.
    pub fn convert_reader<R: Read>(&mut self, mut reader: R) -> Result<()> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.convert_str(&decode_text(&bytes));
        Ok(())
    }

    /// Close both streams and freeze the metadata.
    pub fn finish(self) -> Book {
        let mut metadata = self.metadata;
        metadata.identifier = book_identifier(&metadata, &self.body);

        let content = synthesize_xhtml_document(&metadata.title, &self.body);
        let navigation = generate_ncx(&metadata, &self.nav_points);

        info!(
            "converted {} lines, {} chapters: {:?} by {:?}",
            self.lines, self.chapters, metadata.title, metadata.author
        );

        Book {
            metadata,
            content,
            navigation,
            nav_points: self.nav_points,
        }
    }

    fn push_chapter(&mut self, label: &str) {
        self.chapters += 1;
        let id = chapter_id(self.chapters);
        debug!("chapter {} ({id}): {label:?}", self.chapters);

        self.push_element("h2", Some(&id), label);
        self.nav_points.push(NavPoint::for_chapter(self.chapters, label));
    }

    fn push_element(&mut self, tag: &str, id: Option<&str>, text: &str) {
        self.body.push('<');
        self.body.push_str(tag);
        if let Some(id) = id {
            self.body.push_str(" id=\"");
            escape_into(&mut self.body, id);
            self.body.push('"');
        }
        self.body.push('>');
        format_inline_into(&mut self.body, text, self.config.emphasis);
        self.body.push_str("</");
        self.body.push_str(tag);
        self.body.push_str(">\n");
    }
}

/// Convert an in-memory document.
pub fn convert_str(text: &str, config: ConvertConfig) -> Book {
    let mut converter = Converter::new(config);
    converter.convert_str(text);
    converter.finish()
}

/// Convert the document at `path`.
///
/// Fails with [`Error::ResourceUnavailable`] if the file cannot be opened.
pub fn convert_file<P: AsRef<Path>>(path: P, config: ConvertConfig) -> Result<Book> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::unavailable(path, e))?;
    debug!("reading {}", path.display());

    let mut converter = Converter::new(config);
    converter.convert_reader(file)?;
    Ok(converter.finish())
}

fn strip_line_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

fn heading_tag(level: u8) -> &'static str {
    match level {
        1 => "h1",
        2 => "h2",
        _ => "h3",
    }
}

/// Name-based (SHA-1) UUID for the book, so identical input always packages
/// to identical output.
fn book_identifier(metadata: &Metadata, body: &str) -> String {
    let mut hasher = sha1_smol::Sha1::new();
    for part in [&metadata.title, &metadata.author, &metadata.year] {
        hasher.update(part.as_bytes());
        hasher.update(&[0]);
    }
    hasher.update(body.as_bytes());
    let mut bytes = hasher.digest().bytes();

    // Version 5, RFC 4122 variant
    bytes[6] = (bytes[6] & 0x0f) | 0x50;
    bytes[8] = (bytes[8] & 0x3f) | 0x80;

    let hex: String = bytes[..16].iter().map(|b| format!("{b:02x}")).collect();
    format!(
        "urn:uuid:{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}
