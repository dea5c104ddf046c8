//! EPUB exporter.
//!
//! Packages a converted [`Book`] as an EPUB 2 container: the stored
//! `mimetype` marker first, then `META-INF/container.xml`, the OPF package
//! document, the NCX and the content document.

use std::io::{Cursor, Seek, Write};
use std::path::Path;

use log::{debug, info};
use tempfile::NamedTempFile;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::book::{Book, CONTENT_HREF, Metadata, NCX_HREF};
use crate::error::{Error, Result};
use crate::markdown::escape_attr;

use super::Exporter;

/// Configuration for EPUB export.
#[derive(Debug, Clone)]
pub struct EpubConfig {
    /// Compression level for deflate (1-9, default 6). Level 0 stores every
    /// entry uncompressed.
    pub compression_level: Option<u32>,
    /// Value of `dc:language` (default `en`).
    pub language: String,
}

impl Default for EpubConfig {
    fn default() -> Self {
        Self {
            compression_level: None,
            language: "en".to_string(),
        }
    }
}

impl EpubConfig {
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = Some(level.min(9));
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

/// EPUB format exporter.
///
/// # Example
///
/// ```no_run
/// use bm2epub::export::{EpubConfig, EpubExporter};
/// use bm2epub::markdown::{ConvertConfig, convert_file};
///
/// let book = convert_file("notes.md", ConvertConfig::default())?;
/// EpubExporter::new()
///     .with_config(EpubConfig::default().with_language("fr"))
///     .write_to_path(&book, "notes.epub")?;
/// # Ok::<(), bm2epub::Error>(())
/// ```
pub struct EpubExporter {
    config: EpubConfig,
}

impl EpubExporter {
    /// Create a new exporter with default configuration.
    pub fn new() -> Self {
        Self {
            config: EpubConfig::default(),
        }
    }

    /// Configure the exporter with custom settings.
    pub fn with_config(mut self, config: EpubConfig) -> Self {
        self.config = config;
        self
    }

    /// Write the package to `path`.
    ///
    /// The archive is built in memory and written to a temporary file next to
    /// `path`, which then replaces the destination. A failed write leaves any
    /// existing file at `path` untouched. If the destination directory cannot
    /// be written the result is [`Error::ResourceUnavailable`].
    pub fn write_to_path<P: AsRef<Path>>(&self, book: &Book, path: P) -> Result<()> {
        let path = path.as_ref();

        let mut buffer = Cursor::new(Vec::new());
        self.export(book, &mut buffer)?;
        let bytes = buffer.into_inner();

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir).map_err(|e| Error::unavailable(path, e))?;
        file.write_all(&bytes)?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| Error::unavailable(path, e.error))?;

        info!("wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

impl Default for EpubExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for EpubExporter {
    fn export<W: Write + Seek>(&self, book: &Book, writer: &mut W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);

        let stored = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Stored)
            .last_modified_time(DateTime::default());
        // Deflate rejects level 0, so an uncompressed package stores every entry.
        let deflated = match self.config.compression_level.unwrap_or(6) {
            0 => stored,
            level => SimpleFileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(level as i64))
                .last_modified_time(DateTime::default()),
        };

        // 1. Write mimetype (must be first, uncompressed)
        zip.start_file("mimetype", stored)?;
        zip.write_all(MIMETYPE)?;

        // 2. Write container.xml
        zip.start_file("META-INF/container.xml", deflated)?;
        zip.write_all(CONTAINER_XML)?;

        // 3. Write content.opf
        let opf = generate_opf(&book.metadata, &self.config.language);
        zip.start_file("OEBPS/content.opf", deflated)?;
        zip.write_all(opf.as_bytes())?;

        // 4. Write toc.ncx
        zip.start_file(format!("OEBPS/{NCX_HREF}"), deflated)?;
        zip.write_all(book.navigation.as_bytes())?;

        // 5. Write the content document
        zip.start_file(format!("OEBPS/{CONTENT_HREF}"), deflated)?;
        zip.write_all(book.content.as_bytes())?;

        zip.finish()?;
        debug!(
            "packaged {:?}: {} navigation entries",
            book.metadata.title,
            book.nav_points.len()
        );
        Ok(())
    }
}

/// Write `book` to `path` with the default configuration.
pub fn write_epub<P: AsRef<Path>>(book: &Book, path: P) -> Result<()> {
    EpubExporter::new().write_to_path(book, path)
}

const MIMETYPE: &[u8] = b"application/epub+zip";

/// Container.xml template.
const CONTAINER_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

/// Generate content.opf from metadata.
fn generate_opf(metadata: &Metadata, language: &str) -> String {
    let mut opf = String::new();

    opf.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="BookId">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
"#,
    );

    opf.push_str(&format!(
        "    <dc:title>{}</dc:title>\n",
        escape_attr(&metadata.title)
    ));
    opf.push_str(&format!(
        "    <dc:creator opf:role=\"aut\">{}</dc:creator>\n",
        escape_attr(&metadata.author)
    ));
    if !metadata.year.is_empty() {
        opf.push_str(&format!(
            "    <dc:date>{}</dc:date>\n",
            escape_attr(&metadata.year)
        ));
    }
    opf.push_str(&format!(
        "    <dc:language>{}</dc:language>\n",
        escape_attr(language)
    ));
    opf.push_str(&format!(
        "    <dc:identifier id=\"BookId\">{}</dc:identifier>\n",
        escape_attr(&metadata.identifier)
    ));

    opf.push_str("  </metadata>\n  <manifest>\n");
    opf.push_str(&format!(
        "    <item id=\"ncx\" href=\"{NCX_HREF}\" media-type=\"application/x-dtbncx+xml\"/>\n"
    ));
    opf.push_str(&format!(
        "    <item id=\"content\" href=\"{CONTENT_HREF}\" media-type=\"application/xhtml+xml\"/>\n"
    ));
    opf.push_str("  </manifest>\n  <spine toc=\"ncx\">\n");
    opf.push_str("    <itemref idref=\"content\"/>\n");
    opf.push_str("  </spine>\n</package>\n");

    opf
}
