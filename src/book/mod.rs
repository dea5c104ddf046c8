//! Data model shared by the converter, the exporter and the package reader.

/// Name of the content document inside the package.
pub const CONTENT_HREF: &str = "content.xhtml";

/// Name of the navigation document inside the package.
pub const NCX_HREF: &str = "toc.ncx";

/// Title used when the document never declares one.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Author used when the document never declares one.
pub const DEFAULT_AUTHOR: &str = "Unknown";

/// Document metadata.
///
/// Mutable while a document is being converted (any line may declare a
/// field), frozen once it is handed out inside a [`Book`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct Metadata {
    pub title: String,
    pub author: String,
    /// Publication year; empty when undeclared.
    pub year: String,
    /// Package identifier, filled in when conversion finishes.
    pub identifier: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            year: String::new(),
            identifier: String::new(),
        }
    }
}

impl Metadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = year.into();
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }
}

/// One entry of the navigation document, created for each chapter marker.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(serde::Serialize))]
pub struct NavPoint {
    /// Identifier shared with the chapter heading anchor (`chap<N>`).
    pub id: String,
    /// 1-based position in document order.
    pub play_order: usize,
    /// Raw label text; escaped when rendered.
    pub label: String,
    /// Target of the entry, `content.xhtml#<id>`.
    pub href: String,
}

impl NavPoint {
    /// Create the entry for the `number`th chapter of the content document.
    pub fn for_chapter(number: usize, label: impl Into<String>) -> Self {
        let id = chapter_id(number);
        Self {
            href: format!("{CONTENT_HREF}#{id}"),
            id,
            play_order: number,
            label: label.into(),
        }
    }
}

/// Anchor identifier of the `number`th chapter (1-based).
pub fn chapter_id(number: usize) -> String {
    format!("chap{number}")
}

/// A converted document: rendered content and navigation text plus the final
/// metadata, ready to be packaged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub metadata: Metadata,
    /// Complete XHTML content document.
    pub content: String,
    /// Complete NCX navigation document.
    pub navigation: String,
    /// Navigation entries in play order.
    pub nav_points: Vec<NavPoint>,
}

impl Book {
    /// Number of chapter markers recognized in the source.
    pub fn chapter_count(&self) -> usize {
        self.nav_points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_defaults() {
        let metadata = Metadata::default();
        assert_eq!(metadata.title, "Untitled");
        assert_eq!(metadata.author, "Unknown");
        assert!(metadata.year.is_empty());
    }

    #[test]
    fn test_nav_point_for_chapter() {
        let point = NavPoint::for_chapter(3, "*3*Three");
        assert_eq!(point.id, "chap3");
        assert_eq!(point.play_order, 3);
        assert_eq!(point.href, "content.xhtml#chap3");
    }
}
