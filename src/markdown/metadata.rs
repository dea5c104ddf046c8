//! Metadata declarations embedded in the document text.

use std::fmt;

use log::debug;

use crate::book::Metadata;

/// A metadata field that a line can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    Title,
    Author,
    Year,
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MetadataField::Title => "title",
            MetadataField::Author => "author",
            MetadataField::Year => "year",
        })
    }
}

/// Declaration prefixes in priority order.
const DECLARATIONS: [(&str, MetadataField); 3] = [
    ("# Title: ", MetadataField::Title),
    ("## Author: ", MetadataField::Author),
    ("## Year: ", MetadataField::Year),
];

/// Record the metadata declared by `line`, if any.
///
/// The value is the remainder of the line after the prefix, without its
/// terminator. A later declaration of the same field overwrites an earlier
/// one. Returns the field that was updated.
///
/// # Examples
///
/// ```
/// use bm2epub::Metadata;
/// use bm2epub::markdown::{MetadataField, extract_metadata};
///
/// let mut metadata = Metadata::default();
/// assert_eq!(extract_metadata("## Author: Ada\n", &mut metadata), Some(MetadataField::Author));
/// assert_eq!(metadata.author, "Ada");
/// ```
pub fn extract_metadata(line: &str, metadata: &mut Metadata) -> Option<MetadataField> {
    let (field, rest) = DECLARATIONS
        .iter()
        .find_map(|&(prefix, field)| line.strip_prefix(prefix).map(|rest| (field, rest)))?;
    let value = rest.lines().next().unwrap_or_default();

    let slot = match field {
        MetadataField::Title => &mut metadata.title,
        MetadataField::Author => &mut metadata.author,
        MetadataField::Year => &mut metadata.year,
    };
    debug!("{field}: {slot:?} -> {value:?}");
    *slot = value.to_string();

    Some(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_each_field() {
        let mut metadata = Metadata::default();
        assert_eq!(
            extract_metadata("# Title: Hello", &mut metadata),
            Some(MetadataField::Title)
        );
        assert_eq!(
            extract_metadata("## Year: 1990", &mut metadata),
            Some(MetadataField::Year)
        );
        assert_eq!(metadata.title, "Hello");
        assert_eq!(metadata.author, "Unknown");
        assert_eq!(metadata.year, "1990");
    }

    #[test]
    fn test_value_stops_at_terminator() {
        let mut metadata = Metadata::default();
        extract_metadata("# Title: Hello\r\n", &mut metadata);
        assert_eq!(metadata.title, "Hello");
    }

    #[test]
    fn test_later_declaration_wins() {
        let mut metadata = Metadata::default();
        extract_metadata("## Author: First", &mut metadata);
        extract_metadata("## Author: Second", &mut metadata);
        assert_eq!(metadata.author, "Second");
    }

    #[test]
    fn test_non_declarations_ignored() {
        let mut metadata = Metadata::default();
        for line in ["# Chapter", "Title: x", "#Title: x", "### Year: 2000", ""] {
            assert_eq!(extract_metadata(line, &mut metadata), None);
        }
        assert_eq!(metadata, Metadata::default());
    }

    #[test]
    fn test_empty_value() {
        let mut metadata = Metadata::default();
        extract_metadata("# Title: ", &mut metadata);
        assert_eq!(metadata.title, "");
    }
}
