//! Line classification.
//!
//! Each source line falls into exactly one [`LineKind`]. Rules are tried in
//! order and the first match wins:
//!
//! 1. `# `, `## `, `### ` prefixes are headings of level 1 to 3.
//! 2. A `*<digit>` prefix is a chapter marker, subject to [`ChapterRule`].
//! 3. An empty line is a blank line.
//! 4. Anything else is a paragraph.

/// Heading prefixes and their levels.
const HEADING_PREFIXES: [(&str, u8); 3] = [("# ", 1), ("## ", 2), ("### ", 3)];

/// Width of a chapter marker found at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerPattern {
    /// `*<digit>*`
    Strict,
    /// `*<digit>` not followed by `*`
    Loose,
}

impl MarkerPattern {
    /// Detect a marker at the start of `line`.
    pub fn detect(line: &str) -> Option<Self> {
        match line.as_bytes() {
            [b'*', digit, b'*', ..] if digit.is_ascii_digit() => Some(MarkerPattern::Strict),
            [b'*', digit, ..] if digit.is_ascii_digit() => Some(MarkerPattern::Loose),
            _ => None,
        }
    }
}

/// Which marker patterns start a chapter (and a navigation entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChapterRule {
    /// Only `*<digit>*` starts a chapter; `*<digit>` lines become level-4
    /// section headings with no navigation entry.
    #[default]
    Strict,
    /// Any `*<digit>` line starts a chapter.
    Loose,
}

impl ChapterRule {
    /// Whether a marker of this width starts a chapter under this rule.
    pub fn accepts(self, pattern: MarkerPattern) -> bool {
        match pattern {
            MarkerPattern::Strict => true,
            MarkerPattern::Loose => self == ChapterRule::Loose,
        }
    }
}

/// Category of a source line, borrowing its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Level 1-3 heading; `text` excludes the prefix.
    Heading { level: u8, text: &'a str },
    /// Chapter marker; `label` is the whole line.
    Chapter { label: &'a str },
    /// Marker not accepted by the [`ChapterRule`]; `text` is the whole line.
    Section { text: &'a str },
    Blank,
    Paragraph { text: &'a str },
}

/// Classify a line whose terminator has already been stripped.
///
/// # Examples
///
/// ```
/// use bm2epub::markdown::{ChapterRule, LineKind, classify};
///
/// assert_eq!(
///     classify("## Part", ChapterRule::Strict),
///     LineKind::Heading { level: 2, text: "Part" }
/// );
/// assert_eq!(
///     classify("*1*The Beginning", ChapterRule::Strict),
///     LineKind::Chapter { label: "*1*The Beginning" }
/// );
/// assert_eq!(classify("", ChapterRule::Strict), LineKind::Blank);
/// ```
pub fn classify(line: &str, rule: ChapterRule) -> LineKind<'_> {
    for (prefix, level) in HEADING_PREFIXES {
        if let Some(text) = line.strip_prefix(prefix) {
            return LineKind::Heading { level, text };
        }
    }

    if let Some(pattern) = MarkerPattern::detect(line) {
        return if rule.accepts(pattern) {
            LineKind::Chapter { label: line }
        } else {
            LineKind::Section { text: line }
        };
    }

    if line.is_empty() {
        LineKind::Blank
    } else {
        LineKind::Paragraph { text: line }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRICT: ChapterRule = ChapterRule::Strict;

    #[test]
    fn test_heading_levels() {
        assert_eq!(
            classify("# One", STRICT),
            LineKind::Heading { level: 1, text: "One" }
        );
        assert_eq!(
            classify("## Two", STRICT),
            LineKind::Heading { level: 2, text: "Two" }
        );
        assert_eq!(
            classify("### Three", STRICT),
            LineKind::Heading { level: 3, text: "Three" }
        );
    }

    #[test]
    fn test_heading_needs_space() {
        assert_eq!(
            classify("#hashtag", STRICT),
            LineKind::Paragraph { text: "#hashtag" }
        );
        assert_eq!(
            classify("#### Four", STRICT),
            LineKind::Paragraph { text: "#### Four" }
        );
        assert_eq!(
            classify("# ", STRICT),
            LineKind::Heading { level: 1, text: "" }
        );
    }

    #[test]
    fn test_marker_detection() {
        assert_eq!(MarkerPattern::detect("*1*x"), Some(MarkerPattern::Strict));
        assert_eq!(MarkerPattern::detect("*9*"), Some(MarkerPattern::Strict));
        assert_eq!(MarkerPattern::detect("*1 x"), Some(MarkerPattern::Loose));
        assert_eq!(MarkerPattern::detect("*1"), Some(MarkerPattern::Loose));
        assert_eq!(MarkerPattern::detect("*12*x"), Some(MarkerPattern::Loose));
        assert_eq!(MarkerPattern::detect("*a*"), None);
        assert_eq!(MarkerPattern::detect("**"), None);
        assert_eq!(MarkerPattern::detect("*"), None);
    }

    #[test]
    fn test_strict_rule() {
        assert_eq!(
            classify("*1*The Beginning", STRICT),
            LineKind::Chapter { label: "*1*The Beginning" }
        );
        assert_eq!(
            classify("*2 Aside", STRICT),
            LineKind::Section { text: "*2 Aside" }
        );
    }

    #[test]
    fn test_loose_rule() {
        let rule = ChapterRule::Loose;
        assert_eq!(
            classify("*2 Aside", rule),
            LineKind::Chapter { label: "*2 Aside" }
        );
        assert_eq!(classify("*2*", rule), LineKind::Chapter { label: "*2*" });
    }

    #[test]
    fn test_blank_and_paragraph() {
        assert_eq!(classify("", STRICT), LineKind::Blank);
        assert_eq!(classify(" ", STRICT), LineKind::Paragraph { text: " " });
        assert_eq!(
            classify("*emphasis* is not a marker", STRICT),
            LineKind::Paragraph { text: "*emphasis* is not a marker" }
        );
    }
}
