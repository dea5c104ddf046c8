//! Conversion tests.
//!
//! Covers the worked examples and the stream invariants: escaping, the
//! content/navigation identifier correlation, play order and idempotence.

use bm2epub::markdown::escape_text;
use bm2epub::{ChapterRule, ConvertConfig, EmphasisPolicy, convert_str};
use proptest::prelude::*;

/// Chapter anchor ids in the order they appear in the content document.
fn content_anchor_ids(content: &str) -> Vec<String> {
    content
        .match_indices("<h2 id=\"")
        .map(|(pos, prefix)| {
            let rest = &content[pos + prefix.len()..];
            rest[..rest.find('"').unwrap()].to_string()
        })
        .collect()
}

// ============================================================================
// Worked examples
// ============================================================================

#[test]
fn test_metadata_and_heading_example() {
    let book = convert_str(
        "# Title: Hello\n## Author: Ada\n## Year: 1990\n# Chapter One\nSome text.\n",
        ConvertConfig::default(),
    );

    assert_eq!(book.metadata.title, "Hello");
    assert_eq!(book.metadata.author, "Ada");
    assert_eq!(book.metadata.year, "1990");
    assert!(book.content.contains("<h1>Chapter One</h1>"));
    assert!(book.content.contains("<p>Some text.</p>"));
}

#[test]
fn test_strict_chapter_marker_example() {
    let book = convert_str("*1*The Beginning\n", ConvertConfig::default());

    assert_eq!(book.chapter_count(), 1);
    let point = &book.nav_points[0];
    assert_eq!(point.id, "chap1");
    assert_eq!(point.play_order, 1);
    assert!(book.content.contains("<h2 id=\"chap1\">"));
    assert!(book.navigation.contains("<navPoint id=\"chap1\" playOrder=\"1\">"));
    assert!(book.navigation.contains("<content src=\"content.xhtml#chap1\"/>"));
}

#[test]
fn test_blank_line_example() {
    let book = convert_str("\n", ConvertConfig::default());

    assert_eq!(book.content.matches("<br/>").count(), 1);
    assert!(!book.content.contains("<p>"));
}

#[test]
fn test_escaping_example() {
    let book = convert_str("a & b < c > d\n", ConvertConfig::default());
    assert!(book.content.contains("<p>a &amp; b &lt; c &gt; d</p>"));
}

#[test]
fn test_emphasis_example() {
    let book = convert_str("_hi_\n", ConvertConfig::default());
    assert!(book.content.contains("<p><em>hi</em></p>"));
}

// ============================================================================
// Policies
// ============================================================================

#[test]
fn test_navigation_labels_are_escaped() {
    let book = convert_str("*1*Cats & <Dogs>\n", ConvertConfig::default());

    // The entry keeps the raw label; the rendered NCX escapes it.
    assert_eq!(book.nav_points[0].label, "*1*Cats & <Dogs>");
    assert!(book.navigation.contains("<text>*1*Cats &amp; &lt;Dogs&gt;</text>"));
    assert!(!book.navigation.contains("<Dogs>"));
}

#[test]
fn test_loose_markers_only_counted_under_loose_rule() {
    let text = "*1*One\n*2 Aside\n*3*Three\n";

    let strict = convert_str(text, ConvertConfig::default());
    assert_eq!(strict.chapter_count(), 2);
    assert!(strict.content.contains("<h4>*2 Aside</h4>"));
    assert!(strict.content.contains("<h2 id=\"chap2\">*3*Three</h2>"));

    let loose = convert_str(
        text,
        ConvertConfig::default().with_chapter_rule(ChapterRule::Loose),
    );
    assert_eq!(loose.chapter_count(), 3);
    assert!(loose.content.contains("<h2 id=\"chap2\">*2 Aside</h2>"));
}

#[test]
fn test_unmatched_emphasis_policies() {
    let closed = convert_str("an_open\n", ConvertConfig::default());
    assert!(closed.content.contains("<p>an<em>open</em></p>"));

    let open = convert_str(
        "an_open\n",
        ConvertConfig::default().with_emphasis(EmphasisPolicy::LeaveOpen),
    );
    assert!(open.content.contains("<p>an<em>open</p>"));
}

#[test]
fn test_later_metadata_overwrites_earlier() {
    let book = convert_str(
        "# Title: First\ntext\n# Title: Second\n",
        ConvertConfig::default(),
    );
    assert_eq!(book.metadata.title, "Second");
    assert!(book.content.contains("<title>Second</title>"));
    assert!(book.navigation.contains("<text>Second</text>"));
}

#[test]
fn test_defaults_without_declarations() {
    let book = convert_str("just text\n", ConvertConfig::default());
    assert_eq!(book.metadata.title, "Untitled");
    assert_eq!(book.metadata.author, "Unknown");
    assert_eq!(book.metadata.year, "");
    assert!(book.nav_points.is_empty());
}

#[test]
fn test_empty_input() {
    let book = convert_str("", ConvertConfig::default());
    assert!(book.content.contains("<body>\n</body>"));
    assert!(book.navigation.contains("<navMap>\n  </navMap>"));
}

// ============================================================================
// Properties
// ============================================================================

fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z &<>_]{0,20}",
        "#{1,3} [a-z_&]{0,10}",
        "\\*[0-9]\\*[a-z <&]{0,10}",
        "\\*[0-9][a-z ]{0,10}",
        Just(String::new()),
        "## (Title|Author|Year): [a-z0-9]{0,8}",
    ]
}

fn document_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(line_strategy(), 0..40).prop_map(|lines| {
        lines.into_iter().map(|l| l + "\n").collect::<String>()
    })
}

proptest! {
    #[test]
    fn prop_escape_leaves_no_raw_specials(s in any::<String>()) {
        let escaped = escape_text(&s);
        prop_assert!(!escaped.contains('<'));
        prop_assert!(!escaped.contains('>'));
        for (pos, _) in escaped.match_indices('&') {
            let rest = &escaped[pos..];
            prop_assert!(
                rest.starts_with("&amp;") || rest.starts_with("&lt;") || rest.starts_with("&gt;")
            );
        }
    }

    #[test]
    fn prop_content_and_navigation_ids_agree(text in document_strategy()) {
        let book = convert_str(&text, ConvertConfig::default());

        let markers = text
            .lines()
            .filter(|line| {
                let b = line.as_bytes();
                b.len() >= 3 && b[0] == b'*' && b[1].is_ascii_digit() && b[2] == b'*'
            })
            .count();
        prop_assert_eq!(book.nav_points.len(), markers);

        let anchors = content_anchor_ids(&book.content);
        let nav_ids: Vec<_> = book.nav_points.iter().map(|p| p.id.clone()).collect();
        prop_assert_eq!(anchors, nav_ids);
    }

    #[test]
    fn prop_play_order_is_gapless(text in document_strategy()) {
        let book = convert_str(
            &text,
            ConvertConfig::default().with_chapter_rule(ChapterRule::Loose),
        );
        let orders: Vec<_> = book.nav_points.iter().map(|p| p.play_order).collect();
        let expected: Vec<_> = (1..=book.nav_points.len()).collect();
        prop_assert_eq!(orders, expected);
    }

    #[test]
    fn prop_conversion_is_deterministic(text in document_strategy()) {
        let first = convert_str(&text, ConvertConfig::default());
        let second = convert_str(&text, ConvertConfig::default());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_closed_emphasis_balances(line in "[a-z_]{0,30}") {
        let book = convert_str(&format!("{line}\n"), ConvertConfig::default());
        prop_assert_eq!(
            book.content.matches("<em>").count(),
            book.content.matches("</em>").count()
        );
    }
}
