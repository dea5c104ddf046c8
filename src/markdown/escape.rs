//! Markup escaping for user-supplied text.
//!
//! Only the three characters that can break element content are replaced:
//! `&`, `<` and `>`. Runs of ordinary text are copied in bulk between
//! `memchr3` hits.

use std::borrow::Cow;

use memchr::{memchr3, memchr3_iter};

/// Escape text for use as element content.
///
/// Returns the input unchanged (borrowed) when it contains nothing to escape.
///
/// # Examples
///
/// ```
/// use bm2epub::markdown::escape_text;
///
/// assert_eq!(escape_text("a & b < c > d"), "a &amp; b &lt; c &gt; d");
/// assert_eq!(escape_text("\"quoted\""), "\"quoted\"");
/// ```
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if memchr3(b'&', b'<', b'>', text.as_bytes()).is_none() {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    escape_into(&mut out, text);
    Cow::Owned(out)
}

/// Append `text` to `out`, escaping `&`, `<` and `>`.
pub fn escape_into(out: &mut String, text: &str) {
    let bytes = text.as_bytes();
    let mut start = 0;
    for pos in memchr3_iter(b'&', b'<', b'>', bytes) {
        // All three needles are ASCII, so `pos` is always a char boundary.
        out.push_str(&text[start..pos]);
        out.push_str(match bytes[pos] {
            b'&' => "&amp;",
            b'<' => "&lt;",
            _ => "&gt;",
        });
        start = pos + 1;
    }
    out.push_str(&text[start..]);
}

/// Escape text for use inside an attribute value or package metadata.
///
/// Unlike [`escape_text`] this also escapes quotes.
pub fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&apos;"),
            _ => result.push(c),
        }
    }
    result
}
