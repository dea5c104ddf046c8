//! Inline emphasis formatting.

use super::escape::escape_into;

/// Character that toggles emphasis on and off.
pub const EMPHASIS_MARKER: char = '_';

/// What to do with emphasis still open when a line ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmphasisPolicy {
    /// Append a closing tag so every fragment is well formed.
    #[default]
    CloseAtEndOfLine,
    /// Emit the line exactly as scanned, leaving the `<em>` unclosed.
    LeaveOpen,
}

/// Format one line, toggling `<em>` at each underscore and escaping
/// everything else.
///
/// Emphasis state never carries over from one call to the next.
///
/// # Examples
///
/// ```
/// use bm2epub::markdown::{EmphasisPolicy, format_inline};
///
/// assert_eq!(format_inline("_hi_", EmphasisPolicy::default()), "<em>hi</em>");
/// assert_eq!(format_inline("a_b", EmphasisPolicy::LeaveOpen), "a<em>b");
/// ```
pub fn format_inline(line: &str, policy: EmphasisPolicy) -> String {
    let mut out = String::with_capacity(line.len() + 16);
    format_inline_into(&mut out, line, policy);
    out
}

/// Like [`format_inline`], appending to `out`.
pub fn format_inline_into(out: &mut String, line: &str, policy: EmphasisPolicy) {
    let mut emphasis = false;
    for (i, run) in line.split(EMPHASIS_MARKER).enumerate() {
        if i > 0 {
            out.push_str(if emphasis { "</em>" } else { "<em>" });
            emphasis = !emphasis;
        }
        escape_into(out, run);
    }
    if emphasis && policy == EmphasisPolicy::CloseAtEndOfLine {
        out.push_str("</em>");
    }
}
