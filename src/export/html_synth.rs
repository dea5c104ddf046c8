//! Content document synthesis.

use crate::markdown::escape_into;

/// Wrap converted body fragments in a complete XHTML document.
///
/// `body` must already be markup; `title` is escaped here.
///
/// # Example
///
/// ```
/// use bm2epub::export::synthesize_xhtml_document;
///
/// let doc = synthesize_xhtml_document("A & B", "<p>x</p>\n");
/// assert!(doc.contains("<title>A &amp; B</title>"));
/// assert!(doc.contains("<body>\n<p>x</p>\n</body>"));
/// ```
pub fn synthesize_xhtml_document(title: &str, body: &str) -> String {
    let mut doc = String::with_capacity(body.len() + 320);

    doc.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml">
<head>
  <meta http-equiv="Content-Type" content="application/xhtml+xml; charset=utf-8"/>
  <title>"#,
    );
    escape_into(&mut doc, title);
    doc.push_str("</title>\n</head>\n<body>\n");
    doc.push_str(body);
    doc.push_str("</body>\n</html>\n");

    doc
}
