//! NCX navigation document.

use crate::book::{Metadata, NavPoint};
use crate::markdown::{escape_attr, escape_text};

/// Render the NCX for `nav_points`, in the order given.
///
/// Play order and ids come from the entries themselves; labels are escaped.
pub fn generate_ncx(metadata: &Metadata, nav_points: &[NavPoint]) -> String {
    let mut ncx = String::new();

    ncx.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
    <meta name="dtb:uid" content=""#,
    );
    ncx.push_str(&escape_attr(&metadata.identifier));
    ncx.push_str(
        r#""/>
    <meta name="dtb:depth" content="1"/>
    <meta name="dtb:totalPageCount" content="0"/>
    <meta name="dtb:maxPageNumber" content="0"/>
  </head>
  <docTitle>
    <text>"#,
    );
    ncx.push_str(&escape_text(&metadata.title));
    ncx.push_str(
        r#"</text>
  </docTitle>
  <docAuthor>
    <text>"#,
    );
    ncx.push_str(&escape_text(&metadata.author));
    ncx.push_str(
        r#"</text>
  </docAuthor>
  <navMap>
"#,
    );

    for point in nav_points {
        write_nav_point(&mut ncx, point);
    }

    ncx.push_str("  </navMap>\n</ncx>\n");
    ncx
}

fn write_nav_point(ncx: &mut String, point: &NavPoint) {
    ncx.push_str(&format!(
        "    <navPoint id=\"{}\" playOrder=\"{}\">\n",
        escape_attr(&point.id),
        point.play_order
    ));
    ncx.push_str(&format!(
        "      <navLabel>\n        <text>{}</text>\n      </navLabel>\n",
        escape_text(&point.label)
    ));
    ncx.push_str(&format!(
        "      <content src=\"{}\"/>\n",
        escape_attr(&point.href)
    ));
    ncx.push_str("    </navPoint>\n");
}
