use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::{CompressionMethod, ZipArchive};

use crate::book::{Metadata, NavPoint};
use crate::error::{Error, Result};
use crate::util::decode_text;

/// What a package declares about itself: OPF metadata, reading order and
/// NCX entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageInfo {
    pub metadata: Metadata,
    pub language: String,
    /// Content document hrefs in spine order.
    pub spine: Vec<String>,
    /// NCX entries in document order.
    pub nav_points: Vec<NavPoint>,
}

/// Parsed OPF content
struct OpfData {
    metadata: Metadata,
    language: String,
    /// Maps manifest id -> href
    manifest: HashMap<String, String>,
    spine_ids: Vec<String>,
    toc_id: Option<String>,
}

/// Read the package information of an EPUB file on disk.
///
/// # Example
///
/// ```no_run
/// use bm2epub::read_package;
///
/// let info = read_package("book.epub")?;
/// println!("Title: {}", info.metadata.title);
/// # Ok::<(), bm2epub::Error>(())
/// ```
pub fn read_package<P: AsRef<Path>>(path: P) -> Result<PackageInfo> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::unavailable(path, e))?;
    read_package_from_reader(BufReader::new(file))
}

/// Read the package information from any [`Read`] + [`Seek`] source.
pub fn read_package_from_reader<R: Read + Seek>(reader: R) -> Result<PackageInfo> {
    let mut archive = ZipArchive::new(reader)?;

    // 1. The mimetype marker must be the first, stored entry
    check_mimetype(&mut archive)?;

    // 2. Find the OPF file path from container.xml
    let opf_path = find_opf_path(&mut archive)?;
    let opf_dir = Path::new(&opf_path)
        .parent()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default();

    // 3. Parse the OPF file
    let opf_content = read_archive_file(&mut archive, &opf_path)?;
    let OpfData {
        metadata,
        language,
        manifest,
        spine_ids,
        toc_id,
    } = parse_opf(&opf_content)?;

    let spine = spine_ids
        .iter()
        .filter_map(|id| manifest.get(id).cloned())
        .collect();

    // 4. Parse the NCX (if referenced)
    let nav_points = match toc_id.as_ref().and_then(|id| manifest.get(id)) {
        Some(href) => {
            let ncx_content = read_archive_file(&mut archive, &resolve_path(&opf_dir, href))?;
            parse_ncx(&ncx_content)?
        }
        None => Vec::new(),
    };

    Ok(PackageInfo {
        metadata,
        language,
        spine,
        nav_points,
    })
}

fn check_mimetype<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<()> {
    if archive.len() == 0 {
        return Err(Error::InvalidEpub("empty archive".into()));
    }
    let mut first = archive.by_index(0)?;
    if first.name() != "mimetype" {
        return Err(Error::InvalidEpub(format!(
            "first entry is {:?}, expected \"mimetype\"",
            first.name()
        )));
    }
    if first.compression() != CompressionMethod::Stored {
        return Err(Error::InvalidEpub("mimetype entry is compressed".into()));
    }
    let mut contents = Vec::new();
    first.read_to_end(&mut contents)?;
    if contents != b"application/epub+zip" {
        return Err(Error::InvalidEpub("unexpected mimetype".into()));
    }
    Ok(())
}

fn find_opf_path<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String> {
    let container = read_archive_file(archive, "META-INF/container.xml")?;

    let mut reader = Reader::from_str(&container);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"rootfile" => {
                if let Some(path) = attribute(&e, b"full-path")? {
                    return Ok(path);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e)),
            _ => {}
        }
    }

    Err(Error::InvalidEpub(
        "No rootfile found in container.xml".into(),
    ))
}

fn parse_opf(content: &str) -> Result<OpfData> {
    let mut reader = Reader::from_str(content);

    let mut metadata = Metadata::default();
    let mut language = String::new();
    let mut manifest: HashMap<String, String> = HashMap::new();
    let mut spine_ids: Vec<String> = Vec::new();
    let mut toc_id: Option<String> = None;

    let mut in_metadata = false;
    let mut current_element: Option<Vec<u8>> = None;
    let mut buf_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"metadata" => in_metadata = true,
                    local @ (b"title" | b"creator" | b"date" | b"identifier" | b"language") => {
                        if in_metadata {
                            current_element = Some(local.to_vec());
                            buf_text.clear();
                        }
                    }
                    b"spine" => toc_id = attribute(&e, b"toc")?,
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) => {
                let name = e.name();
                match local_name(name.as_ref()) {
                    b"item" => {
                        if let (Some(id), Some(href)) =
                            (attribute(&e, b"id")?, attribute(&e, b"href")?)
                        {
                            manifest.insert(id, href);
                        }
                    }
                    b"itemref" => {
                        if let Some(idref) = attribute(&e, b"idref")? {
                            spine_ids.push(idref);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                if current_element.is_some() {
                    buf_text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if current_element.is_some() {
                    buf_text.push_str(&resolve_entity(&String::from_utf8_lossy(e.as_ref())));
                }
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                if local_name(name.as_ref()) == b"metadata" {
                    in_metadata = false;
                }

                if let Some(elem) = current_element.take() {
                    let value = std::mem::take(&mut buf_text);
                    match elem.as_slice() {
                        b"title" => metadata.title = value,
                        b"creator" => metadata.author = value,
                        b"date" => metadata.year = value,
                        b"identifier" => metadata.identifier = value,
                        b"language" => language = value,
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e)),
            _ => {}
        }
    }

    Ok(OpfData {
        metadata,
        language,
        manifest,
        spine_ids,
        toc_id,
    })
}

fn parse_ncx(content: &str) -> Result<Vec<NavPoint>> {
    let mut reader = Reader::from_str(content);

    let mut entries = Vec::new();
    let mut current: Option<NavPoint> = None;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match local_name(e.name().as_ref()) {
                b"navPoint" => {
                    let play_order = attribute(&e, b"playOrder")?
                        .and_then(|order| order.parse().ok())
                        .unwrap_or(0);
                    current = Some(NavPoint {
                        id: attribute(&e, b"id")?.unwrap_or_default(),
                        play_order,
                        label: String::new(),
                        href: String::new(),
                    });
                }
                b"text" => in_text = current.is_some(),
                _ => {}
            },
            Ok(Event::Empty(e)) => {
                if local_name(e.name().as_ref()) == b"content"
                    && let Some(point) = current.as_mut()
                {
                    point.href = attribute(&e, b"src")?.unwrap_or_default();
                }
            }
            Ok(Event::Text(e)) => {
                if in_text && let Some(point) = current.as_mut() {
                    point.label.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if in_text && let Some(point) = current.as_mut() {
                    point
                        .label
                        .push_str(&resolve_entity(&String::from_utf8_lossy(e.as_ref())));
                }
            }
            Ok(Event::End(e)) => match local_name(e.name().as_ref()) {
                b"text" => in_text = false,
                b"navPoint" => entries.extend(current.take()),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e)),
            _ => {}
        }
    }

    Ok(entries)
}

fn attribute(element: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes().flatten() {
        if attr.key.as_ref() == key {
            return Ok(Some(String::from_utf8(attr.value.to_vec())?));
        }
    }
    Ok(None)
}

/// Resolve a predefined or numeric entity reference (without `&` and `;`).
fn resolve_entity(entity: &str) -> String {
    let numeric = entity
        .strip_prefix("#x")
        .and_then(|hex| u32::from_str_radix(hex, 16).ok())
        .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()));
    if let Some(c) = numeric.and_then(char::from_u32) {
        return c.to_string();
    }
    match entity {
        "apos" => "'",
        "quot" => "\"",
        "lt" => "<",
        "gt" => ">",
        "amp" => "&",
        _ => "",
    }
    .to_string()
}

fn read_archive_file<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive.by_name(path)?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)?;
    Ok(decode_text(&contents).into_owned())
}

fn resolve_path(base: &str, href: &str) -> String {
    if base.is_empty() {
        href.to_string()
    } else {
        format!("{}/{}", base, href)
    }
}

/// Extract local name from potentially namespaced XML name
fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"dc:title"), b"title");
        assert_eq!(local_name(b"title"), b"title");
        assert_eq!(local_name(b"opf:meta"), b"meta");
    }

    #[test]
    fn test_resolve_entity() {
        assert_eq!(resolve_entity("amp"), "&");
        assert_eq!(resolve_entity("#39"), "'");
        assert_eq!(resolve_entity("#x2014"), "\u{2014}");
        assert_eq!(resolve_entity("nbsp"), "");
    }

    #[test]
    fn test_parse_opf() {
        let opf = r#"<?xml version="1.0"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>Tom &amp; Jerry</dc:title>
    <dc:creator>Ada</dc:creator>
    <dc:date>1990</dc:date>
    <dc:language>en</dc:language>
  </metadata>
  <manifest>
    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
    <item id="content" href="content.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine toc="ncx"><itemref idref="content"/></spine>
</package>"#;
        let data = parse_opf(opf).unwrap();
        assert_eq!(data.metadata.title, "Tom & Jerry");
        assert_eq!(data.metadata.author, "Ada");
        assert_eq!(data.metadata.year, "1990");
        assert_eq!(data.language, "en");
        assert_eq!(data.spine_ids, vec!["content"]);
        assert_eq!(data.toc_id.as_deref(), Some("ncx"));
        assert_eq!(data.manifest["content"], "content.xhtml");
    }

    #[test]
    fn test_parse_ncx_skips_doc_title() {
        let ncx = r#"<ncx>
  <docTitle><text>Book</text></docTitle>
  <navMap>
    <navPoint id="chap1" playOrder="1">
      <navLabel><text>*1* Tom &amp; Jerry</text></navLabel>
      <content src="content.xhtml#chap1"/>
    </navPoint>
  </navMap>
</ncx>"#;
        let entries = parse_ncx(ncx).unwrap();
        assert_eq!(entries, vec![NavPoint::for_chapter(1, "*1* Tom & Jerry")]);
    }
}
