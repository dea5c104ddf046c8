//! Utility functions.

use std::borrow::Cow;

/// Decode bytes to a string, handling legacy encodings.
///
/// The encoding is chosen once for the whole input:
/// 1. Valid UTF-8 is returned as is (a BOM is stripped).
/// 2. Input containing at least one valid multi-byte UTF-8 sequence is
///    treated as UTF-8, and only the malformed sequences become U+FFFD.
/// 3. Anything else falls back to Windows-1252 (common in older text files).
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed || has_utf8_sequence(bytes) {
        return result;
    }

    // Fallback: Windows-1252 (superset of ISO-8859-1)
    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Whether `bytes` holds any well-formed non-ASCII UTF-8 character.
fn has_utf8_sequence(bytes: &[u8]) -> bool {
    bytes.utf8_chunks().any(|chunk| !chunk.valid().is_ascii())
}
