//! ASCII-only JSON for HTTP header values.
//!
//! Header values are restricted to visible ASCII. JSON produced by serde_json keeps
//! non-ASCII characters as raw UTF-8, so they are rewritten as `\uXXXX` escapes here.
//! Characters outside the Basic Multilingual Plane become a UTF-16 surrogate pair.

use std::fmt::Write as _;

/// Escapes every non-ASCII character (and DEL) in a serialized JSON document.
///
/// The input must already be valid JSON. Non-ASCII characters can only appear inside
/// string literals there, where a `\uXXXX` escape decodes back to the same character.
pub fn escape_non_ascii(json: &str) -> String {
    let mut escaped = String::with_capacity(json.len());
    let mut units = [0u16; 2];

    for c in json.chars() {
        if c < '\u{7f}' {
            escaped.push(c);
            continue;
        }
        for unit in c.encode_utf16(&mut units) {
            // Writing to a String cannot fail
            let _ = write!(escaped, "\\u{unit:04x}");
        }
    }

    escaped
}
