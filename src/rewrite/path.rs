//! Percent-encoding helpers for request paths.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::rewrite::RewriteError;

/// Bytes escaped when a decoded path is turned back into a request target.
///
/// Everything outside unreserved characters and the path sub-delimiters
/// (`!$&'()*+,;=:@/`) is escaped, including `%` itself.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Strictly percent-decode a path.
///
/// Fails if a `%` is not followed by two hex digits or if the decoded bytes
/// are not UTF-8.
pub fn decode_path(raw: &str) -> Result<String, RewriteError> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(RewriteError::PathDecode(raw.to_string()));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    percent_decode_str(raw)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| RewriteError::PathDecode(raw.to_string()))
}

/// Escape a decoded path so it can be used in a request target.
pub fn encode_path(decoded: &str) -> String {
    utf8_percent_encode(decoded, PATH).to_string()
}
