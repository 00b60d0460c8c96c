//! Percent-encoding for ids spliced into API paths.
//!
//! Connection ids come from users and config files. Unencoded, an id like
//! `a/b` reaches a different route and `x?y` starts a query string.

use percent_encoding::{AsciiSet, CONTROLS, percent_encode};

/// Bytes escaped inside one path segment.
pub const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
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
    .add(b'}')
    .add(b'+')
    .add(b',')
    .add(b';');

/// Encode `segment` so it stays a single path segment.
///
/// ```
/// use tower_client::endpoints::encode_path_segment;
///
/// assert_eq!(encode_path_segment("shop/main"), "shop%2Fmain");
/// ```
pub fn encode_path_segment(segment: &str) -> String {
    percent_encode(segment.as_bytes(), PATH_SEGMENT_ENCODE_SET).to_string()
}
