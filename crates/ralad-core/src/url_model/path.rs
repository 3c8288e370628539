//! Filename candidates from the URL path.

use super::content_disposition::percent_decode;
use url::Url;

/// Path segments of `url` with the outer slashes trimmed. Inner empty
/// segments (`a//b`) are kept so that joining stays faithful to the path.
/// An empty path yields a single empty segment.
pub fn path_segments(url: &Url) -> Vec<String> {
    url.path()
        .trim_matches('/')
        .split('/')
        .map(decode_segment)
        .collect()
}

/// Percent-decodes a segment unless decoding would smuggle in a path
/// separator or a control character, in which case the raw form is kept.
fn decode_segment(raw: &str) -> String {
    let decoded = percent_decode(raw);
    if decoded
        .chars()
        .any(|c| c == '/' || c == '\\' || c.is_control())
    {
        raw.to_string()
    } else {
        decoded
    }
}
