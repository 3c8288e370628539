//! URL modeling and filename derivation.
//!
//! Picks the output filename for a response by walking a fallback chain and
//! keeping the first candidate that is significant: not empty, not an index
//! placeholder, and not already present in the target directory.

mod content_disposition;
mod path;
mod sanitize;

pub use content_disposition::{parse_content_disposition_filename, ContentDispositionError};
pub use path::path_segments;
pub use sanitize::sanitize_filename;

use crate::console::Console;
use std::path::Path;
use url::Url;

/// Last-resort filename when nothing in the response is usable.
pub const FALLBACK_FILENAME: &str = "ralad.out";

const NAME_SEP: &str = "_";
const MAX_NUM_SUFFIX: u32 = 100_000;
const PLACEHOLDERS: [&str; 4] = ["", "/", "index.html", "index.htm"];

/// `host[:port]` as written in the URL (default ports are omitted).
pub fn authority(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

/// True when both URLs share scheme, host and effective port.
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

/// Whether `name` is worth using as an output filename inside `dir`.
///
/// Existence is checked without following symlinks, so a dangling link
/// also counts as taken.
pub fn is_significant(dir: &Path, name: &str) -> bool {
    if PLACEHOLDERS.contains(&name) {
        return false;
    }
    dir.join(name).symlink_metadata().is_err()
}

/// Derives the output filename for a response fetched from `url` (the final
/// URL after redirects).
///
/// Order: Content-Disposition filename, last path segment, whole path joined
/// with `_`, host prefixed to that, then `ralad.out` and `ralad.out.N`.
/// Returns `None` only when every numbered fallback is taken.
///
/// # Examples
///
/// - `https://example.com/a/b/f4.tgz` → `f4.tgz`
/// - `https://example.com/a/b/index.html` → `a_b_index.html`
/// - `https://example.com/index.html` → `example.com_index.html`
/// - `https://example.com/` → `example.com_`
pub fn derive_filename(
    dir: &Path,
    url: &Url,
    content_disposition: Option<&str>,
    console: &mut Console,
) -> Option<String> {
    derive_filename_bounded(dir, url, content_disposition, console, MAX_NUM_SUFFIX)
}

fn derive_filename_bounded(
    dir: &Path,
    url: &Url,
    content_disposition: Option<&str>,
    console: &mut Console,
    max_suffix: u32,
) -> Option<String> {
    if let Some(value) = content_disposition {
        tracing::debug!(header = value, "found Content-Disposition header");
        match parse_content_disposition_filename(value) {
            Ok(Some(raw)) => {
                let name = sanitize_filename(raw.trim_matches('/'));
                tracing::debug!(name = %name, "filename from Content-Disposition");
                if is_significant(dir, &name) {
                    return Some(name);
                }
            }
            Ok(None) => {}
            Err(e) => {
                console.warn(format_args!(
                    "failed to parse Content-Disposition header: {}",
                    e
                ));
            }
        }
    }

    let segments = path_segments(url);
    let last = segments.last().map(String::as_str).unwrap_or_default();
    if is_significant(dir, last) {
        tracing::debug!("last path element is significant");
        return Some(last.to_string());
    }

    let joined = segments.join(NAME_SEP);
    if is_significant(dir, &joined) {
        tracing::debug!("full path is significant");
        return Some(joined);
    }

    let prefixed = format!("{}{}{}", authority(url), NAME_SEP, joined);
    if is_significant(dir, &prefixed) {
        tracing::debug!("host + full path is significant");
        return Some(prefixed);
    }

    numbered_fallback(dir, max_suffix)
}

/// `ralad.out`, then `ralad.out.1` up to `ralad.out.<max_suffix - 1>`.
fn numbered_fallback(dir: &Path, max_suffix: u32) -> Option<String> {
    if is_significant(dir, FALLBACK_FILENAME) {
        tracing::debug!("fallback output file name is significant");
        return Some(FALLBACK_FILENAME.to_string());
    }
    let found = (1..max_suffix)
        .map(|i| format!("{}.{}", FALLBACK_FILENAME, i))
        .find(|name| is_significant(dir, name));
    if found.is_none() {
        tracing::warn!(dir = %dir.display(), "every fallback filename is taken");
    }
    found
}
