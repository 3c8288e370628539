//! Content-Disposition header parsing (filename and filename*).

use percent_encoding::percent_decode_str;
use std::fmt;

/// Why a Content-Disposition value was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentDispositionError {
    /// The disposition type before the first `;` is empty or not a token.
    InvalidType,
    /// A parameter is missing `=`, has a non-token name or value, runs into
    /// garbage after its value, or repeats an earlier parameter name.
    InvalidParameter,
    /// A quoted value has no closing quote.
    UnterminatedQuote,
}

impl fmt::Display for ContentDispositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentDispositionError::InvalidType => write!(f, "no valid disposition type"),
            ContentDispositionError::InvalidParameter => write!(f, "invalid media parameter"),
            ContentDispositionError::UnterminatedQuote => write!(f, "unterminated quoted string"),
        }
    }
}

impl std::error::Error for ContentDispositionError {}

/// Extracts the filename from a raw Content-Disposition header value.
///
/// Supports:
/// - `filename="value"` (quoted; strips quotes and unescapes)
/// - `filename=value` (token)
/// - `filename*=UTF-8''percent-encoded` (RFC 5987; decoded)
///
/// If both `filename` and `filename*` exist, `filename*` takes precedence.
/// A well-formed header without a filename yields `Ok(None)`.
pub fn parse_content_disposition_filename(
    header_value: &str,
) -> Result<Option<String>, ContentDispositionError> {
    let (disposition, mut rest) = match header_value.split_once(';') {
        Some((d, r)) => (d.trim(), r),
        None => (header_value.trim(), ""),
    };
    if disposition.is_empty() || !disposition.chars().all(is_token_char) {
        return Err(ContentDispositionError::InvalidType);
    }

    let mut filename_from_token: Option<String> = None;
    let mut filename_extended: Option<String> = None;
    let mut seen: Vec<String> = Vec::new();

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        let (name, value, tail) = next_param(rest)?;
        let key = name.to_ascii_lowercase();
        if seen.contains(&key) {
            return Err(ContentDispositionError::InvalidParameter);
        }
        seen.push(key);
        if name.eq_ignore_ascii_case("filename*") {
            filename_extended = decode_ext_value(&value);
        } else if name.eq_ignore_ascii_case("filename") {
            filename_from_token = Some(value);
        }
        rest = tail;
    }

    Ok(filename_extended
        .or(filename_from_token)
        .filter(|s| !s.is_empty()))
}

/// Splits `name=value` off the front of `input` and returns the text after
/// the separating `;`.
fn next_param(input: &str) -> Result<(&str, String, &str), ContentDispositionError> {
    let (name, after) = input
        .split_once('=')
        .ok_or(ContentDispositionError::InvalidParameter)?;
    let name = name.trim();
    if name.is_empty() || !name.chars().all(is_token_char) {
        return Err(ContentDispositionError::InvalidParameter);
    }

    let after = after.trim_start();
    let (value, tail) = match after.strip_prefix('"') {
        Some(quoted) => read_quoted(quoted)?,
        None => {
            let end = after.find(';').unwrap_or(after.len());
            let token = after[..end].trim_end();
            if token.is_empty() || !token.chars().all(is_token_char) {
                return Err(ContentDispositionError::InvalidParameter);
            }
            (token.to_string(), &after[end..])
        }
    };

    let tail = tail.trim_start();
    if tail.is_empty() {
        return Ok((name, value, tail));
    }
    match tail.strip_prefix(';') {
        Some(t) => Ok((name, value, t)),
        None => Err(ContentDispositionError::InvalidParameter),
    }
}

/// Reads a quoted-string body (opening quote already consumed), decoding
/// backslash escapes.
fn read_quoted(input: &str) -> Result<(String, &str), ContentDispositionError> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((out, &input[i + 1..])),
            '\\' => match chars.next() {
                Some((_, escaped)) => out.push(escaped),
                None => break,
            },
            _ => out.push(c),
        }
    }
    Err(ContentDispositionError::UnterminatedQuote)
}

/// Decodes an RFC 5987 `charset'language'value`. Only UTF-8 and US-ASCII
/// are understood; anything else is ignored.
fn decode_ext_value(value: &str) -> Option<String> {
    let mut parts = value.splitn(3, '\'');
    let charset = parts.next()?;
    let _language = parts.next()?;
    let encoded = parts.next()?;
    if !charset.eq_ignore_ascii_case("utf-8") && !charset.eq_ignore_ascii_case("us-ascii") {
        return None;
    }
    Some(percent_decode(encoded))
}

/// Percent-decode; malformed escapes are kept literally, invalid UTF-8 is
/// replaced.
pub(super) fn percent_decode(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().into_owned()
}

/// RFC 2045 token character: visible ASCII minus tspecials.
fn is_token_char(c: char) -> bool {
    c.is_ascii_graphic() && !"()<>@,;:\\\"/[]?=".contains(c)
}
