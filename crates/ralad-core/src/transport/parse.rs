//! Assemble raw header lines from libcurl into a ResponseHead.

use super::ResponseHead;

/// Accumulates header lines of one exchange. Interim (1xx) responses and
/// proxy CONNECT replies are discarded when the next status line arrives.
#[derive(Debug, Default)]
pub(crate) struct HeadParser {
    status_code: Option<u32>,
    status: String,
    headers: Vec<(String, String)>,
}

impl HeadParser {
    /// Feeds one header line (with or without CRLF). Returns the finished
    /// head on the blank line that ends a final (non-1xx) response.
    pub(crate) fn feed(&mut self, line: &str) -> Option<ResponseHead> {
        let line = line.trim_end_matches(&['\r', '\n'][..]);

        if line.is_empty() {
            let code = self.status_code?;
            if (100..200).contains(&code) {
                *self = HeadParser::default();
                return None;
            }
            let head = ResponseHead {
                status_code: code,
                status: std::mem::take(&mut self.status),
                headers: std::mem::take(&mut self.headers),
            };
            self.status_code = None;
            return Some(head);
        }

        if let Some((code, status)) = parse_status_line(line) {
            self.status_code = Some(code);
            self.status = status;
            self.headers.clear();
            return None;
        }

        if let Some((name, value)) = line.split_once(':') {
            self.headers
                .push((name.trim().to_string(), value.trim().to_string()));
        }
        None
    }
}

/// Parses `HTTP/1.1 301 Moved Permanently` into `(301, "301 Moved Permanently")`.
fn parse_status_line(line: &str) -> Option<(u32, String)> {
    let rest = line.strip_prefix("HTTP/")?;
    let (_version, rest) = rest.split_once(' ')?;
    let rest = rest.trim();
    let code_str = rest.split_whitespace().next()?;
    let code = code_str.parse::<u32>().ok()?;
    Some((code, rest.to_string()))
}
