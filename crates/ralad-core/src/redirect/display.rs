//! How a redirect target is shown in prompts and notices.

use crate::error::RaladError;
use crate::url_model::authority;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Longest URL shown verbatim in `truncate` mode.
const MAX_REDIRECT_STRLEN: usize = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectDisplay {
    /// The whole URL.
    Full,
    /// Scheme and host only.
    Part,
    /// The whole URL, cut to 72 characters.
    #[default]
    Truncate,
}

impl FromStr for RedirectDisplay {
    type Err = RaladError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(RedirectDisplay::Full),
            "part" => Ok(RedirectDisplay::Part),
            "truncate" => Ok(RedirectDisplay::Truncate),
            other => Err(RaladError::InvalidDisplay(other.to_string())),
        }
    }
}

impl fmt::Display for RedirectDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RedirectDisplay::Full => "full",
            RedirectDisplay::Part => "part",
            RedirectDisplay::Truncate => "truncate",
        };
        f.write_str(s)
    }
}

/// Renders `url` according to `mode`.
pub fn display_url(url: &Url, mode: RedirectDisplay) -> String {
    match mode {
        RedirectDisplay::Full => url.to_string(),
        RedirectDisplay::Part => format!("{}://{}...", url.scheme(), authority(url)),
        RedirectDisplay::Truncate => {
            let s = url.as_str();
            if s.chars().count() > MAX_REDIRECT_STRLEN {
                let head: String = s.chars().take(MAX_REDIRECT_STRLEN - 1).collect();
                format!("{}...", head)
            } else {
                s.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: [RedirectDisplay; 3] = [
        RedirectDisplay::Truncate,
        RedirectDisplay::Part,
        RedirectDisplay::Full,
    ];

    fn check(url: &str, want: [&str; 3]) {
        let url = Url::parse(url).unwrap();
        for (mode, want) in MODES.into_iter().zip(want) {
            assert_eq!(display_url(&url, mode), want, "mode {}", mode);
        }
    }

    #[test]
    fn short_url() {
        check(
            "http://www.example.com/file one&two",
            [
                "http://www.example.com/file%20one&two",
                "http://www.example.com...",
                "http://www.example.com/file%20one&two",
            ],
        );
    }

    #[test]
    fn long_url() {
        let long = "https://www1.bla.blu.example.com/feawf/gser/gawef/agae/rfaw/efaw/eg/aerfa/w/fawg/awef/awet/t/4t3/a/wgw34/43t/t34/t34g/aw4f/f4.zip";
        check(
            long,
            [
                "https://www1.bla.blu.example.com/feawf/gser/gawef/agae/rfaw/efaw/eg/aer...",
                "https://www1.bla.blu.example.com...",
                long,
            ],
        );
    }

    #[test]
    fn truncate_boundary() {
        let base = "http://example.com/";
        let exact = format!("{}{}", base, "a".repeat(MAX_REDIRECT_STRLEN - base.len()));
        assert_eq!(exact.len(), 72);
        let url = Url::parse(&exact).unwrap();
        assert_eq!(display_url(&url, RedirectDisplay::Truncate), exact);

        let over = format!("{}b", exact);
        let url = Url::parse(&over).unwrap();
        let shown = display_url(&url, RedirectDisplay::Truncate);
        assert_eq!(shown, format!("{}...", &exact[..71]));
        assert_eq!(shown.len(), 74);
    }

    #[test]
    fn part_keeps_explicit_port() {
        let url = Url::parse("http://127.0.0.1:8080/x").unwrap();
        assert_eq!(display_url(&url, RedirectDisplay::Part), "http://127.0.0.1:8080...");
    }

    #[test]
    fn parse_modes() {
        assert_eq!("part".parse::<RedirectDisplay>().unwrap(), RedirectDisplay::Part);
        let err = "wide".parse::<RedirectDisplay>().unwrap_err();
        assert_eq!(err.to_string(), "invalid value for rdisplay: wide");
    }
}
