//! Main download flow: request, redirect hops, filename, body.

use crate::config::RaladConfig;
use crate::console::Console;
use crate::download::{BodyWriter, Output, STDOUT_NAME};
use crate::error::RaladError;
use crate::redirect::{Hop, RedirectDecision, Redirector};
use crate::transport::{Exchange, ResponseHead, Transport, TransportOptions};
use crate::url_model::derive_filename;
use anyhow::{Context, Result};
use std::path::PathBuf;
use url::Url;

/// Everything a single download needs besides the URL and the console.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub redirect: Redirector,
    pub transport: TransportOptions,
    /// Explicit output name (`-` for stdout); derived from the response when unset.
    pub output: Option<String>,
    /// Directory output files are created in and checked against.
    pub dir: PathBuf,
}

impl FetchOptions {
    pub fn from_config(cfg: &RaladConfig, dir: PathBuf) -> Self {
        Self {
            redirect: Redirector {
                policy: cfg.redirect_policy,
                display: cfg.redirect_display,
                max_redirects: cfg.max_redirects,
            },
            transport: cfg.transport_options(),
            output: None,
            dir,
        }
    }
}

/// Summary of a finished download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    /// URL of the response that was saved.
    pub url: Url,
    /// Status line of that response.
    pub status: String,
    /// Output name as reported to the user (`stdout` for `-`).
    pub destination: String,
    pub bytes_written: u64,
    pub content_length: Option<u64>,
    pub redirects: usize,
}

/// Parses the command-line URL; only http and https are accepted.
pub fn parse_download_url(raw: &str) -> Result<Url, RaladError> {
    let url = Url::parse(raw).map_err(|reason| RaladError::InvalidUrl {
        url: raw.to_string(),
        reason,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(RaladError::UnsupportedScheme(other.to_string())),
    }
}

/// Downloads `raw_url` according to `options`.
///
/// Redirects go through the configured policy hop by hop. A denied redirect
/// makes the redirect response itself the one that is saved.
pub fn fetch(raw_url: &str, options: &FetchOptions, console: &mut Console) -> Result<FetchReport> {
    let mut url = parse_download_url(raw_url)?;
    let transport = Transport::new(options.transport.clone());
    let mut followed = 0;

    loop {
        let mut handler = HopHandler::new(&url, followed, options, console);
        let result = transport.get(&url, &mut handler);
        let outcome = handler.into_outcome();
        let head = match result {
            Ok(head) => head,
            Err(RaladError::Transfer(e)) if e.is_partial_file() => {
                // Connection closed before Content-Length was reached: keep
                // what arrived and report the shortfall before failing.
                if let Some(Outcome::Saved { body, .. }) = outcome {
                    body.finish(console)?;
                }
                return Err(RaladError::Transfer(e)).with_context(|| format!("GET {}", url));
            }
            Err(e) => return Err(e).with_context(|| format!("GET {}", url)),
        };
        tracing::debug!(url = %url, status = %head.status, "response");

        match outcome {
            Some(Outcome::Redirect(next)) => {
                url = next;
                followed += 1;
            }
            Some(Outcome::Saved {
                status,
                destination,
                body,
            }) => {
                let content_length = body.content_length();
                let bytes_written = body.finish(console)?;
                console.report(format_args!(
                    "{} bytes written to {}",
                    bytes_written, destination
                ));
                tracing::info!(url = %url, bytes_written, destination = %destination, "download complete");
                return Ok(FetchReport {
                    url,
                    status,
                    destination,
                    bytes_written,
                    content_length,
                    redirects: followed,
                });
            }
            None => return Err(RaladError::NoResponse(url.to_string()).into()),
        }
    }
}

enum Outcome {
    Redirect(Url),
    Saved {
        status: String,
        destination: String,
        body: BodyWriter<Output>,
    },
}

/// Drives one request: checks a redirect against the policy, or opens the
/// output and streams the body into it.
struct HopHandler<'a> {
    url: &'a Url,
    followed: usize,
    options: &'a FetchOptions,
    console: &'a mut Console,
    next: Option<Url>,
    saved: Option<(String, String, BodyWriter<Output>)>,
}

impl<'a> HopHandler<'a> {
    fn new(url: &'a Url, followed: usize, options: &'a FetchOptions, console: &'a mut Console) -> Self {
        Self {
            url,
            followed,
            options,
            console,
            next: None,
            saved: None,
        }
    }

    fn into_outcome(self) -> Option<Outcome> {
        if let Some(next) = self.next {
            return Some(Outcome::Redirect(next));
        }
        self.saved.map(|(status, destination, body)| Outcome::Saved {
            status,
            destination,
            body,
        })
    }

    fn open_output(&mut self, head: &ResponseHead) -> Result<(), RaladError> {
        self.console.report(format_args!("[{}] .", head.status));
        tracing::debug!(headers = ?head.headers, "response header");
        if !(200..300).contains(&head.status_code) {
            tracing::warn!(url = %self.url, status = %head.status, "saving non-success response");
        }

        let name = match &self.options.output {
            Some(name) => name.clone(),
            None => derive_filename(
                &self.options.dir,
                self.url,
                head.header("content-disposition"),
                self.console,
            )
            .ok_or(RaladError::NoFilename)?,
        };
        tracing::debug!("output filename will be: {}", name);

        let output = Output::create(&self.options.dir, &name)?;
        let destination = if name == STDOUT_NAME {
            output.describe()
        } else {
            name
        };
        let body = BodyWriter::new(output, head.content_length(), self.console.is_quiet());
        self.saved = Some((head.status.clone(), destination, body));
        Ok(())
    }
}

impl Exchange for HopHandler<'_> {
    fn on_head(&mut self, head: &ResponseHead) -> Result<(), RaladError> {
        if let Some(location) = head.location().filter(|_| head.is_redirect()) {
            let next = self
                .url
                .join(location)
                .map_err(|reason| RaladError::InvalidLocation {
                    location: location.to_string(),
                    reason,
                })?;
            let hop = Hop {
                from: self.url,
                to: &next,
                status: &head.status,
                followed: self.followed,
            };
            if self.options.redirect.check(hop, self.console)? == RedirectDecision::Follow {
                self.next = Some(next);
                return Ok(());
            }
        }
        self.open_output(head)
    }

    fn on_body(&mut self, data: &[u8]) -> Result<(), RaladError> {
        match &mut self.saved {
            Some((_, _, body)) => body.write_chunk(data),
            // Body of a followed redirect.
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redirect::{RedirectDisplay, RedirectPolicy};

    #[test]
    fn accepts_http_and_https() {
        assert!(parse_download_url("http://example.com/a").is_ok());
        assert!(parse_download_url("https://example.com/a").is_ok());
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        let err = parse_download_url("ftp://example.com/a").unwrap_err();
        assert_eq!(err.to_string(), "unsupported URL scheme: ftp");
        assert!(matches!(
            parse_download_url("not a url"),
            Err(RaladError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn filename_exhaustion_message() {
        assert_eq!(RaladError::NoFilename.to_string(), "unable to generate filename");
    }

    #[test]
    fn options_follow_config() {
        let cfg = RaladConfig {
            redirect_policy: RedirectPolicy::Never,
            redirect_display: RedirectDisplay::Full,
            max_redirects: 4,
            unsafe_tls: true,
            ..RaladConfig::default()
        };
        let opts = FetchOptions::from_config(&cfg, PathBuf::from("/tmp"));
        assert_eq!(opts.redirect.policy, RedirectPolicy::Never);
        assert_eq!(opts.redirect.display, RedirectDisplay::Full);
        assert_eq!(opts.redirect.max_redirects, 4);
        assert!(opts.transport.unsafe_tls);
        assert!(opts.output.is_none());
    }
}
