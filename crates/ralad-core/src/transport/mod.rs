//! HTTP GET over libcurl, one redirect hop per request.
//!
//! libcurl's own redirect following is disabled: the caller sees every
//! response head before its body and decides what happens next.

mod parse;

use crate::error::RaladError;
use parse::HeadParser;
use std::cell::RefCell;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = concat!("ralad/", env!("CARGO_PKG_VERSION"));

/// Connection settings for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    /// Skip TLS peer and host verification.
    pub unsafe_tls: bool,
    pub connect_timeout: Duration,
    /// Abort when the rate stays below this many bytes/s for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            unsafe_tls: false,
            connect_timeout: Duration::from_secs(30),
            low_speed_limit: 1024,
            low_speed_time: Duration::from_secs(60),
        }
    }
}

/// Status line and headers of one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status_code: u32,
    /// Code and reason phrase, e.g. `301 Moved Permanently`.
    pub status: String,
    pub headers: Vec<(String, String)>,
}

impl ResponseHead {
    /// First value of header `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_length(&self) -> Option<u64> {
        self.header("content-length")?.parse().ok()
    }

    pub fn location(&self) -> Option<&str> {
        self.header("location").filter(|l| !l.is_empty())
    }

    /// A redirect we know how to follow: 301/302/303/307/308 with a Location.
    pub fn is_redirect(&self) -> bool {
        matches!(self.status_code, 301 | 302 | 303 | 307 | 308) && self.location().is_some()
    }
}

/// Receiver of one request/response exchange.
pub trait Exchange {
    /// Called once, after the final response head and before any body byte.
    fn on_head(&mut self, head: &ResponseHead) -> Result<(), RaladError>;

    /// Called for each chunk of the body, in order.
    fn on_body(&mut self, data: &[u8]) -> Result<(), RaladError>;
}

struct HopState<'a> {
    parser: HeadParser,
    head: Option<ResponseHead>,
    failure: Option<RaladError>,
    exchange: &'a mut dyn Exchange,
}

#[derive(Debug, Clone, Default)]
pub struct Transport {
    options: TransportOptions,
}

impl Transport {
    pub fn new(options: TransportOptions) -> Self {
        Self { options }
    }

    /// Performs a GET of `url` and drives `exchange` with the response.
    ///
    /// An error returned by the exchange aborts the transfer and is returned
    /// as is; otherwise libcurl failures surface as `RaladError::Transfer`.
    pub fn get(&self, url: &Url, exchange: &mut dyn Exchange) -> Result<ResponseHead, RaladError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.get(true)?;
        easy.follow_location(false)?;
        easy.useragent(USER_AGENT)?;
        easy.connect_timeout(self.options.connect_timeout)?;
        easy.low_speed_limit(self.options.low_speed_limit)?;
        easy.low_speed_time(self.options.low_speed_time)?;
        if self.options.unsafe_tls {
            tracing::warn!(url = %url, "TLS certificate verification disabled");
            easy.ssl_verify_peer(false)?;
            easy.ssl_verify_host(false)?;
        }

        let state = RefCell::new(HopState {
            parser: HeadParser::default(),
            head: None,
            failure: None,
            exchange,
        });

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                let mut state = state.borrow_mut();
                let line = String::from_utf8_lossy(data);
                let Some(head) = state.parser.feed(&line) else {
                    return true;
                };
                match state.exchange.on_head(&head) {
                    Ok(()) => {
                        state.head = Some(head);
                        true
                    }
                    Err(e) => {
                        state.failure = Some(e);
                        false
                    }
                }
            })?;
            transfer.write_function(|data| {
                let mut state = state.borrow_mut();
                match state.exchange.on_body(data) {
                    Ok(()) => Ok(data.len()),
                    Err(e) => {
                        state.failure = Some(e);
                        // Short count aborts the transfer.
                        Ok(0)
                    }
                }
            })?;
            transfer.perform()
        };

        let state = state.into_inner();
        if let Some(e) = state.failure {
            return Err(e);
        }
        performed?;
        state
            .head
            .ok_or_else(|| RaladError::NoResponse(url.to_string()))
    }
}
