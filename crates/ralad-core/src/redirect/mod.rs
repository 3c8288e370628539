//! Redirect confirmation policy.
//!
//! Every redirect hop is checked before it is followed. Depending on the
//! policy the user is asked on the console, told about the hop, or nothing
//! happens at all.

mod display;

pub use display::{display_url, RedirectDisplay};

use crate::console::Console;
use crate::error::RaladError;
use crate::url_model::same_origin;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Default cap on followed redirects.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectPolicy {
    /// Ask before every redirect.
    Always,
    /// Ask only when scheme or host changes.
    #[default]
    Relaxed,
    /// Follow silently.
    Never,
}

impl FromStr for RedirectPolicy {
    type Err = RaladError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(RedirectPolicy::Always),
            "relaxed" => Ok(RedirectPolicy::Relaxed),
            "never" => Ok(RedirectPolicy::Never),
            other => Err(RaladError::InvalidPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for RedirectPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RedirectPolicy::Always => "always",
            RedirectPolicy::Relaxed => "relaxed",
            RedirectPolicy::Never => "never",
        };
        f.write_str(s)
    }
}

/// Outcome of checking one redirect hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectDecision {
    /// Request the new location.
    Follow,
    /// Keep the redirect response itself as the final response.
    Stop,
}

/// One redirect hop as seen by the policy.
#[derive(Debug, Clone, Copy)]
pub struct Hop<'a> {
    /// URL of the request that produced the redirect response.
    pub from: &'a Url,
    /// Resolved `Location` of the redirect response.
    pub to: &'a Url,
    /// Status line of the redirect response, e.g. `301 Moved Permanently`.
    pub status: &'a str,
    /// Redirects already followed before this one.
    pub followed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirector {
    pub policy: RedirectPolicy,
    pub display: RedirectDisplay,
    pub max_redirects: usize,
}

impl Default for Redirector {
    fn default() -> Self {
        Self {
            policy: RedirectPolicy::default(),
            display: RedirectDisplay::default(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl Redirector {
    /// Decides whether `hop` is followed.
    ///
    /// Exceeding `max_redirects` is an error regardless of policy. Under
    /// `relaxed`, a same-origin hop is followed with a notice line
    /// `[<status>] -> <url>` unless the console is quiet.
    pub fn check(&self, hop: Hop<'_>, console: &mut Console) -> Result<RedirectDecision, RaladError> {
        if hop.followed >= self.max_redirects {
            return Err(RaladError::MaxRedirects);
        }
        tracing::debug!(
            from = %hop.from,
            to = %hop.to,
            status = hop.status,
            followed = hop.followed,
            "redirect"
        );

        if self.policy == RedirectPolicy::Never {
            return Ok(RedirectDecision::Follow);
        }

        let shown = display_url(hop.to, self.display);
        if self.policy == RedirectPolicy::Always || !same_origin(hop.from, hop.to) {
            let prompt = format!("redirect to {}? (y/n) ", shown);
            return if console.ask_ok(&prompt) {
                tracing::debug!("allow redirect");
                Ok(RedirectDecision::Follow)
            } else {
                tracing::debug!("deny redirect");
                Ok(RedirectDecision::Stop)
            };
        }

        console.notice(format_args!("[{}] -> {}", hop.status, shown));
        Ok(RedirectDecision::Follow)
    }
}
