//! Error type shared by the transfer pipeline.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that end a download. Warnings (length mismatch, unparseable
/// Content-Disposition) are reported on the console and never become errors.
#[derive(Debug, Error)]
pub enum RaladError {
    #[error("maximum number of redirects reached")]
    MaxRedirects,

    #[error("unable to generate filename")]
    NoFilename,

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: url::ParseError },

    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid redirect location {location:?}: {reason}")]
    InvalidLocation {
        location: String,
        reason: url::ParseError,
    },

    #[error("invalid value for rpolicy: {0}")]
    InvalidPolicy(String),

    #[error("invalid value for rdisplay: {0}")]
    InvalidDisplay(String),

    #[error("error creating file: {reason}")]
    CreateFile { path: PathBuf, reason: io::Error },

    #[error("error writing file: {0}")]
    Write(io::Error),

    #[error("request failed: {0}")]
    Transfer(#[from] curl::Error),

    #[error("no response received from {0}")]
    NoResponse(String),
}
