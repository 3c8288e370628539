//! Core of the ralad single-file downloader.

pub mod config;
pub mod console;
pub mod download;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod redirect;
pub mod transport;
pub mod url_model;

pub use error::RaladError;
