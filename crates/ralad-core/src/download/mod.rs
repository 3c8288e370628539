//! Streaming of the response body to its destination.
//!
//! Bytes are written in arrival order and counted as they land, so a failed
//! write still reports how much reached the destination.

mod progress;
mod sink;

pub use progress::create_progress_bar;
pub use sink::{Output, STDOUT_NAME};

use crate::console::Console;
use crate::error::RaladError;
use indicatif::ProgressBar;
use std::io::{self, Write};

/// Writes a body to `out`, counting bytes and driving the progress bar.
pub struct BodyWriter<W: Write> {
    out: W,
    written: u64,
    content_length: Option<u64>,
    bar: ProgressBar,
}

impl<W: Write> BodyWriter<W> {
    pub fn new(out: W, content_length: Option<u64>, quiet: bool) -> Self {
        Self {
            out,
            written: 0,
            content_length,
            bar: create_progress_bar(quiet, content_length),
        }
    }

    /// Bytes that reached the destination so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Writes one chunk. Partial writes are counted before an error returns.
    pub fn write_chunk(&mut self, mut data: &[u8]) -> Result<(), RaladError> {
        while !data.is_empty() {
            match self.out.write(data) {
                Ok(0) => {
                    return Err(RaladError::Write(io::Error::from(io::ErrorKind::WriteZero)));
                }
                Ok(n) => {
                    self.written += n as u64;
                    self.bar.inc(n as u64);
                    data = &data[n..];
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => {
                    self.bar.abandon();
                    return Err(RaladError::Write(e));
                }
            }
        }
        Ok(())
    }

    /// Flushes the destination and closes the bar. Warns on the console when
    /// the declared Content-Length differs from what was written.
    pub fn finish(mut self, console: &mut Console) -> Result<u64, RaladError> {
        if let Err(e) = self.out.flush() {
            self.bar.abandon();
            return Err(RaladError::Write(e));
        }
        self.bar.finish();

        if let Some(expected) = self.content_length {
            if expected != self.written {
                tracing::warn!(expected, written = self.written, "length mismatch");
                console.warn(format_args!(
                    "warning: bytes written ({}) is different from Content-Length header ({})",
                    self.written, expected
                ));
            }
        }
        Ok(self.written)
    }
}
