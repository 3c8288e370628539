//! Output destination: a file in the working directory or stdout.

use crate::error::RaladError;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Output name that selects standard output.
pub const STDOUT_NAME: &str = "-";

/// Writes go straight to the destination with no buffering of our own, so a
/// byte counted by the caller has reached the file or the stdout stream.
pub enum Output {
    File { file: File, path: PathBuf },
    Stdout(io::Stdout),
}

impl Output {
    /// Opens `name` relative to `dir`, truncating an existing file.
    /// `-` selects stdout.
    pub fn create(dir: &Path, name: &str) -> Result<Self, RaladError> {
        if name == STDOUT_NAME {
            return Ok(Output::Stdout(io::stdout()));
        }
        let path = dir.join(name);
        let file = File::create(&path).map_err(|reason| RaladError::CreateFile {
            path: path.clone(),
            reason,
        })?;
        tracing::debug!(path = %path.display(), "created output file");
        Ok(Output::File { file, path })
    }

    /// Human-readable destination for the final report.
    pub fn describe(&self) -> String {
        match self {
            Output::File { path, .. } => path.display().to_string(),
            Output::Stdout(_) => "stdout".to_string(),
        }
    }
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::File { file, .. } => file.write(buf),
            Output::Stdout(out) => {
                // Stdout is line buffered; push the tail out with the chunk.
                let n = out.write(buf)?;
                out.flush()?;
                Ok(n)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::File { file, .. } => file.flush(),
            Output::Stdout(out) => out.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn creates_and_truncates_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("out.bin"), b"old contents").unwrap();
        let mut out = Output::create(dir.path(), "out.bin").unwrap();
        out.write_all(b"new").unwrap();
        out.flush().unwrap();
        assert_eq!(fs::read(dir.path().join("out.bin")).unwrap(), b"new");
        assert!(out.describe().ends_with("out.bin"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn full_device_fails_on_write() {
        let mut out = Output::create(Path::new("/dev"), "full").unwrap();
        let err = out.write(b"fake body content").unwrap_err();
        assert_eq!(err.raw_os_error(), Some(28));
    }

    #[test]
    fn dash_is_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let out = Output::create(dir.path(), STDOUT_NAME).unwrap();
        assert!(matches!(out, Output::Stdout(_)));
        assert_eq!(out.describe(), "stdout");
        assert!(!dir.path().join("-").exists());
    }

    #[test]
    fn create_failure_keeps_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = match Output::create(dir.path(), "missing/sub/file") {
            Err(e) => e,
            Ok(_) => panic!("expected create failure"),
        };
        assert!(matches!(err, RaladError::CreateFile { .. }));
        assert!(err.to_string().starts_with("error creating file: "));
        assert!(matches!(&err, RaladError::CreateFile { path, .. } if path.ends_with("missing/sub/file")));
    }
}
