//! Terminal I/O for prompts, warnings and the status report.
//!
//! Every stream is injected so the redirect prompt and the warnings can be
//! driven from tests with scripted input.

use std::fmt;
use std::io::{self, BufRead, Write};

pub struct Console {
    input: Box<dyn BufRead>,
    prompt: Box<dyn Write>,
    warn: Box<dyn Write>,
    report: Box<dyn Write>,
    quiet: bool,
}

impl Console {
    pub fn new(
        input: Box<dyn BufRead>,
        prompt: Box<dyn Write>,
        warn: Box<dyn Write>,
        report: Box<dyn Write>,
        quiet: bool,
    ) -> Self {
        Self {
            input,
            prompt,
            warn,
            report,
            quiet,
        }
    }

    /// Prompts and warnings on stderr, answers from stdin, reports on stdout.
    pub fn stdio(quiet: bool) -> Self {
        Self::new(
            Box::new(io::stdin().lock()),
            Box::new(io::stderr()),
            Box::new(io::stderr()),
            Box::new(io::stdout()),
            quiet,
        )
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Asks a yes/no question. Only `y` or `yes` count as consent; EOF and
    /// read errors count as no.
    pub fn ask_ok(&mut self, prompt: &str) -> bool {
        let _ = write!(self.prompt, "{}", prompt);
        let _ = self.prompt.flush();

        let mut answer = String::new();
        if let Err(e) = self.input.read_line(&mut answer) {
            tracing::debug!("reading answer failed: {}", e);
            return false;
        }
        tracing::debug!(answer = answer.trim_end(), "prompt answered");
        matches!(answer.trim(), "y" | "yes")
    }

    /// Writes a warning line. Shown even in quiet mode.
    pub fn warn(&mut self, msg: fmt::Arguments<'_>) {
        let _ = writeln!(self.warn, "{}", msg);
        let _ = self.warn.flush();
    }

    /// Writes an informational line on the warning stream unless quiet.
    pub fn notice(&mut self, msg: fmt::Arguments<'_>) {
        if !self.quiet {
            self.warn(msg);
        }
    }

    /// Writes a status line on the report stream unless quiet.
    pub fn report(&mut self, msg: fmt::Arguments<'_>) {
        if !self.quiet {
            let _ = writeln!(self.report, "{}", msg);
            let _ = self.report.flush();
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Console;
    use std::cell::RefCell;
    use std::io::{self, Cursor, Write};
    use std::rc::Rc;

    /// Cloneable in-memory writer whose contents stay readable after the
    /// console takes ownership of a clone.
    #[derive(Clone, Default)]
    pub(crate) struct Captured(Rc<RefCell<Vec<u8>>>);

    impl Captured {
        pub(crate) fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.borrow()).into_owned()
        }
    }

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    pub(crate) struct Scripted {
        pub(crate) console: Console,
        pub(crate) prompt: Captured,
        pub(crate) warn: Captured,
        pub(crate) report: Captured,
    }

    pub(crate) fn scripted(input: &str, quiet: bool) -> Scripted {
        let prompt = Captured::default();
        let warn = Captured::default();
        let report = Captured::default();
        let console = Console::new(
            Box::new(Cursor::new(input.as_bytes().to_vec())),
            Box::new(prompt.clone()),
            Box::new(warn.clone()),
            Box::new(report.clone()),
            quiet,
        );
        Scripted {
            console,
            prompt,
            warn,
            report,
        }
    }
}
