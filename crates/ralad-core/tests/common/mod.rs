#![allow(dead_code)]

pub mod http_server;

use ralad_core::console::Console;
use std::cell::RefCell;
use std::io::{self, Cursor, Write};
use std::rc::Rc;

/// Writer whose bytes stay readable after it is boxed into a [`Console`].
#[derive(Clone, Default)]
pub struct Captured(Rc<RefCell<Vec<u8>>>);

impl Captured {
    pub fn text(&self) -> String {
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

/// Console answering prompts from `input`, with every stream captured.
pub struct TestConsole {
    pub console: Console,
    pub prompt: Captured,
    pub warn: Captured,
    pub report: Captured,
}

pub fn console(input: &str, quiet: bool) -> TestConsole {
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
    TestConsole {
        console,
        prompt,
        warn,
        report,
    }
}
