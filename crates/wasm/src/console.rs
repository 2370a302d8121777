//! Routes `tracing` events to the browser console.
//!
//! Each formatted event is buffered and handed to `console.error`,
//! `console.warn` or `console.log` by level once the line is complete.

use std::io;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::FmtSubscriber;
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsoleMethod {
    Error,
    Warn,
    Log,
}

fn console_method(level: &Level) -> ConsoleMethod {
    if *level == Level::ERROR {
        ConsoleMethod::Error
    } else if *level == Level::WARN {
        ConsoleMethod::Warn
    } else {
        ConsoleMethod::Log
    }
}

/// The formatter ends every event with a newline.
fn line_text(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf).trim_end().to_string()
}

/// One event's worth of formatted output.
pub struct ConsoleWriter {
    method: ConsoleMethod,
    buf: Vec<u8>,
}

impl ConsoleWriter {
    fn new(method: ConsoleMethod) -> Self {
        Self {
            method,
            buf: Vec::new(),
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = line_text(&self.buf);
        if line.is_empty() {
            return;
        }
        let line = JsValue::from_str(&line);
        match self.method {
            ConsoleMethod::Error => web_sys::console::error_1(&line),
            ConsoleMethod::Warn => web_sys::console::warn_1(&line),
            ConsoleMethod::Log => web_sys::console::log_1(&line),
        }
    }
}

struct Console;

impl<'a> MakeWriter<'a> for Console {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(ConsoleMethod::Log)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(console_method(meta.level()))
    }
}

/// Installs the console subscriber at INFO. Later calls are no-ops.
pub fn init() {
    // No clock on wasm32-unknown-unknown; the console stamps lines itself.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .without_time()
        .with_target(false)
        .with_writer(Console)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
