//! Destinations for `print_string` and `println_string`.
//!
//! Hosts pick one through [`BootstrapConfig`](crate::BootstrapConfig):
//! stdout for command-line embedding, a buffer when output has to be
//! inspected afterwards, or silence.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

/// Where printed script output goes.
#[derive(Debug)]
pub enum PrintHandler {
    Stdout,
    /// Accumulates output until [`PrintHandler::take_output`] or
    /// [`PrintHandler::clear`].
    Buffer(Mutex<String>),
    Silent,
}

impl PrintHandler {
    pub fn print(&self, text: &str) {
        match self {
            PrintHandler::Stdout => {
                let mut out = std::io::stdout().lock();
                // Output errors (closed pipe) are not script errors.
                let _ = out.write_all(text.as_bytes());
                let _ = out.flush();
            }
            PrintHandler::Buffer(buffer) => buffer.lock().push_str(text),
            PrintHandler::Silent => {}
        }
    }

    pub fn println(&self, text: &str) {
        match self {
            PrintHandler::Stdout => println!("{text}"),
            PrintHandler::Buffer(buffer) => {
                let mut buffer = buffer.lock();
                buffer.push_str(text);
                buffer.push('\n');
            }
            PrintHandler::Silent => {}
        }
    }

    /// Captured output so far. Empty unless buffering.
    pub fn output(&self) -> String {
        match self {
            PrintHandler::Buffer(buffer) => buffer.lock().clone(),
            PrintHandler::Stdout | PrintHandler::Silent => String::new(),
        }
    }

    /// Captured output so far, leaving the buffer empty.
    pub fn take_output(&self) -> String {
        match self {
            PrintHandler::Buffer(buffer) => std::mem::take(&mut *buffer.lock()),
            PrintHandler::Stdout | PrintHandler::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let PrintHandler::Buffer(buffer) = self {
            buffer.lock().clear();
        }
    }
}

/// Print handler shared between the host and registered print functions.
pub type SharedPrintHandler = Arc<PrintHandler>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Stdout)
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Buffer(Mutex::new(String::new())))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandler::Silent)
}
