//! Output Buffer - batched stdout writes
//!
//! A search can print tens of thousands of rows; rows are queued on a
//! locked, buffered stdout and flushed once.

use std::io::{BufWriter, StdoutLock, Write};

/// A buffer that accumulates rows before flushing
pub struct OutputBuffer {
    stdout: BufWriter<StdoutLock<'static>>,
}

impl std::fmt::Debug for OutputBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputBuffer").finish_non_exhaustive()
    }
}

impl OutputBuffer {
    /// Write text on a new line
    pub fn write_line(&mut self, text: &str) {
        let _ = writeln!(self.stdout, "{text}");
    }

    /// Flush all queued rows
    pub fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self {
            stdout: BufWriter::new(std::io::stdout().lock()),
        }
    }
}
