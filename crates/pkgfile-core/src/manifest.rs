//! Line reader for `files` manifest entries.
//!
//! A manifest is a text body that opens with the `%FILES%` header and then
//! lists one installed path per line:
//!
//! ```text
//! %FILES%
//! usr/
//! usr/bin/
//! usr/bin/bash
//! ```
//!
//! The reader drops the sentinel and also drops blank lines, such as the
//! empty line pacman writes at the end of every manifest. A trailing `\r`
//! is stripped along with the `\n`, so neither ever reaches a matcher.

use std::io::{self, BufRead};

/// Basename of the manifest entry inside each package directory.
pub const MANIFEST_NAME: &str = "files";

/// Header line that opens every manifest. Never reported as a path.
pub const SENTINEL: &str = "%FILES%";

/// Forward-only iterator over the paths of one manifest.
///
/// Trailing newlines are stripped; the sentinel and blank lines are
/// skipped. The read buffer is owned by the iterator and reused between
/// lines.
#[derive(Debug)]
pub struct ManifestLines<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> ManifestLines<R> {
    /// Wrap a reader positioned at the start of a manifest body.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(256),
        }
    }
}

impl<R: BufRead> Iterator for ManifestLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e)),
            }

            let mut line = self.buf.as_slice();
            if let Some(rest) = line.strip_suffix(b"\n") {
                line = rest;
            }
            if let Some(rest) = line.strip_suffix(b"\r") {
                line = rest;
            }

            if line.is_empty() || line == SENTINEL.as_bytes() {
                continue;
            }
            return Some(Ok(String::from_utf8_lossy(line).into_owned()));
        }
    }
}
