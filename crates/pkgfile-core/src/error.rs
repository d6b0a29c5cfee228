//! Errors raised by the query engine.
//!
//! Every variant is fatal for the call that produced it: a scan never
//! returns partial results alongside an error.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of a list or search call.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The caller supplied an empty pattern.
    #[error("Empty pattern given")]
    EmptyPattern,

    /// The pattern could not be compiled by the selected matcher.
    #[error("Could not compile pattern '{pattern}'{}: {message}", fmt_offset(.offset))]
    PatternCompile {
        /// The rejected pattern.
        pattern: String,
        /// Byte offset of the offending token, when the engine reports one.
        offset: Option<usize>,
        /// Message from the underlying compiler.
        message: String,
    },

    /// The archive path does not exist or is not a regular file.
    #[error("File does not exist: {}", .path.display())]
    NotFound {
        /// The path that was checked.
        path: PathBuf,
    },

    /// The archive file could not be opened or its decoder could not start.
    #[error("Unable to open archive {}: {source}", .path.display())]
    Open {
        /// The archive path.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },

    /// Reading the next entry header failed mid-scan.
    #[error("Archive error in {}: {source}", .path.display())]
    Archive {
        /// The archive path.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },

    /// A package directory name could not be split into name and version.
    #[error("Malformed package directory '{dirname}': expected <name>-<version>-<release>")]
    MalformedIdentity {
        /// The directory component that failed to split.
        dirname: String,
    },

    /// The decompressed stream of an entry could not be read.
    #[error("Unable to read archive stream for '{entry}': {source}")]
    StreamOpen {
        /// Path of the entry inside the archive.
        entry: String,
        /// Underlying IO error.
        source: io::Error,
    },
}

#[allow(clippy::ref_option)]
fn fmt_offset(offset: &Option<usize>) -> String {
    offset.map(|o| format!(" at {o}")).unwrap_or_default()
}

impl EngineError {
    /// Build a compile error for `pattern`.
    pub fn compile(pattern: &str, offset: Option<usize>, message: impl std::fmt::Display) -> Self {
        Self::PatternCompile {
            pattern: pattern.to_string(),
            offset,
            message: message.to_string(),
        }
    }

    /// Whether the error was raised before any archive access.
    pub fn is_pattern_error(&self) -> bool {
        matches!(self, Self::EmptyPattern | Self::PatternCompile { .. })
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
