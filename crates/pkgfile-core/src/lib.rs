//! pkgfile-core - file ownership queries over package file-list archives
//!
//! A file-list archive (pacman's `<repo>.files`) is a compressed tar with
//! one directory per package, each holding a `files` manifest:
//!
//! ```text
//! bash-5.2.026-2/
//! bash-5.2.026-2/desc
//! bash-5.2.026-2/files      %FILES%\nusr/bin/bash\n...
//! ```
//!
//! Two questions are answered with a single streaming pass and no index:
//!
//! - **list**: which files does package `P` own?
//! - **search**: which packages own a path matching `M`?
//!
//! ```no_run
//! use std::path::Path;
//!
//! let archive = Path::new("/var/lib/pacman/sync/core.files");
//! for hit in pkgfile_core::search(archive, "/usr/bin/ls")? {
//!     println!("{} {:?}", hit.package, hit.files);
//! }
//! # Ok::<(), pkgfile_core::EngineError>(())
//! ```

pub mod archive;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod identity;
pub mod manifest;
pub mod matcher;
pub mod query;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use engine::{
    PackageListing, PackageMatch, find_package, list, list_with, search, search_extended_regex,
    search_portable_regex, search_shell, search_with,
};
pub use error::{EngineError, Result};
pub use identity::PackageIdentity;
pub use matcher::{MatchOptions, MatchStrategy, Matcher};
pub use query::{Mode, Query, QueryOutput};
