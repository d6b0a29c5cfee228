//! Package identity recovered from archive directory names.
//!
//! File-list archives store one directory per package, named
//! `<pkgname>-<pkgver>-<pkgrel>`. Package names may themselves contain
//! hyphens, so the boundary is found by walking back two hyphens from the
//! end of the string.

use std::fmt;

use serde::Serialize;

use crate::error::{EngineError, Result};

/// Name and version of one package directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageIdentity {
    /// Package name, possibly containing hyphens.
    pub name: String,
    /// Version including the release suffix (e.g. `2.39-1`).
    pub version: String,
}

impl PackageIdentity {
    /// Split a package directory name into name and version.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MalformedIdentity`] when the name holds fewer
    /// than two hyphens or when the name part would be empty.
    pub fn parse(dirname: &str) -> Result<Self> {
        let (name, version) = split_name(dirname)?;
        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
        })
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.version)
    }
}

/// Borrowing form of [`PackageIdentity::parse`].
///
/// ```
/// use pkgfile_core::identity::split_name;
///
/// assert_eq!(split_name("xorg-server-21.1.8-1").unwrap(), ("xorg-server", "21.1.8-1"));
/// assert!(split_name("glibc-2.39").is_err());
/// ```
///
/// # Errors
///
/// See [`PackageIdentity::parse`].
pub fn split_name(dirname: &str) -> Result<(&str, &str)> {
    let malformed = || EngineError::MalformedIdentity {
        dirname: dirname.to_string(),
    };

    let last = dirname.rfind('-').ok_or_else(malformed)?;
    let split = dirname[..last].rfind('-').ok_or_else(malformed)?;
    if split == 0 {
        return Err(malformed());
    }

    Ok((&dirname[..split], &dirname[split + 1..]))
}
