//! List and search engines.
//!
//! Both engines make one forward pass over the archive. List mode stops at
//! the first package whose name matches; search mode reads every manifest
//! and reports each package with at least one matching path.

use std::path::Path;

use serde::Serialize;

use crate::archive::{ArchiveEntry, ArchiveStream};
use crate::error::{EngineError, Result};
use crate::identity::{PackageIdentity, split_name};
use crate::matcher::{MatchOptions, MatchStrategy, Matcher};

/// Files of one package that matched a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageMatch {
    /// Package directory inside the archive (`<name>-<version>`).
    pub package: String,
    /// Matching paths, in manifest order.
    pub files: Vec<String>,
}

/// Manifest of the package picked by a list query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageListing {
    /// Name and version of the matched package directory.
    #[serde(flatten)]
    pub identity: PackageIdentity,
    /// Every manifest path, in order.
    pub files: Vec<String>,
}

/// Files of the package named exactly `package`.
///
/// # Errors
///
/// See [`list_with`].
pub fn list(archive: &Path, package: &str) -> Result<Vec<String>> {
    let matcher = MatchStrategy::Literal.compile(package, MatchOptions::default())?;
    list_with(archive, matcher.as_ref())
}

/// Packages owning a path equal to `pattern`, or whose basename is
/// `pattern`. A leading `/` anchors the pattern at the archive root.
///
/// # Errors
///
/// See [`search_with`].
pub fn search(archive: &Path, pattern: &str) -> Result<Vec<PackageMatch>> {
    search_strategy(archive, MatchStrategy::Simple, pattern)
}

/// Search with a shell glob tested against each path's basename.
///
/// # Errors
///
/// See [`search_with`].
pub fn search_shell(archive: &Path, pattern: &str) -> Result<Vec<PackageMatch>> {
    search_strategy(archive, MatchStrategy::Shell, pattern)
}

/// Search with a POSIX extended regular expression.
///
/// # Errors
///
/// See [`search_with`].
pub fn search_extended_regex(archive: &Path, pattern: &str) -> Result<Vec<PackageMatch>> {
    search_strategy(archive, MatchStrategy::ExtendedRegex, pattern)
}

/// Search with a Perl-compatible regular expression.
///
/// # Errors
///
/// See [`search_with`].
pub fn search_portable_regex(archive: &Path, pattern: &str) -> Result<Vec<PackageMatch>> {
    search_strategy(archive, MatchStrategy::PortableRegex, pattern)
}

fn search_strategy(
    archive: &Path,
    strategy: MatchStrategy,
    pattern: &str,
) -> Result<Vec<PackageMatch>> {
    let matcher = strategy.compile(pattern, MatchOptions::default())?;
    search_with(archive, matcher.as_ref())
}

/// Files of the first package whose name satisfies `matcher`, or an
/// empty list when none does.
///
/// # Errors
///
/// See [`find_package`].
pub fn list_with(archive: &Path, matcher: &dyn Matcher) -> Result<Vec<String>> {
    Ok(find_package(archive, matcher)?
        .map(|listing| listing.files)
        .unwrap_or_default())
}

/// Return the manifest of the first package whose name satisfies `matcher`,
/// along with the package's identity.
///
/// Every regular entry's parent directory is split into name and version
/// before the name is tested, so a malformed directory met before the
/// first match aborts the call.
///
/// # Errors
///
/// Fails with [`EngineError::NotFound`] before any IO if the archive is
/// missing, with [`EngineError::MalformedIdentity`] on a bad directory
/// name, and with the archive or stream variants on read failures.
pub fn find_package(archive: &Path, matcher: &dyn Matcher) -> Result<Option<PackageListing>> {
    let mut stream = ArchiveStream::open(archive)?;
    let mut visited = 0usize;

    for entry in stream.entries()? {
        let entry = entry?;
        visited += 1;

        if !entry.is_regular() {
            tracing::trace!("Skipping {} ({:?})", entry.path(), entry.kind());
            continue;
        }

        let (name, version) = split_name(entry.parent())?;
        if !matcher.matches(name) || !entry.is_manifest() {
            continue;
        }

        tracing::debug!("Listing {} after {visited} entries", entry.path());
        let identity = PackageIdentity {
            name: name.to_string(),
            version: version.to_string(),
        };
        let files = read_manifest(entry, |_| true)?;
        return Ok(Some(PackageListing { identity, files }));
    }

    tracing::debug!("No package matched after {visited} entries");
    Ok(None)
}

/// Collect, per package, every manifest path satisfying `matcher`.
///
/// Records come out in archive order; packages without a matching path
/// produce no record. The whole archive is always scanned.
///
/// # Errors
///
/// Same as [`list_with`]. A malformed directory holding a manifest aborts
/// the search and discards the records gathered so far.
pub fn search_with(archive: &Path, matcher: &dyn Matcher) -> Result<Vec<PackageMatch>> {
    let mut stream = ArchiveStream::open(archive)?;
    let mut results = Vec::new();
    let mut manifests = 0usize;

    for entry in stream.entries()? {
        let entry = entry?;
        if !entry.is_regular() || !entry.is_manifest() {
            continue;
        }
        manifests += 1;

        let (name, version) = split_name(entry.parent())?;
        tracing::trace!("Scanning {name} {version}");

        let package = entry.parent().to_string();
        let files = read_manifest(entry, |line| matcher.matches(line))?;
        if !files.is_empty() {
            results.push(PackageMatch { package, files });
        }
    }

    tracing::debug!(
        "Scanned {manifests} manifests, {} packages matched",
        results.len()
    );
    Ok(results)
}

/// Read a manifest body, keeping lines accepted by `keep`.
fn read_manifest(entry: ArchiveEntry<'_>, mut keep: impl FnMut(&str) -> bool) -> Result<Vec<String>> {
    let name = entry.path().to_string();
    let mut files = Vec::new();

    for line in entry.into_lines() {
        let line = line.map_err(|source| EngineError::StreamOpen {
            entry: name.clone(),
            source,
        })?;
        if keep(&line) {
            files.push(line);
        }
    }

    Ok(files)
}
