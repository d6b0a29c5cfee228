//! Post-match filters applied to engine results.

use crate::engine::PackageMatch;

/// Narrows engine output after matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultFilter {
    /// Keep only paths inside a `bin/` or `sbin/` directory.
    pub binaries: bool,
}

impl ResultFilter {
    /// Whether `path` survives the filter.
    pub fn keep(&self, path: &str) -> bool {
        !self.binaries || is_binary(path)
    }

    /// Filter a list-mode result.
    pub fn apply_files(&self, files: Vec<String>) -> Vec<String> {
        if !self.binaries {
            return files;
        }
        files.into_iter().filter(|f| self.keep(f)).collect()
    }

    /// Filter search records, dropping packages left without files.
    pub fn apply_packages(&self, packages: Vec<PackageMatch>) -> Vec<PackageMatch> {
        if !self.binaries {
            return packages;
        }
        packages
            .into_iter()
            .filter_map(|mut record| {
                record.files.retain(|f| self.keep(f));
                (!record.files.is_empty()).then_some(record)
            })
            .collect()
    }
}

/// Whether a manifest path lives under a `bin` or `sbin` directory.
///
/// ```
/// use pkgfile_core::filter::is_binary;
///
/// assert!(is_binary("usr/bin/bash"));
/// assert!(is_binary("/usr/sbin/"));
/// assert!(!is_binary("usr/share/bin.txt"));
/// ```
pub fn is_binary(path: &str) -> bool {
    path.rsplit_once('/')
        .is_some_and(|(dir, _)| dir.split('/').any(|c| c == "bin" || c == "sbin"))
}
