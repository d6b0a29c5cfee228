//! A front-end neutral description of one lookup.
//!
//! Front ends build a [`Query`] from user input and call [`Query::run`];
//! the query picks the engine and matcher and applies result filters.

use std::path::Path;

use serde::Serialize;

use crate::engine::{self, PackageListing, PackageMatch};
use crate::error::Result;
use crate::filter::ResultFilter;
use crate::matcher::{MatchOptions, MatchStrategy};

/// Which engine runs and how its pattern is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// List the files of the first package whose name matches.
    List {
        /// Treat the package name as a shell glob.
        glob: bool,
    },
    /// Find the packages owning paths that match.
    Search(MatchStrategy),
}

/// One list or search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Engine selection.
    pub mode: Mode,
    /// Package name or path pattern.
    pub pattern: String,
    /// Matcher options.
    pub options: MatchOptions,
    /// Filters applied to the engine output.
    pub filter: ResultFilter,
}

/// Result of [`Query::run`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryOutput {
    /// The listed package, or `None` when no package matched.
    Listing(Option<PackageListing>),
    /// Per-package search hits.
    Packages(Vec<PackageMatch>),
}

impl QueryOutput {
    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Listing(listing) => listing.as_ref().is_none_or(|l| l.files.is_empty()),
            Self::Packages(packages) => packages.is_empty(),
        }
    }
}

impl Query {
    /// A list query for an exact package name.
    pub fn list(package: impl Into<String>) -> Self {
        Self::new(Mode::List { glob: false }, package)
    }

    /// A search query using `strategy`.
    pub fn search(strategy: MatchStrategy, pattern: impl Into<String>) -> Self {
        Self::new(Mode::Search(strategy), pattern)
    }

    fn new(mode: Mode, pattern: impl Into<String>) -> Self {
        Self {
            mode,
            pattern: pattern.into(),
            options: MatchOptions::default(),
            filter: ResultFilter::default(),
        }
    }

    /// Fold case in glob and regex matchers.
    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.options.ignore_case = ignore_case;
        self
    }

    /// Keep only `bin/` and `sbin/` paths.
    pub fn binaries(mut self, binaries: bool) -> Self {
        self.filter.binaries = binaries;
        self
    }

    /// Strategy used to compile the pattern.
    pub fn strategy(&self) -> MatchStrategy {
        match self.mode {
            Mode::List { glob: false } => MatchStrategy::Literal,
            Mode::List { glob: true } => MatchStrategy::NameGlob,
            Mode::Search(strategy) => strategy,
        }
    }

    /// Compile the pattern and scan `archive`.
    ///
    /// # Errors
    ///
    /// Pattern errors are raised before the archive is opened; see
    /// [`engine::find_package`] and [`engine::search_with`] for the rest.
    pub fn run(&self, archive: &Path) -> Result<QueryOutput> {
        let matcher = self.strategy().compile(&self.pattern, self.options)?;

        tracing::debug!(
            "Running {:?} for '{}' against {}",
            self.mode,
            self.pattern,
            archive.display()
        );

        match self.mode {
            Mode::List { .. } => {
                let listing = engine::find_package(archive, matcher.as_ref())?.map(|mut l| {
                    l.files = self.filter.apply_files(l.files);
                    l
                });
                Ok(QueryOutput::Listing(listing))
            }
            Mode::Search(_) => {
                let packages = engine::search_with(archive, matcher.as_ref())?;
                Ok(QueryOutput::Packages(self.filter.apply_packages(packages)))
            }
        }
    }
}
