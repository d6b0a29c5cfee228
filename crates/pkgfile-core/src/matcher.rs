//! Matching strategies for package names and manifest paths.
//!
//! Every strategy implements [`Matcher`]. Patterns are compiled once, up
//! front, by [`MatchStrategy::compile`]; a bad pattern fails before the
//! archive is touched. All matchers reject the empty candidate.

use std::fmt;

use glob::{MatchOptions as GlobOptions, Pattern};
use regex::RegexBuilder;
use regex::bytes::RegexBuilder as BytesRegexBuilder;

use crate::error::{EngineError, Result};

/// A compiled predicate over package names or file paths.
pub trait Matcher: fmt::Debug + Send + Sync {
    /// Test a single candidate string.
    fn matches(&self, candidate: &str) -> bool;
}

/// Selects which [`Matcher`] a query compiles its pattern into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchStrategy {
    /// Exact, case-sensitive string equality. Used for package names.
    Literal,
    /// Shell glob over a whole package name.
    NameGlob,
    /// Full path (leading `/` optional) or bare basename equality.
    #[default]
    Simple,
    /// Shell glob over the basename of a path.
    Shell,
    /// POSIX extended regular expression, unanchored.
    ExtendedRegex,
    /// Perl-compatible regular expression, unanchored.
    PortableRegex,
}

/// Knobs shared by the compiling strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Fold case when matching. Only honoured by glob and regex strategies.
    pub ignore_case: bool,
}

impl MatchStrategy {
    /// Compile `pattern` into a boxed matcher.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyPattern`] for an empty pattern and
    /// [`EngineError::PatternCompile`] when the glob or regex is invalid.
    pub fn compile(self, pattern: &str, options: MatchOptions) -> Result<Box<dyn Matcher>> {
        if pattern.is_empty() {
            return Err(EngineError::EmptyPattern);
        }

        let matcher: Box<dyn Matcher> = match self {
            Self::Literal => Box::new(LiteralMatcher::new(pattern)),
            Self::NameGlob => Box::new(NameGlobMatcher::new(pattern, options)?),
            Self::Simple => Box::new(ExactOrSuffixMatcher::new(pattern)),
            Self::Shell => Box::new(ShellGlobMatcher::new(pattern, options)?),
            Self::ExtendedRegex => Box::new(ExtendedRegexMatcher::new(pattern, options)?),
            Self::PortableRegex => Box::new(PortableRegexMatcher::new(pattern, options)?),
        };
        tracing::trace!("Compiled {self:?} matcher for '{pattern}'");
        Ok(matcher)
    }
}

/// Final path component, or `None` when the candidate holds no `/`.
fn basename(candidate: &str) -> Option<&str> {
    candidate.rsplit_once('/').map(|(_, base)| base)
}

/// `candidate == pattern`, nothing more.
#[derive(Debug, Clone)]
pub struct LiteralMatcher {
    pattern: String,
}

impl LiteralMatcher {
    /// Wrap a literal pattern.
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
        }
    }
}

impl Matcher for LiteralMatcher {
    fn matches(&self, candidate: &str) -> bool {
        !candidate.is_empty() && candidate == self.pattern
    }
}

/// The default search matcher.
///
/// A rooted pattern (`/usr/bin/ls`) must equal the whole path once its
/// leading slash is dropped; any pattern may equal the path verbatim or the
/// path's basename.
#[derive(Debug, Clone)]
pub struct ExactOrSuffixMatcher {
    pattern: String,
}

impl ExactOrSuffixMatcher {
    /// Wrap a path or filename pattern.
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
        }
    }
}

impl Matcher for ExactOrSuffixMatcher {
    fn matches(&self, candidate: &str) -> bool {
        if candidate.is_empty() {
            return false;
        }
        if self.pattern.strip_prefix('/') == Some(candidate) || candidate == self.pattern {
            return true;
        }
        basename(candidate) == Some(self.pattern.as_str())
    }
}

fn glob_options(options: MatchOptions) -> GlobOptions {
    GlobOptions {
        case_sensitive: !options.ignore_case,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    }
}

/// Compile a glob for a single path component.
///
/// Candidates never contain `/`, so a run of `*` means the same as one `*`.
/// Collapsing it keeps `glob` from reading `**` as a recursive wildcard.
fn compile_glob(pattern: &str) -> Result<Pattern> {
    let mut collapsed = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c == '*' && collapsed.ends_with('*') {
            continue;
        }
        collapsed.push(c);
    }
    Pattern::new(&collapsed).map_err(|e| EngineError::compile(pattern, Some(e.pos), e.msg))
}

/// Shell glob tested against the basename of a path.
///
/// Paths without a `/` have no basename and never match.
#[derive(Debug, Clone)]
pub struct ShellGlobMatcher {
    pattern: Pattern,
    options: GlobOptions,
}

impl ShellGlobMatcher {
    /// Compile a shell glob (`*`, `?`, `[...]`).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PatternCompile`] for a malformed glob.
    pub fn new(pattern: &str, options: MatchOptions) -> Result<Self> {
        Ok(Self {
            pattern: compile_glob(pattern)?,
            options: glob_options(options),
        })
    }
}

impl Matcher for ShellGlobMatcher {
    fn matches(&self, candidate: &str) -> bool {
        basename(candidate).is_some_and(|base| self.pattern.matches_with(base, self.options))
    }
}

/// Shell glob tested against a whole package name.
#[derive(Debug, Clone)]
pub struct NameGlobMatcher {
    pattern: Pattern,
    options: GlobOptions,
}

impl NameGlobMatcher {
    /// Compile a shell glob for package names.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PatternCompile`] for a malformed glob.
    pub fn new(pattern: &str, options: MatchOptions) -> Result<Self> {
        Ok(Self {
            pattern: compile_glob(pattern)?,
            options: glob_options(options),
        })
    }
}

impl Matcher for NameGlobMatcher {
    fn matches(&self, candidate: &str) -> bool {
        !candidate.is_empty() && self.pattern.matches_with(candidate, self.options)
    }
}

/// Find the offset and reason of a regex syntax error.
///
/// The `regex` crate only reports a rendered message, so the pattern is
/// re-parsed with `regex-syntax` to recover the position.
fn locate_syntax_error(pattern: &str, unicode: bool, options: MatchOptions) -> Option<(usize, String)> {
    let mut parser = regex_syntax::ParserBuilder::new()
        .unicode(unicode)
        .utf8(unicode)
        .case_insensitive(options.ignore_case)
        .build();
    match parser.parse(pattern) {
        Ok(_) => None,
        Err(regex_syntax::Error::Parse(e)) => Some((e.span().start.offset, e.kind().to_string())),
        Err(regex_syntax::Error::Translate(e)) => {
            Some((e.span().start.offset, e.kind().to_string()))
        }
        Err(_) => None,
    }
}

fn regex_error(pattern: &str, unicode: bool, options: MatchOptions, err: &regex::Error) -> EngineError {
    match locate_syntax_error(pattern, unicode, options) {
        Some((offset, message)) => EngineError::compile(pattern, Some(offset), message),
        None => EngineError::compile(pattern, None, err),
    }
}

/// POSIX extended regular expression over raw bytes.
///
/// Compiled without Unicode classes so `.` and `\w` follow the C locale.
#[derive(Debug, Clone)]
pub struct ExtendedRegexMatcher {
    regex: regex::bytes::Regex,
}

impl ExtendedRegexMatcher {
    /// Compile an extended regular expression.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PatternCompile`] with the failing offset.
    pub fn new(pattern: &str, options: MatchOptions) -> Result<Self> {
        let regex = BytesRegexBuilder::new(pattern)
            .unicode(false)
            .case_insensitive(options.ignore_case)
            .build()
            .map_err(|e| regex_error(pattern, false, options, &e))?;
        Ok(Self { regex })
    }
}

impl Matcher for ExtendedRegexMatcher {
    fn matches(&self, candidate: &str) -> bool {
        !candidate.is_empty() && self.regex.is_match(candidate.as_bytes())
    }
}

/// Perl-compatible regular expression over UTF-8 text.
#[derive(Debug, Clone)]
pub struct PortableRegexMatcher {
    regex: regex::Regex,
}

impl PortableRegexMatcher {
    /// Compile a Perl-style regular expression.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::PatternCompile`] with the failing offset.
    pub fn new(pattern: &str, options: MatchOptions) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(options.ignore_case)
            .build()
            .map_err(|e| regex_error(pattern, true, options, &e))?;
        Ok(Self { regex })
    }
}

impl Matcher for PortableRegexMatcher {
    fn matches(&self, candidate: &str) -> bool {
        !candidate.is_empty() && self.regex.is_match(candidate)
    }
}
