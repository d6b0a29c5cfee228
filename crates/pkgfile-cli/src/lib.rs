//! pkgfile - find which package owns a file
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Command-line front end over `pkgfile-core`. Every command scans a
//! file-list archive once and prints what it found.
//!
//! # Archive selection
//!
//! 1. `--archive <PATH>`
//! 2. `PKGFILE_ARCHIVE`
//! 3. `archive` in the config file (`--config`, `PKGFILE_CONFIG`, or
//!    `~/.config/pkgfile/config.toml`)

pub mod cmd;
pub mod ui;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub use pkgfile_core::config::CONFIG_ENV;

/// Environment variable naming the default archive.
pub const ARCHIVE_ENV: &str = "PKGFILE_ARCHIVE";

#[derive(Debug, Parser)]
#[command(name = "pkgfile")]
#[command(author, version, about = "pkgfile - find which package owns a file")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// File-list archive to scan (e.g. /var/lib/pacman/sync/core.files)
    #[arg(short, long, global = true, env = ARCHIVE_ENV)]
    pub archive: Option<PathBuf>,

    /// Config file location
    #[arg(long, global = true, env = CONFIG_ENV)]
    pub config: Option<PathBuf>,

    /// Only show files in a bin/ or sbin/ directory
    #[arg(short, long, global = true)]
    pub binaries: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable coloured output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the files owned by a package
    List {
        /// Package name (without version)
        package: String,
        /// Treat the package name as a shell glob
        #[arg(short, long)]
        glob: bool,
    },
    /// Search which package owns a file
    Search(SearchArgs),
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Filename, rooted path, glob or regex depending on the match flags
    pub pattern: String,

    /// Match the basename against a shell glob
    #[arg(short, long, group = "matcher")]
    pub glob: bool,

    /// Match the path against a POSIX extended regex
    #[arg(short, long, group = "matcher")]
    pub regex: bool,

    /// Match the path against a Perl-compatible regex
    #[arg(short = 'P', long, group = "matcher")]
    pub pcre: bool,

    /// Case-insensitive glob and regex matching
    #[arg(short, long)]
    pub ignore_case: bool,

    /// Only print package names
    #[arg(short, long)]
    pub quiet: bool,
}

impl SearchArgs {
    /// Matcher selected by the flags.
    pub fn strategy(&self) -> pkgfile_core::MatchStrategy {
        use pkgfile_core::MatchStrategy;

        if self.glob {
            MatchStrategy::Shell
        } else if self.regex {
            MatchStrategy::ExtendedRegex
        } else if self.pcre {
            MatchStrategy::PortableRegex
        } else {
            MatchStrategy::Simple
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgfile_core::MatchStrategy;

    #[test]
    fn test_search_defaults_to_simple_match() {
        let cli = Cli::parse_from(["pkgfile", "search", "ls"]);
        match cli.command {
            Commands::Search(args) => assert_eq!(args.strategy(), MatchStrategy::Simple),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_search_flags_select_strategy() {
        let cli = Cli::parse_from(["pkgfile", "search", "-P", "bin/.*sh$"]);
        match cli.command {
            Commands::Search(args) => assert_eq!(args.strategy(), MatchStrategy::PortableRegex),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_match_flags_conflict() {
        assert!(Cli::try_parse_from(["pkgfile", "search", "-g", "-r", "x"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["pkgfile", "list", "bash", "--archive", "/tmp/core.files", "-b"]);
        assert_eq!(cli.global.archive, Some(PathBuf::from("/tmp/core.files")));
        assert!(cli.global.binaries);
    }
}
