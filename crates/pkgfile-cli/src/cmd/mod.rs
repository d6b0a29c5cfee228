//! Command modules - one file per CLI command

pub mod completions;
pub mod list;
pub mod search;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use pkgfile_core::Config;

use crate::GlobalArgs;
use crate::ui::Theme;

/// Settings shared by the scanning commands, after merging flags,
/// environment and config file.
#[derive(Debug)]
pub struct Session {
    pub archive: PathBuf,
    pub binaries: bool,
    pub json: bool,
    pub theme: Theme,
}

impl Session {
    /// Resolve the archive and output settings for one run.
    pub fn resolve(global: &GlobalArgs) -> Result<Self> {
        let config = Config::discover(global.config.as_deref()).context("Failed to load config")?;

        let Some(archive) = global.archive.clone().or(config.archive) else {
            let hint = Config::default_path()
                .map_or_else(|| "the config file".to_string(), |p| p.display().to_string());
            bail!("No archive configured. Pass --archive, set PKGFILE_ARCHIVE, or set `archive` in {hint}");
        };

        tracing::debug!("Using archive {}", archive.display());

        Ok(Self {
            archive,
            binaries: global.binaries || config.binaries,
            json: global.json,
            theme: Theme::new(use_color(
                config.color,
                global.no_color,
                std::io::stdout().is_terminal(),
            )),
        })
    }
}

/// Colour only reaches a terminal, and only when neither the config nor
/// `--no-color` turned it off.
fn use_color(configured: bool, no_color: bool, is_terminal: bool) -> bool {
    configured && !no_color && is_terminal
}
