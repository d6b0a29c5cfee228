//! UI Theme - colours for result rows
//!
//! Colour is applied only when enabled. The commands enable it only when
//! stdout is a terminal, so piped output stays plain.

use crossterm::style::{Color, Stylize};

/// Colour scheme for result rows
#[derive(Debug, Clone)]
pub struct Theme {
    /// Whether escape codes are emitted at all
    pub color: bool,
    /// Package names (primary content)
    pub package_name: Color,
    /// File paths
    pub file_path: Color,
}

impl Theme {
    /// Create the default theme, optionally without colour
    pub fn new(color: bool) -> Self {
        Self {
            color,
            package_name: Color::Cyan,
            file_path: Color::White,
        }
    }

    /// Style a package name
    pub fn package(&self, name: &str) -> String {
        self.paint(name, self.package_name)
    }

    /// Style a file path
    pub fn path(&self, path: &str) -> String {
        self.paint(path, self.file_path)
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(true)
    }
}
