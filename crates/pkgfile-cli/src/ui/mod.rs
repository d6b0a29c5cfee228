//! Terminal output for list and search results

pub mod buffer;
pub mod theme;

pub use buffer::OutputBuffer;
pub use theme::Theme;

use anyhow::{Context, Result};
use serde_json::to_string_pretty;

use pkgfile_core::QueryOutput;

/// Render a manifest path with a leading `/`, the way it sits on disk.
pub fn rooted(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Print one `<package> /<path>` row
pub fn print_file_row(buffer: &mut OutputBuffer, theme: &Theme, package: &str, path: &str) {
    let line = format!(
        "{} {}",
        theme.package(package),
        theme.path(&rooted(path))
    );
    buffer.write_line(&line);
}

/// Print a bare package row (quiet search)
pub fn print_package_row(buffer: &mut OutputBuffer, theme: &Theme, package: &str) {
    buffer.write_line(&theme.package(package));
}

/// Print the raw result as pretty JSON
pub fn print_json(output: &QueryOutput) -> Result<()> {
    let json = to_string_pretty(output).context("Failed to serialize results")?;
    let mut buffer = OutputBuffer::default();
    buffer.write_line(&json);
    buffer.flush();
    Ok(())
}
