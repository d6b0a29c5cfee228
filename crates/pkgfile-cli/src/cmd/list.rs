//! List command

use std::process::ExitCode;

use anyhow::{Context, Result};
use pkgfile_core::{Mode, Query, QueryOutput};

use super::Session;
use crate::GlobalArgs;
use crate::ui::{self, OutputBuffer};

/// List the files of the first package named `package`
pub fn list(global: &GlobalArgs, package: &str, glob: bool) -> Result<ExitCode> {
    let session = Session::resolve(global)?;

    let query = Query {
        mode: Mode::List { glob },
        ..Query::list(package)
    }
    .binaries(session.binaries);

    let output = query
        .run(&session.archive)
        .with_context(|| format!("Failed to list '{package}'"))?;

    if session.json {
        ui::print_json(&output)?;
    } else if let QueryOutput::Listing(listing) = &output {
        match listing {
            Some(listing) => {
                let mut buffer = OutputBuffer::default();
                for file in &listing.files {
                    ui::print_file_row(&mut buffer, &session.theme, &listing.identity.name, file);
                }
                buffer.flush();
            }
            None => eprintln!("Package \"{package}\" not found"),
        }
    }

    if output.is_empty() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
