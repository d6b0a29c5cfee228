//! Search command

use std::process::ExitCode;

use anyhow::{Context, Result};
use pkgfile_core::{Query, QueryOutput};

use super::Session;
use crate::ui::{self, OutputBuffer};
use crate::{GlobalArgs, SearchArgs};

/// Search which packages own files matching the pattern
pub fn search(global: &GlobalArgs, args: &SearchArgs) -> Result<ExitCode> {
    let session = Session::resolve(global)?;

    let query = Query::search(args.strategy(), args.pattern.as_str())
        .ignore_case(args.ignore_case)
        .binaries(session.binaries);

    let output = query
        .run(&session.archive)
        .with_context(|| format!("Failed to search for '{}'", args.pattern))?;

    if session.json {
        ui::print_json(&output)?;
    } else if let QueryOutput::Packages(packages) = &output {
        let mut buffer = OutputBuffer::default();
        for hit in packages {
            if args.quiet {
                ui::print_package_row(&mut buffer, &session.theme, &hit.package);
                continue;
            }
            for file in &hit.files {
                ui::print_file_row(&mut buffer, &session.theme, &hit.package, file);
            }
        }
        buffer.flush();
    }

    if output.is_empty() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
