//! `--fix-file`: add the missing service import to one command's `cli.py`.

use std::path::{Path, PathBuf};

use serde_json::json;

use shipwright_adapters::LocalFilesystem;
use shipwright_core::application::{FixOutcome, FixService};

use crate::{cli::OutputFormat, config::ResolvedProject, error::CliResult, output::OutputManager};

/// `file` is taken relative to `cwd`, like any path typed on the command line.
pub fn execute(
    file: &Path,
    cwd: &Path,
    project: &ResolvedProject,
    output: &OutputManager,
) -> CliResult<()> {
    let path: PathBuf = if file.is_absolute() {
        file.to_path_buf()
    } else {
        cwd.join(file)
    };

    let filesystem = LocalFilesystem::new();
    let outcome = FixService::new(&filesystem, &project.layout).fix(&path)?;

    if output.format() == OutputFormat::Json {
        output.json(&json!({ "path": path, "outcome": outcome }))?;
        return Ok(());
    }
    match outcome {
        FixOutcome::Added => output.success(&format!("Added service import to {}", file.display()))?,
        FixOutcome::AlreadyPresent => {
            output.info(&format!("{} already imports its service", file.display()))?
        }
    }
    Ok(())
}
