//! Default mode: synchronize the project with its registry.

use std::path::Path;

use tracing::{info, instrument};

use shipwright_adapters::{LocalFilesystem, ReservedListFile, YamlRegistryLoader};
use shipwright_core::application::{
    RegionOutcome, StaleKind, SyncMode, SyncService, SyncSummary,
};

use crate::{
    cli::OutputFormat,
    config::ResolvedProject,
    error::{CliError, CliResult},
    output::{Change, OutputManager},
};

#[instrument(skip_all, fields(root = %project.root.display(), check = check))]
pub fn execute(check: bool, project: ResolvedProject, output: &OutputManager) -> CliResult<()> {
    let mode = if check { SyncMode::Check } else { SyncMode::Apply };
    let service = SyncService::new(
        Box::new(YamlRegistryLoader::new(&project.registry)),
        Box::new(ReservedListFile::new(&project.reserved)),
        Box::new(LocalFilesystem::new()),
        project.layout,
    );

    let summary = service.run(mode)?;
    info!(
        scaffolded = summary.scaffolded.len(),
        written = summary.written.len(),
        "sync finished"
    );

    if output.format() == OutputFormat::Json {
        output.json(&summary)?;
    } else {
        report(&summary, &project.root, output)?;
    }

    if check && summary.has_changes() {
        return Err(CliError::Drift {
            files: summary.scaffolded.len() + summary.written.len(),
        });
    }
    Ok(())
}

fn report(summary: &SyncSummary, root: &Path, output: &OutputManager) -> CliResult<()> {
    let check = summary.mode == SyncMode::Check;
    let (create_verb, update_verb) = if check {
        ("Would create", "Would update")
    } else {
        ("Created", "Updated")
    };

    output.header(&format!(
        "Registry {} ({} groups, {} commands)",
        relative(root, Path::new(&summary.registry)),
        summary.groups,
        summary.commands
    ))?;

    for path in &summary.scaffolded {
        output.success(&format!("{create_verb} {}", relative(root, path)))?;
    }

    if !summary.aliases.is_empty() {
        output.print("Alias table:")?;
        for c in &summary.aliases.added {
            output.change(Change::Added, &format!("{} -> {}", c.alias, target(&c.new)))?;
        }
        for c in &summary.aliases.updated {
            output.change(
                Change::Updated,
                &format!("{}: {} -> {}", c.alias, target(&c.old), target(&c.new)),
            )?;
        }
        for c in &summary.aliases.removed {
            output.change(Change::Removed, &format!("{} -> {}", c.alias, target(&c.old)))?;
        }
    }

    for change in &summary.artifacts {
        let path = relative(root, &change.path);
        match change.outcome {
            RegionOutcome::Unchanged => {}
            RegionOutcome::Replaced => {
                output.info(&format!("{update_verb} region '{}' in {path}", change.region))?;
            }
            RegionOutcome::Inserted => output.warning(&format!(
                "No '{}' markers in {path}; region inserted at the default position",
                change.region
            ))?,
        }
    }

    for entry in &summary.stale {
        let what = match entry.kind {
            StaleKind::Group => "group directory",
            StaleKind::Package => "command package",
        };
        output.warning(&format!(
            "Stale {what} {} is not in the registry; remove it manually",
            relative(root, &entry.path)
        ))?;
    }

    if !summary.has_changes() {
        output.success(&format!(
            "Up to date ({} aliases)",
            summary.alias_count
        ))?;
    } else if check {
        output.warning(&format!(
            "{} file(s) would change",
            summary.scaffolded.len() + summary.written.len()
        ))?;
    } else {
        output.success(&format!(
            "Synchronized {} aliases, {} file(s) written",
            summary.alias_count,
            summary.scaffolded.len() + summary.written.len()
        ))?;
    }
    Ok(())
}

fn target(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("?")
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_shown_relative_to_root() {
        assert_eq!(
            relative(Path::new("/p"), Path::new("/p/src/app/cli.py")),
            "src/app/cli.py"
        );
        assert_eq!(relative(Path::new("/p"), Path::new("/other/x")), "/other/x");
    }

    #[test]
    fn missing_targets_render_as_question_mark() {
        assert_eq!(target(&None), "?");
        assert_eq!(target(&Some("a:b".into())), "a:b");
    }
}
