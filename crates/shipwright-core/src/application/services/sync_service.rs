//! Sync Service - the full pipeline.
//!
//! ```text
//! Idle → Loading → Scaffolding → Resolving → Detecting → Writing → Done
//!                                                   └──→ Aborted
//! ```
//!
//! Stages run strictly in sequence. A non-empty conflict report moves the
//! run to `Aborted` before the artifact service is even constructed, so no
//! generated region can be written on a conflicted registry.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ports::{Filesystem, RegistrySource, ReservedAliasSource},
        services::{
            artifact_service::{ArtifactChange, ArtifactService},
            scaffold_service::{ScaffoldService, StaleEntry},
        },
        ApplicationError,
    },
    domain::{
        artifacts::{self, AliasTable, AliasTableDiff},
        detect_conflicts, resolve_aliases, AliasBinding, AliasSourceSet, ProjectLayout, Registry,
        TargetRef,
    },
    error::ShipwrightResult,
};

/// Whether a run writes or only reports drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    Apply,
    Check,
}

impl SyncMode {
    fn dry_run(self) -> bool {
        matches!(self, Self::Check)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStage {
    Idle,
    Loading,
    Scaffolding,
    Resolving,
    Detecting,
    Writing,
    Aborted,
    Done,
}

/// Structured result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub mode: SyncMode,
    pub registry: String,
    pub groups: usize,
    pub commands: usize,
    /// Package and skeleton files created (or that would be, in check mode).
    pub scaffolded: Vec<PathBuf>,
    /// Entries in the regenerated alias table, program entry included.
    pub alias_count: usize,
    pub aliases: AliasTableDiff,
    pub artifacts: Vec<ArtifactChange>,
    /// Files rewritten (or that would be, in check mode).
    pub written: Vec<PathBuf>,
    pub stale: Vec<StaleEntry>,
    pub stages: Vec<SyncStage>,
}

impl SyncSummary {
    /// True when the run changed (or would change) anything on disk.
    pub fn has_changes(&self) -> bool {
        !self.scaffolded.is_empty() || !self.written.is_empty()
    }
}

/// Main synchronization service.
pub struct SyncService {
    registry: Box<dyn RegistrySource>,
    reserved: Box<dyn ReservedAliasSource>,
    filesystem: Box<dyn Filesystem>,
    layout: ProjectLayout,
}

impl SyncService {
    pub fn new(
        registry: Box<dyn RegistrySource>,
        reserved: Box<dyn ReservedAliasSource>,
        filesystem: Box<dyn Filesystem>,
        layout: ProjectLayout,
    ) -> Self {
        Self {
            registry,
            reserved,
            filesystem,
            layout,
        }
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    #[instrument(skip_all, fields(registry = %self.registry.location(), mode = ?mode))]
    pub fn run(&self, mode: SyncMode) -> ShipwrightResult<SyncSummary> {
        let mut trace = Trace::new();

        trace.enter(SyncStage::Loading);
        let registry = self.registry.load()?;
        let mut reserved = self.reserved.load()?;
        reserved.insert(self.layout.program.clone());
        info!(
            groups = registry.groups().len(),
            commands = registry.command_count(),
            reserved = reserved.len(),
            "registry loaded"
        );

        trace.enter(SyncStage::Scaffolding);
        let scaffolder = ScaffoldService::new(self.filesystem.as_ref(), &self.layout);
        let scaffold = scaffolder.scaffold(&registry, mode.dry_run())?;
        let stale = scaffolder.find_stale(&registry)?;

        trace.enter(SyncStage::Resolving);
        let bindings = resolve_aliases(&registry, &self.layout.package);

        trace.enter(SyncStage::Detecting);
        let report = detect_conflicts(&AliasSourceSet::from_bindings(&bindings), &reserved);
        if !report.is_empty() {
            trace.enter(SyncStage::Aborted);
            warn!(conflicts = report.len(), "aborting before any artifact is written");
            return Err(ApplicationError::AliasConflict {
                report,
                stages: trace.stages,
            }
            .into());
        }

        trace.enter(SyncStage::Writing);
        let outcome = self.write_artifacts(&registry, &bindings, mode)?;

        trace.enter(SyncStage::Done);
        Ok(SyncSummary {
            mode,
            registry: self.registry.location(),
            groups: registry.groups().len(),
            commands: registry.command_count(),
            scaffolded: scaffold.created,
            alias_count: outcome.alias_count,
            aliases: outcome.aliases,
            artifacts: outcome.artifacts,
            written: outcome.written,
            stale,
            stages: trace.stages,
        })
    }

    fn write_artifacts(
        &self,
        registry: &Registry,
        bindings: &[AliasBinding],
        mode: SyncMode,
    ) -> ShipwrightResult<WriteOutcome> {
        let layout = &self.layout;
        let mut writer = ArtifactService::new(self.filesystem.as_ref());

        let previous_table = writer
            .read_region(&layout.pyproject, &artifacts::ENTRY_POINTS)?
            .map(|body| {
                AliasTable::parse(&body).unwrap_or_else(|e| {
                    warn!(error = %e, "previous alias table unreadable; diff will treat it as empty");
                    BTreeMap::new()
                })
            })
            .unwrap_or_default();
        let table = AliasTable::build(
            &layout.program,
            &TargetRef::program_entry(&layout.package),
            bindings,
        );
        let diff = table.diff(&previous_table);
        writer.stage(&layout.pyproject, &table.to_region()?)?;

        writer.stage(
            &layout.cli_module,
            &artifacts::command_imports(&layout.package, bindings),
        )?;

        let previous_styles = writer
            .read_region(&layout.group_styles, &artifacts::GROUP_STYLES)?
            .map(|body| {
                artifacts::parse_group_styles(&body).unwrap_or_else(|e| {
                    warn!(error = %e, "existing group styles unreadable; using defaults");
                    BTreeMap::new()
                })
            })
            .unwrap_or_default();
        writer.stage(
            &layout.group_styles,
            &artifacts::group_styles(registry, &previous_styles)?,
        )?;

        for group in registry.groups() {
            writer.stage(
                &layout.group_init(group.id()),
                &artifacts::group_exports(&layout.program, &layout.package, group),
            )?;
        }
        writer.stage(&layout.commands_init(), &artifacts::command_groups(registry))?;

        if let Some(readme) = &layout.readme {
            if self.filesystem.exists(readme) {
                writer.stage(readme, &artifacts::command_reference(registry))?;
            } else {
                debug!(path = %readme.display(), "README not found; command reference skipped");
            }
        }

        let written: Vec<PathBuf> = writer.pending().into_iter().map(PathBuf::from).collect();
        let artifacts = writer.commit(mode.dry_run())?;
        Ok(WriteOutcome {
            alias_count: table.len(),
            aliases: diff,
            artifacts,
            written,
        })
    }
}

struct WriteOutcome {
    alias_count: usize,
    aliases: AliasTableDiff,
    artifacts: Vec<ArtifactChange>,
    written: Vec<PathBuf>,
}

/// Records the stage sequence of one run.
struct Trace {
    stages: Vec<SyncStage>,
}

impl Trace {
    fn new() -> Self {
        Self {
            stages: vec![SyncStage::Idle],
        }
    }

    fn enter(&mut self, stage: SyncStage) {
        debug!(?stage, "sync stage");
        self.stages.push(stage);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::path::Path;

    use super::*;
    use crate::application::ports::MockFilesystem;
    use crate::domain::{CommandGroup, CommandSpec};
    use crate::error::ShipwrightError;

    struct FixedRegistry(Registry);

    impl RegistrySource for FixedRegistry {
        fn load(&self) -> ShipwrightResult<Registry> {
            Ok(self.0.clone())
        }

        fn location(&self) -> String {
            "memory".into()
        }
    }

    struct FixedReserved(Vec<&'static str>);

    impl ReservedAliasSource for FixedReserved {
        fn load(&self) -> ShipwrightResult<BTreeSet<String>> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    fn conflicted() -> Registry {
        Registry::new(vec![
            CommandGroup::new("probe", "")
                .unwrap()
                .with_command(CommandSpec::new("map-planet", "").unwrap().with_alias("go").unwrap())
                .unwrap()
                .with_command(CommandSpec::new("scan-sector", "").unwrap().with_alias("go").unwrap())
                .unwrap(),
        ])
        .unwrap()
    }

    fn service(registry: Registry, reserved: Vec<&'static str>, fs: MockFilesystem) -> SyncService {
        SyncService::new(
            Box::new(FixedRegistry(registry)),
            Box::new(FixedReserved(reserved)),
            Box::new(fs),
            ProjectLayout::conventional(Path::new("/p"), "starship"),
        )
    }

    fn quiet_fs() -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(true);
        fs.expect_list_dirs().returning(|_| Ok(vec![]));
        fs
    }

    #[test]
    fn conflict_aborts_without_touching_artifacts() {
        let mut fs = quiet_fs();
        fs.expect_read_file().never();
        fs.expect_write_file().never();
        fs.expect_create_dir_all().never();

        let err = service(conflicted(), vec![], fs)
            .run(SyncMode::Apply)
            .unwrap_err();
        let report = err.conflict_report().expect("conflict report");
        assert_eq!(report.aliases(), ["go"]);
    }

    #[test]
    fn program_name_is_implicitly_reserved() {
        let registry = Registry::new(vec![CommandGroup::new("starship", "").unwrap()]).unwrap();
        let mut fs = quiet_fs();
        fs.expect_write_file().never();

        let err = service(registry, vec![], fs).run(SyncMode::Apply).unwrap_err();
        let stages = match err {
            ShipwrightError::Application(ApplicationError::AliasConflict { stages, .. }) => stages,
            other => panic!("expected an alias conflict, got {other:?}"),
        };
        assert_eq!(
            stages,
            [
                SyncStage::Idle,
                SyncStage::Loading,
                SyncStage::Scaffolding,
                SyncStage::Resolving,
                SyncStage::Detecting,
                SyncStage::Aborted,
            ]
        );
    }

    #[test]
    fn check_mode_never_writes() {
        let registry = Registry::new(vec![
            CommandGroup::new("vessel", "")
                .unwrap()
                .with_command(CommandSpec::new("tour-ship", "").unwrap())
                .unwrap(),
        ])
        .unwrap();
        let mut fs = MockFilesystem::new();
        fs.expect_exists().return_const(false);
        fs.expect_list_dirs().returning(|_| Ok(vec![]));
        fs.expect_read_file().returning(|_| Ok(None));
        fs.expect_write_file().never();
        fs.expect_create_dir_all().never();

        let summary = service(registry, vec![], fs).run(SyncMode::Check).unwrap();
        assert!(summary.has_changes());
        assert_eq!(summary.alias_count, 3);
        assert_eq!(summary.aliases.added.len(), 3);
        assert_eq!(
            summary.stages,
            [
                SyncStage::Idle,
                SyncStage::Loading,
                SyncStage::Scaffolding,
                SyncStage::Resolving,
                SyncStage::Detecting,
                SyncStage::Writing,
                SyncStage::Done,
            ]
        );
    }
}
