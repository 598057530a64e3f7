//! Scaffold Service - package stubs for every declared command.
//!
//! The scaffolder only ever checks for existence. A file that is present,
//! whatever its content, is left alone; a missing file is created from its
//! fixed template. Directory creation is recursive and repeatable, so an
//! interrupted run is completed by simply running again.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ports::Filesystem, services::underlying_reason, ApplicationError},
    domain::{
        entities::package::{self, ScaffoldedPackage},
        ProjectLayout, Registry,
    },
    error::{ShipwrightError, ShipwrightResult},
};

/// What a scaffolding pass did (or, in check mode, would do).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScaffoldReport {
    /// Files created because they were missing.
    pub created: Vec<PathBuf>,
    /// Command packages that already had all three files.
    pub complete_packages: usize,
}

/// Kind of on-disk directory no longer backed by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StaleKind {
    Group,
    Package,
}

/// A directory under the commands root with no registry counterpart.
/// Reported only; never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaleEntry {
    pub kind: StaleKind,
    pub path: PathBuf,
}

pub struct ScaffoldService<'a> {
    filesystem: &'a dyn Filesystem,
    layout: &'a ProjectLayout,
}

impl<'a> ScaffoldService<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, layout: &'a ProjectLayout) -> Self {
        Self { filesystem, layout }
    }

    /// Ensure every package, group `__init__.py` and the commands root
    /// `__init__.py` exist. With `dry_run` nothing is written but the report
    /// still lists what would be created.
    #[instrument(skip_all, fields(root = %self.layout.commands_root.display(), dry_run = dry_run))]
    pub fn scaffold(&self, registry: &Registry, dry_run: bool) -> ShipwrightResult<ScaffoldReport> {
        let mut report = ScaffoldReport::default();

        self.ensure_file(
            &self.layout.commands_init(),
            package::commands_init_template,
            dry_run,
            &mut report,
        )?;

        for group in registry.groups() {
            self.ensure_file(
                &self.layout.group_init(group.id()),
                || package::group_init_template(group.id()),
                dry_run,
                &mut report,
            )?;

            for command in group.commands() {
                let pkg = ScaffoldedPackage::new(self.layout, group.id(), command.name());
                let before = report.created.len();
                for (path, content) in pkg.files() {
                    self.ensure_file(&path, || content, dry_run, &mut report)?;
                }
                if report.created.len() == before {
                    report.complete_packages += 1;
                } else {
                    debug!(group = %group.id(), command = %command.name(), "package scaffolded");
                }
            }
        }

        if !report.created.is_empty() {
            info!(files = report.created.len(), "scaffolded missing files");
        }
        Ok(report)
    }

    /// Group directories and command packages on disk that the registry no
    /// longer declares. `__pycache__` and dot-directories are ignored.
    pub fn find_stale(&self, registry: &Registry) -> ShipwrightResult<Vec<StaleEntry>> {
        let mut stale = Vec::new();

        for group_dir in self.filesystem.list_dirs(&self.layout.commands_root)? {
            let Some(name) = package::dir_name(&group_dir) else {
                continue;
            };
            if !package::is_package_dir_name(name) {
                continue;
            }
            let Some(group) = registry.group(name) else {
                stale.push(StaleEntry {
                    kind: StaleKind::Group,
                    path: group_dir,
                });
                continue;
            };

            for package_dir in self.filesystem.list_dirs(&group_dir)? {
                let Some(module) = package::dir_name(&package_dir) else {
                    continue;
                };
                if package::is_package_dir_name(module) && group.command(module).is_none() {
                    stale.push(StaleEntry {
                        kind: StaleKind::Package,
                        path: package_dir,
                    });
                }
            }
        }

        for entry in &stale {
            warn!(path = %entry.path.display(), kind = ?entry.kind, "stale directory not in registry");
        }
        Ok(stale)
    }

    fn ensure_file(
        &self,
        path: &Path,
        content: impl FnOnce() -> String,
        dry_run: bool,
        report: &mut ScaffoldReport,
    ) -> ShipwrightResult<()> {
        if self.filesystem.exists(path) {
            return Ok(());
        }
        if !dry_run {
            let scaffold_err = |e: ShipwrightError| ApplicationError::ScaffoldIo {
                path: path.to_path_buf(),
                reason: underlying_reason(&e),
            };
            if let Some(parent) = path.parent() {
                self.filesystem.create_dir_all(parent).map_err(scaffold_err)?;
            }
            self.filesystem
                .write_file(path, &content())
                .map_err(scaffold_err)?;
        }
        report.created.push(path.to_path_buf());
        Ok(())
    }
}
