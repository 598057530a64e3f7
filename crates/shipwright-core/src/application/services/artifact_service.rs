//! Artifact Service - stages generated regions, then writes them in one go.
//!
//! Every region is spliced into an in-memory copy of its file first. Only
//! when all regions have been staged without error does [`ArtifactService::commit`]
//! touch the disk, so a malformed sentinel in one file leaves every file
//! untouched. Files whose staged content equals what is on disk are skipped.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    application::{ports::Filesystem, services::underlying_reason, ApplicationError},
    domain::{GeneratedRegion, RegionSpec, Splice},
    error::{ShipwrightError, ShipwrightResult},
};

/// What happened to one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionOutcome {
    /// Body already up to date.
    Unchanged,
    /// Body between existing sentinels replaced.
    Replaced,
    /// Sentinels were missing; a new region was inserted at its anchor.
    Inserted,
}

impl RegionOutcome {
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// One staged region and its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactChange {
    pub path: PathBuf,
    pub region: String,
    pub outcome: RegionOutcome,
}

struct StagedFile {
    original: Option<String>,
    content: String,
}

pub struct ArtifactService<'a> {
    filesystem: &'a dyn Filesystem,
    staged: BTreeMap<PathBuf, StagedFile>,
    changes: Vec<ArtifactChange>,
}

impl<'a> ArtifactService<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self {
            filesystem,
            staged: BTreeMap::new(),
            changes: Vec::new(),
        }
    }

    /// Current body of a region as it is on disk, `None` when the file or
    /// the region does not exist.
    pub fn read_region(&self, path: &Path, spec: &RegionSpec) -> ShipwrightResult<Option<String>> {
        let Some(text) = self.read(path, spec)? else {
            return Ok(None);
        };
        let body = spec
            .extract(&text)
            .map_err(|e| write_error(path, spec, e.to_string()))?;
        Ok(body.map(str::to_string))
    }

    /// Splice `region` into the staged copy of `path`.
    pub fn stage(&mut self, path: &Path, region: &GeneratedRegion) -> ShipwrightResult<RegionOutcome> {
        if !self.staged.contains_key(path) {
            let original = self.read(path, region.spec())?;
            let content = original.clone().unwrap_or_default();
            self.staged
                .insert(path.to_path_buf(), StagedFile { original, content });
        }
        let Some(file) = self.staged.get_mut(path) else {
            return Err(ShipwrightError::Internal {
                message: format!("staged file {} vanished", path.display()),
            });
        };

        let splice = region
            .splice_into(&file.content)
            .map_err(|e| write_error(path, region.spec(), e.to_string()))?;

        let outcome = match splice {
            Splice::Unchanged => RegionOutcome::Unchanged,
            Splice::Replaced(content) => {
                file.content = content;
                RegionOutcome::Replaced
            }
            Splice::Inserted(content) => {
                warn!(
                    path = %path.display(),
                    region = region.spec().name(),
                    "region sentinels missing; inserted a new region"
                );
                file.content = content;
                RegionOutcome::Inserted
            }
        };

        debug!(path = %path.display(), region = region.spec().name(), ?outcome, "region staged");
        self.changes.push(ArtifactChange {
            path: path.to_path_buf(),
            region: region.spec().name().to_string(),
            outcome,
        });
        Ok(outcome)
    }

    /// Paths whose staged content differs from disk.
    pub fn pending(&self) -> Vec<&Path> {
        self.staged
            .iter()
            .filter(|(_, f)| f.original.as_deref() != Some(f.content.as_str()))
            .map(|(p, _)| p.as_path())
            .collect()
    }

    /// Write every changed file (unless `dry_run`) and return the per-region log.
    pub fn commit(self, dry_run: bool) -> ShipwrightResult<Vec<ArtifactChange>> {
        let mut written = 0usize;
        for (path, file) in &self.staged {
            if file.original.as_deref() == Some(file.content.as_str()) {
                continue;
            }
            written += 1;
            if dry_run {
                continue;
            }
            let io_err = |e: ShipwrightError| ApplicationError::ArtifactWrite {
                path: path.clone(),
                region: self.regions_in(path),
                reason: underlying_reason(&e),
            };
            if let Some(parent) = path.parent() {
                self.filesystem.create_dir_all(parent).map_err(io_err)?;
            }
            self.filesystem
                .write_file(path, &file.content)
                .map_err(io_err)?;
        }
        if written > 0 && !dry_run {
            info!(files = written, "generated regions written");
        }
        Ok(self.changes)
    }

    fn read(&self, path: &Path, spec: &RegionSpec) -> ShipwrightResult<Option<String>> {
        self.filesystem
            .read_file(path)
            .map_err(|e| write_error(path, spec, underlying_reason(&e)))
    }

    fn regions_in(&self, path: &Path) -> String {
        self.changes
            .iter()
            .filter(|c| c.path == path)
            .map(|c| c.region.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn write_error(path: &Path, spec: &RegionSpec, reason: String) -> ShipwrightError {
    ApplicationError::ArtifactWrite {
        path: path.to_path_buf(),
        region: spec.name().to_string(),
        reason,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFilesystem;

    const SPEC: RegionSpec = RegionSpec::new("demo");

    fn region(lines: &[&str]) -> GeneratedRegion {
        GeneratedRegion::new(SPEC, lines.iter().copied())
    }

    fn file_with(body: &str) -> String {
        format!(
            "head\n{}\n{body}{}\ntail\n",
            SPEC.start_marker(),
            SPEC.end_marker()
        )
    }

    #[test]
    fn unchanged_region_is_not_written() {
        let mut fs = MockFilesystem::new();
        let existing = file_with("a\n");
        fs.expect_read_file()
            .returning(move |_| Ok(Some(existing.clone())));
        fs.expect_write_file().never();

        let mut svc = ArtifactService::new(&fs);
        let outcome = svc.stage(Path::new("/x.py"), &region(&["a"])).unwrap();
        assert_eq!(outcome, RegionOutcome::Unchanged);
        assert!(svc.pending().is_empty());
        let changes = svc.commit(false).unwrap();
        assert_eq!(changes.len(), 1);
    }

    #[test]
    fn replaced_region_is_written_once() {
        let mut fs = MockFilesystem::new();
        let existing = file_with("old\n");
        fs.expect_read_file()
            .returning(move |_| Ok(Some(existing.clone())));
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_write_file()
            .withf(|path, content| path == Path::new("/x.py") && content == file_with("new\n"))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut svc = ArtifactService::new(&fs);
        svc.stage(Path::new("/x.py"), &region(&["new"])).unwrap();
        svc.commit(false).unwrap();
    }

    #[test]
    fn malformed_region_fails_before_anything_is_written() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_file().returning(|path| {
            if path == Path::new("/bad.py") {
                Ok(Some(format!("{}\n", SPEC.start_marker())))
            } else {
                Ok(None)
            }
        });
        fs.expect_write_file().never();

        let mut svc = ArtifactService::new(&fs);
        svc.stage(Path::new("/good.py"), &region(&["x"])).unwrap();
        let err = svc.stage(Path::new("/bad.py"), &region(&["x"])).unwrap_err();
        assert!(matches!(
            err,
            ShipwrightError::Application(ApplicationError::ArtifactWrite { .. })
        ));
    }

    #[test]
    fn missing_file_is_created_with_region() {
        let mut fs = MockFilesystem::new();
        fs.expect_read_file().returning(|_| Ok(None));

        let mut svc = ArtifactService::new(&fs);
        let outcome = svc.stage(Path::new("/new.py"), &region(&["x"])).unwrap();
        assert_eq!(outcome, RegionOutcome::Inserted);
        assert_eq!(svc.pending(), [Path::new("/new.py")]);
        // dry run: nothing written, change still reported
        let changes = svc.commit(true).unwrap();
        assert!(changes[0].outcome.is_change());
    }

    #[test]
    fn read_region_returns_current_body() {
        let mut fs = MockFilesystem::new();
        let existing = file_with("body\n");
        fs.expect_read_file()
            .returning(move |_| Ok(Some(existing.clone())));

        let svc = ArtifactService::new(&fs);
        let body = svc.read_region(Path::new("/x.py"), &SPEC).unwrap();
        assert_eq!(body.as_deref(), Some("body\n"));
    }
}
