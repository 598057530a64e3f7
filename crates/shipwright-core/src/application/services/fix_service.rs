//! Fix Service - repair the service import of one scaffolded `cli.py`.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    application::{ports::Filesystem, services::underlying_reason, ApplicationError},
    domain::{
        entities::package::{self, PackageFile},
        CommandName, GroupId, ProjectLayout, ScaffoldedPackage,
    },
    error::{ShipwrightError, ShipwrightResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FixOutcome {
    Added,
    AlreadyPresent,
}

pub struct FixService<'a> {
    filesystem: &'a dyn Filesystem,
    layout: &'a ProjectLayout,
}

impl<'a> FixService<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, layout: &'a ProjectLayout) -> Self {
        Self { filesystem, layout }
    }

    /// Ensure `path`, the `cli.py` of a scaffolded package, imports its
    /// service function. Nothing else in the file is touched.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn fix(&self, path: &Path) -> ShipwrightResult<FixOutcome> {
        let pkg = self.package_for(path)?;
        let import = pkg.service_import();

        let content = self
            .filesystem
            .read_file(path)
            .map_err(|e| self.failed(path, underlying_reason(&e)))?
            .ok_or_else(|| self.failed(path, "file does not exist".into()))?;

        if content.lines().any(|line| line.trim() == import) {
            return Ok(FixOutcome::AlreadyPresent);
        }

        let fixed = insert_import(&content, &import);
        self.filesystem
            .write_file(path, &fixed)
            .map_err(|e| self.failed(path, underlying_reason(&e)))?;
        info!(import = %import, "service import added");
        Ok(FixOutcome::Added)
    }

    /// The package a `cli.py` path belongs to:
    /// `<commands-root>/<group>/<module>/cli.py`.
    ///
    /// Both sides are compared after lexical normalization, so a root given
    /// as `work/../app` still matches `app/.../cli.py`.
    fn package_for(&self, path: &Path) -> ShipwrightResult<ScaffoldedPackage> {
        let outside = || self.failed(path, "not the cli.py of a scaffolded command package".into());

        let normalized = normalize(path);
        if package::dir_name(&normalized) != Some(PackageFile::Cli.file_name()) {
            return Err(outside());
        }
        let package_dir = normalized.parent().ok_or_else(outside)?;
        let group_dir = package_dir.parent().ok_or_else(outside)?;
        if group_dir.parent() != Some(normalize(&self.layout.commands_root).as_path()) {
            return Err(outside());
        }

        let group = package::dir_name(group_dir)
            .and_then(|n| GroupId::new(n).ok())
            .ok_or_else(outside)?;
        let command = package::dir_name(package_dir)
            .and_then(|n| CommandName::new(n).ok())
            .ok_or_else(outside)?;

        let pkg = ScaffoldedPackage::new(self.layout, &group, &command);
        if normalize(&pkg.file(PackageFile::Cli)) != normalized {
            return Err(outside());
        }
        Ok(pkg)
    }

    fn failed(&self, path: &Path, reason: String) -> ShipwrightError {
        ApplicationError::FixFailed {
            path: PathBuf::from(path),
            reason,
        }
        .into()
    }
}

/// Resolve `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

/// Insert `import` after the leading shebang, comment lines, blank lines and
/// module docstring.
fn insert_import(content: &str, import: &str) -> String {
    let mut offset = 0;
    let mut in_docstring: Option<&str> = None;
    let mut seen_docstring = false;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim();
        if let Some(quote) = in_docstring {
            offset += line.len();
            if trimmed.ends_with(quote) {
                in_docstring = None;
            }
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with('#') {
            offset += line.len();
            continue;
        }
        if !seen_docstring {
            if let Some(quote) = ["\"\"\"", "'''"].into_iter().find(|q| trimmed.starts_with(q)) {
                seen_docstring = true;
                offset += line.len();
                let rest = &trimmed[quote.len()..];
                if !rest.contains(quote) {
                    in_docstring = Some(quote);
                }
                continue;
            }
        }
        break;
    }

    let (head, rest) = content.split_at(offset);
    let mut out = String::with_capacity(content.len() + import.len() + 1);
    out.push_str(head);
    if !head.is_empty() && !head.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(import);
    out.push('\n');
    out.push_str(rest);
    out
}
