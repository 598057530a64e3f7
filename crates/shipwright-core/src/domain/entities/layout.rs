//! Where generated and scaffolded files live on disk.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::value_objects::{CommandName, GroupId};

/// Resolved locations of every file the synchronizer reads or writes.
///
/// Built by the CLI from configuration; the core treats it as read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectLayout {
    /// Importable package name of the generated application.
    pub package: String,
    /// Name of the top-level executable; always present in the alias table.
    pub program: String,
    /// Directory holding one sub-directory per command group.
    pub commands_root: PathBuf,
    /// File holding the entry-point alias table region.
    pub pyproject: PathBuf,
    /// Main CLI module holding the import/registration region.
    pub cli_module: PathBuf,
    /// Module holding the per-group display metadata region.
    pub group_styles: PathBuf,
    /// Optional README holding the command reference region.
    pub readme: Option<PathBuf>,
}

impl ProjectLayout {
    /// Conventional layout under `root` for the given package:
    /// `src/<package>/{cli.py,group_styles.py,commands/}` and `pyproject.toml`.
    pub fn conventional(root: &Path, package: &str) -> Self {
        let src = root.join("src").join(package);
        Self {
            package: package.to_string(),
            program: package.to_string(),
            commands_root: src.join("commands"),
            pyproject: root.join("pyproject.toml"),
            cli_module: src.join("cli.py"),
            group_styles: src.join("group_styles.py"),
            readme: None,
        }
    }

    pub fn commands_init(&self) -> PathBuf {
        self.commands_root.join("__init__.py")
    }

    pub fn group_dir(&self, group: &GroupId) -> PathBuf {
        self.commands_root.join(group.as_str())
    }

    pub fn group_init(&self, group: &GroupId) -> PathBuf {
        self.group_dir(group).join("__init__.py")
    }

    /// `<commands-root>/<group>/<command_module>`
    pub fn package_dir(&self, group: &GroupId, command: &CommandName) -> PathBuf {
        self.group_dir(group).join(command.module_name())
    }
}
