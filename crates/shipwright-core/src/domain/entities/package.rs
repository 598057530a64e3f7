//! Scaffolded command packages and their fixed file templates.

use std::path::{Path, PathBuf};

use crate::domain::{
    artifacts::{COMMAND_GROUPS, GROUP_EXPORTS},
    entities::{layout::ProjectLayout, region::GeneratedRegion},
    value_objects::{CommandName, GroupId},
};

/// The three files every command package consists of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFile {
    /// Interface stub re-exporting the command entry point.
    Interface,
    /// Argument-parsing wrapper around the service.
    Cli,
    /// Business-logic placeholder.
    Services,
}

impl PackageFile {
    pub const ALL: [PackageFile; 3] = [Self::Interface, Self::Cli, Self::Services];

    pub const fn file_name(&self) -> &'static str {
        match self {
            Self::Interface => "__init__.py",
            Self::Cli => "cli.py",
            Self::Services => "services.py",
        }
    }

    pub fn render(&self, command: &CommandName) -> String {
        let name = command.canonical();
        let module = command.module_name();
        match self {
            Self::Interface => format!(
                "\"\"\"Command package for `{name}`.\"\"\"\n\
                 \n\
                 from .cli import {module}_command\n\
                 \n\
                 __all__ = [\"{module}_command\"]\n"
            ),
            Self::Cli => format!(
                "import click\n\
                 \n\
                 from .services import {module}_service\n\
                 \n\
                 \n\
                 @click.command(name=\"{name}\")\n\
                 @click.argument(\"target\", required=False)\n\
                 def {module}_command(target=None):\n\
                 \x20   \"\"\"Run the {name} command.\"\"\"\n\
                 \x20   click.echo({module}_service(target))\n\
                 \n\
                 \n\
                 if __name__ == \"__main__\":\n\
                 \x20   {module}_command()\n"
            ),
            Self::Services => format!(
                "def {module}_service(target=None):\n\
                 \x20   \"\"\"Business logic for {name}. Replace this placeholder.\"\"\"\n\
                 \x20   return f\"{name} executed with target: {{target}}\"\n"
            ),
        }
    }
}

/// A command package rooted at `<commands-root>/<group>/<command_module>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldedPackage {
    pub group: GroupId,
    pub command: CommandName,
    pub root: PathBuf,
}

impl ScaffoldedPackage {
    pub fn new(layout: &ProjectLayout, group: &GroupId, command: &CommandName) -> Self {
        Self {
            group: group.clone(),
            command: command.clone(),
            root: layout.package_dir(group, command),
        }
    }

    /// Every required file with the content it gets when missing.
    pub fn files(&self) -> Vec<(PathBuf, String)> {
        PackageFile::ALL
            .iter()
            .map(|f| (self.root.join(f.file_name()), f.render(&self.command)))
            .collect()
    }

    pub fn file(&self, file: PackageFile) -> PathBuf {
        self.root.join(file.file_name())
    }

    /// The import that ties `cli.py` to its service module.
    pub fn service_import(&self) -> String {
        format!("from .services import {}_service", self.command.module_name())
    }
}

/// Skeleton of a group's `__init__.py`; the region body is filled by the
/// artifact writer.
pub fn group_init_template(group: &GroupId) -> String {
    format!(
        "\"\"\"Command group `{group}`.\"\"\"\n\n{}",
        GeneratedRegion::new(GROUP_EXPORTS, std::iter::empty::<&str>()).delimited()
    )
}

/// Skeleton of the commands root `__init__.py`.
pub fn commands_init_template() -> String {
    format!(
        "\"\"\"Command groups.\"\"\"\n\n{}",
        GeneratedRegion::new(COMMAND_GROUPS, std::iter::empty::<&str>()).delimited()
    )
}

/// Whether a directory name under the commands root can be a package.
pub fn is_package_dir_name(name: &str) -> bool {
    !name.starts_with('.') && !name.starts_with("__")
}

/// File name component of a path as `&str`, if it is valid UTF-8.
pub fn dir_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package() -> ScaffoldedPackage {
        let layout = ProjectLayout::conventional(Path::new("/proj"), "starship");
        ScaffoldedPackage::new(
            &layout,
            &GroupId::new("probe").unwrap(),
            &CommandName::new("map-planet").unwrap(),
        )
    }

    #[test]
    fn package_root_uses_module_name() {
        assert_eq!(
            package().root,
            PathBuf::from("/proj/src/starship/commands/probe/map_planet")
        );
    }

    #[test]
    fn three_files_are_scaffolded() {
        let files = package().files();
        let names: Vec<_> = files
            .iter()
            .map(|(p, _)| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["__init__.py", "cli.py", "services.py"]);
    }

    #[test]
    fn templates_substitute_module_name() {
        let cmd = CommandName::new("map_planet").unwrap();
        let cli = PackageFile::Cli.render(&cmd);
        assert!(cli.contains("def map_planet_command(target=None):"));
        assert!(cli.contains("@click.command(name=\"map-planet\")"));
        assert!(cli.contains(&package().service_import()));

        let services = PackageFile::Services.render(&cmd);
        assert!(services.contains("{target}"));
        assert!(services.starts_with("def map_planet_service(target=None):\n    \"\"\""));
    }

    #[test]
    fn skeletons_contain_empty_regions() {
        let group = GroupId::new("probe").unwrap();
        let init = group_init_template(&group);
        assert_eq!(GROUP_EXPORTS.extract(&init).unwrap(), Some(""));
        assert_eq!(COMMAND_GROUPS.extract(&commands_init_template()).unwrap(), Some(""));
    }

    #[test]
    fn cache_and_hidden_dirs_are_not_packages() {
        assert!(is_package_dir_name("map_planet"));
        assert!(!is_package_dir_name("__pycache__"));
        assert!(!is_package_dir_name(".git"));
    }
}
