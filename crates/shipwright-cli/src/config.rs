//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate only ever sees the resolved
//! [`ProjectLayout`].
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (`--root`, `--registry`, `--reserved`; see [`AppConfig::apply_flags`])
//! 2. Environment variables `SHIPWRIGHT__<SECTION>__<KEY>`
//! 3. Config file: `--config`, else `shipwright.toml` in the project root,
//!    else `config.toml` in the per-user config directory
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use shipwright_core::domain::ProjectLayout;

use crate::cli::Cli;

/// File name looked up in the project root when `--config` is absent.
pub const PROJECT_CONFIG_FILE: &str = "shipwright.toml";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub project: ProjectConfig,
    pub paths: PathsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project root; `None` means the current directory.
    pub root: Option<PathBuf>,
    /// Importable package of the generated application.
    pub package: String,
    /// Top-level executable name, always first in the alias table.
    pub program: String,
}

/// File locations.  `None` selects the conventional location under the
/// project root; relative paths resolve against the project root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    pub registry: Option<PathBuf>,
    pub reserved: Option<PathBuf>,
    pub commands_root: Option<PathBuf>,
    pub pyproject: Option<PathBuf>,
    pub cli: Option<PathBuf>,
    pub styles: Option<PathBuf>,
    /// README receiving the command reference; unset disables the region.
    pub readme: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project: ProjectConfig {
                root: None,
                package: "starshipagentic".into(),
                program: "starshipagentic".into(),
            },
            paths: PathsConfig::default(),
            output: OutputConfig {
                no_color: false,
                format: "human".into(),
            },
        }
    }
}

/// Everything a run needs, with every path made absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProject {
    pub root: PathBuf,
    pub registry: PathBuf,
    pub reserved: PathBuf,
    pub layout: ProjectLayout,
}

impl AppConfig {
    /// Load configuration, layering file and environment over the defaults.
    ///
    /// `config_file` is the path passed via `--config`; it must exist when
    /// given.  `root_hint` is the `--root` flag, used to find
    /// `shipwright.toml` before the project root is otherwise known.
    pub fn load(config_file: Option<&PathBuf>, root_hint: Option<&Path>) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&Self::default()).context("invalid built-in defaults")?;
        let mut builder = Config::builder().add_source(defaults);

        match config_file {
            Some(path) => {
                debug!(path = %path.display(), "using explicit config file");
                builder = builder.add_source(File::from(path.as_path()).required(true));
            }
            None => {
                let local = root_hint
                    .unwrap_or_else(|| Path::new("."))
                    .join(PROJECT_CONFIG_FILE);
                if local.is_file() {
                    debug!(path = %local.display(), "using project config file");
                    builder = builder.add_source(File::from(local).required(true));
                } else {
                    builder = builder.add_source(File::from(Self::config_path()).required(false));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("SHIPWRIGHT")
                .prefix_separator("__")
                .separator("__"),
        );

        let config = builder
            .build()
            .context("failed to read configuration")?
            .try_deserialize::<Self>()
            .context("configuration has an unexpected shape")?;
        Ok(config)
    }

    /// Path to the per-user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.shipwright.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "shipwright", "shipwright")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".shipwright.toml"))
    }

    /// Command-line flags win over every other source.
    pub fn apply_flags(&mut self, cli: &Cli) {
        if let Some(root) = &cli.root {
            self.project.root = Some(root.clone());
        }
        if let Some(registry) = &cli.registry {
            self.paths.registry = Some(registry.clone());
        }
        if let Some(reserved) = &cli.reserved {
            self.paths.reserved = Some(reserved.clone());
        }
    }

    /// Resolve every configured path against the project root.
    ///
    /// `cwd` anchors a relative (or absent) project root.
    pub fn resolve(&self, cwd: &Path) -> ResolvedProject {
        let root = match &self.project.root {
            Some(root) => absolute(cwd, root),
            None => cwd.to_path_buf(),
        };
        let package = self.project.package.as_str();

        let mut layout = ProjectLayout::conventional(&root, package);
        layout.program = self.project.program.clone();

        let paths = &self.paths;
        let pick = |configured: &Option<PathBuf>, default: PathBuf| {
            configured
                .as_deref()
                .map(|p| absolute(&root, p))
                .unwrap_or(default)
        };
        layout.commands_root = pick(&paths.commands_root, layout.commands_root.clone());
        layout.pyproject = pick(&paths.pyproject, layout.pyproject.clone());
        layout.cli_module = pick(&paths.cli, layout.cli_module.clone());
        layout.group_styles = pick(&paths.styles, layout.group_styles.clone());
        layout.readme = paths.readme.as_deref().map(|p| absolute(&root, p));

        let registry = pick(
            &paths.registry,
            root.join("src").join(package).join("commands-list.yml"),
        );
        let reserved = pick(&paths.reserved, root.join("no-go-alias.txt"));

        ResolvedProject {
            root,
            registry,
            reserved,
            layout,
        }
    }
}

fn absolute(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
