//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "shipwright",
    bin_name = "shipwright",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{2693} Registry-driven command scaffolding and alias sync",
    long_about = "Shipwright reads the command registry, scaffolds missing command \
                  packages, and regenerates the alias table, imports, group \
                  metadata and docs inside their AUTO-GENERATED regions.",
    after_help = "EXAMPLES:\n\
        \x20 shipwright                         # synchronize the current project\n\
        \x20 shipwright --check                 # fail if anything is out of date\n\
        \x20 shipwright --root ../app --registry commands.yml\n\
        \x20 shipwright --fix-file src/app/commands/probe/map_planet/cli.py\n\
        \x20 shipwright --completions bash > /usr/share/bash-completion/completions/shipwright",
)]
pub struct Cli {
    /// Flags shared with every mode.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Project root; relative configured paths resolve against it.
    #[arg(long = "root", value_name = "DIR", help = "Project root directory")]
    pub root: Option<PathBuf>,

    /// Registry document, overriding the configured path.
    #[arg(
        long = "registry",
        value_name = "FILE",
        help = "Command registry (YAML)"
    )]
    pub registry: Option<PathBuf>,

    /// Reserved-alias list, overriding the configured path.
    #[arg(
        long = "reserved",
        value_name = "FILE",
        help = "Reserved alias list, one per line"
    )]
    pub reserved: Option<PathBuf>,

    /// Run the whole pipeline without writing and fail on drift.
    #[arg(
        long = "check",
        help = "Report what would change and exit 5 if anything would"
    )]
    pub check: bool,

    /// Repair the service import of one scaffolded `cli.py` and exit.
    #[arg(
        long = "fix-file",
        value_name = "FILE",
        conflicts_with = "check",
        help = "Add the missing service import to a command's cli.py"
    )]
    pub fix_file: Option<PathBuf>,

    /// Print a completion script and exit.
    #[arg(
        long = "completions",
        value_name = "SHELL",
        value_enum,
        conflicts_with_all = ["check", "fix_file"],
        help = "Generate shell completions"
    )]
    pub completions: Option<Shell>,
}

/// What one invocation does, derived from the flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Sync { check: bool },
    Fix(PathBuf),
    Completions(Shell),
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if let Some(shell) = self.completions {
            Mode::Completions(shell)
        } else if let Some(path) = &self.fix_file {
            Mode::Fix(path.clone())
        } else {
            Mode::Sync { check: self.check }
        }
    }
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_syncs() {
        let cli = Cli::parse_from(["shipwright"]);
        assert_eq!(cli.mode(), Mode::Sync { check: false });
        assert!(cli.root.is_none());
    }

    #[test]
    fn check_flag() {
        let cli = Cli::parse_from(["shipwright", "--check", "--registry", "reg.yml"]);
        assert_eq!(cli.mode(), Mode::Sync { check: true });
        assert_eq!(cli.registry, Some(PathBuf::from("reg.yml")));
    }

    #[test]
    fn fix_file_mode() {
        let cli = Cli::parse_from(["shipwright", "--fix-file", "a/b/cli.py"]);
        assert_eq!(cli.mode(), Mode::Fix(PathBuf::from("a/b/cli.py")));
    }

    #[test]
    fn completions_mode() {
        let cli = Cli::parse_from(["shipwright", "--completions", "zsh"]);
        assert_eq!(cli.mode(), Mode::Completions(Shell::Zsh));
    }

    #[test]
    fn check_and_fix_conflict() {
        let result = Cli::try_parse_from(["shipwright", "--check", "--fix-file", "x.py"]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["shipwright", "--quiet", "--verbose"]);
        assert!(result.is_err());
    }

    #[test]
    fn no_color_flag_still_works_as_a_switch() {
        assert!(Cli::parse_from(["shipwright", "--no-color"]).global.no_color);
    }

    #[test]
    fn unknown_shell_is_rejected() {
        assert!(Cli::try_parse_from(["shipwright", "--completions", "tcsh"]).is_err());
    }
}
