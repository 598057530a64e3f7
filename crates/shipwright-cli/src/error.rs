//! Error handling for the Shipwright CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Exit code mapping

use std::error::Error;

use owo_colors::OwoColorize;
use thiserror::Error;

use shipwright_core::domain::ConflictReport;
use shipwright_core::error::ShipwrightError;

pub use shipwright_core::error::ErrorCategory as CoreCategory;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// A configuration file could not be read or parsed.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error propagated from `shipwright-core` or an adapter.
    #[error("Synchronization failed: {0}")]
    Core(#[from] ShipwrightError),

    /// An I/O operation outside the pipeline failed (stdout, cwd).
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// `--check` found files that a real run would change.
    #[error("{files} file(s) out of date")]
    Drift { files: usize },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                format!(
                    "Check shipwright.toml in the project root or {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "Environment overrides use SHIPWRIGHT__<SECTION>__<KEY>".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check file permissions".into(),
            ],

            Self::Drift { .. } => vec![
                "Run shipwright without --check to regenerate".into(),
                "Commit the regenerated files alongside the registry change".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation | CoreCategory::Conflict => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
            Self::Drift { .. } => ErrorCategory::Drift,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category      | Code |
    /// |---------------|------|
    /// | Internal      |  1   |
    /// | User error    |  2   |
    /// | Not found     |  3   |
    /// | Configuration |  4   |
    /// | Drift         |  5   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::Internal => 1,
            ErrorCategory::UserError => 2,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
            ErrorCategory::Drift => 5,
        }
    }

    fn conflict_report(&self) -> Option<&ConflictReport> {
        match self {
            Self::Core(core) => core.conflict_report(),
            _ => None,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        if let Some(report) = self.conflict_report() {
            output.push('\n');
            for (i, line) in conflict_table(report).lines().enumerate() {
                if i == 0 {
                    output.push_str(&format!("  {}\n", line.bold()));
                } else {
                    output.push_str(&format!("  {line}\n"));
                }
            }
        }

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {}\n", suggestion));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(), // ℹ
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {}\n", self));

        if let Some(report) = self.conflict_report() {
            out.push('\n');
            for line in conflict_table(report).lines() {
                out.push_str(&format!("  {line}\n"));
            }
        }

        if verbose {
            let mut src = std::error::Error::source(self);
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Drift => tracing::info!("Drift: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Two-column table, one row per conflict.
fn conflict_table(report: &ConflictReport) -> String {
    const ALIAS: &str = "Alias";
    const DETAILS: &str = "Conflict Details";

    let width = report
        .iter()
        .map(|c| c.alias.chars().count())
        .chain(std::iter::once(ALIAS.len()))
        .max()
        .unwrap_or(ALIAS.len());

    let mut out = format!("{ALIAS:<width$} | {DETAILS}\n");
    out.push_str(&format!("{}-+-{}\n", "-".repeat(width), "-".repeat(DETAILS.len())));
    for conflict in report.iter() {
        out.push_str(&format!("{:<width$} | {}\n", conflict.alias, conflict.details()));
    }
    out
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad registry, conflicting aliases, bad arguments.
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// Check mode found out-of-date files.
    Drift,
    /// Internal/system error.
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    use shipwright_core::application::ApplicationError;
    use shipwright_core::domain::{Conflict, ConflictKind};

    fn conflict_error() -> CliError {
        let report = ConflictReport::new(vec![
            Conflict {
                alias: "scan".into(),
                kind: ConflictKind::DivergentTargets,
                sources: vec![
                    "command transmission:scan-sector".into(),
                    "command vessel:sweep".into(),
                ],
            },
            Conflict {
                alias: "ls".into(),
                kind: ConflictKind::Reserved,
                sources: vec![],
            },
        ]);
        CliError::Core(
            ApplicationError::AliasConflict {
                report,
                stages: Vec::new(),
            }
            .into(),
        )
    }

    #[test]
    fn exit_codes_per_category() {
        assert_eq!(conflict_error().exit_code(), 2);
        assert_eq!(
            CliError::Core(
                ApplicationError::FixFailed {
                    path: PathBuf::from("x"),
                    reason: "nope".into()
                }
                .into()
            )
            .exit_code(),
            3
        );
        assert_eq!(
            CliError::ConfigError {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            4
        );
        assert_eq!(CliError::Drift { files: 2 }.exit_code(), 5);
        assert_eq!(
            CliError::IoError {
                message: "x".into(),
                source: io::Error::other("e"),
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn registry_errors_are_user_errors() {
        let err = CliError::Core(
            ApplicationError::RegistryParse {
                path: PathBuf::from("commands-list.yml"),
                reason: "bad".into(),
            }
            .into(),
        );
        assert_eq!(err.category(), ErrorCategory::UserError);
        assert!(err.suggestions()[0].contains("commands-list.yml"));
    }

    #[test]
    fn conflicts_render_as_a_table() {
        let s = conflict_error().format_plain(false);
        assert!(s.contains("Alias | Conflict Details"), "{s}");
        assert!(s.contains(
            "scan  | used in multiple contexts: command transmission:scan-sector, command vessel:sweep"
        ));
        assert!(s.contains("ls    | reserved and cannot be used"));
        assert!(s.contains("Rename or remove the conflicting aliases: scan, ls"));
    }

    #[test]
    fn format_plain_contains_error_header() {
        let s = CliError::Drift { files: 3 }.format_plain(false);
        assert!(s.contains("Error: 3 file(s) out of date"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--verbose"));
    }

    #[test]
    fn format_plain_verbose_omits_hint() {
        let s = CliError::Drift { files: 1 }.format_plain(true);
        assert!(!s.contains("--verbose"));
    }

    #[test]
    fn io_errors_convert() {
        let err: CliError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(err, CliError::IoError { .. }));
    }
}
