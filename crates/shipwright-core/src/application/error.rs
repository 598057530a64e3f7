//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::application::services::SyncStage;
use crate::domain::ConflictReport;
use crate::error::ErrorCategory;

/// Errors that occur during a synchronization run.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The registry document could not be read or is invalid.
    #[error("Failed to load registry {path}: {reason}")]
    RegistryParse { path: PathBuf, reason: String },

    /// Creating a scaffolded package file failed.
    #[error("Failed to scaffold {path}: {reason}")]
    ScaffoldIo { path: PathBuf, reason: String },

    /// One or more aliases are ambiguous or reserved. Nothing was written.
    ///
    /// `stages` is the stage sequence of the aborted run, ending in
    /// [`SyncStage::Aborted`].
    #[error("{} alias conflict(s) detected", .report.len())]
    AliasConflict {
        report: ConflictReport,
        stages: Vec<SyncStage>,
    },

    /// A generated region could not be written.
    #[error("Failed to write generated region '{region}' in {path}: {reason}")]
    ArtifactWrite {
        path: PathBuf,
        region: String,
        reason: String,
    },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The targeted import fix could not be applied.
    #[error("Cannot fix {path}: {reason}")]
    FixFailed { path: PathBuf, reason: String },

    /// Shared adapter state was poisoned.
    #[error("Adapter state lock poisoned")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::RegistryParse { path, .. } => vec![
                format!("Check the YAML syntax of {}", path.display()),
                "Group ids use [a-z0-9_], command names [a-z0-9_-], aliases [a-z0-9-]".into(),
                "Names start with a letter and cannot be Python keywords".into(),
            ],
            Self::ScaffoldIo { path, .. } | Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Re-running is safe: existing files are never overwritten".into(),
            ],
            Self::AliasConflict { report, .. } => vec![
                format!("Rename or remove the conflicting aliases: {}", report.aliases().join(", ")),
                "No artifacts were written; fix the registry and run again".into(),
            ],
            Self::ArtifactWrite { path, region, .. } => vec![
                format!(
                    "Check the '{}' sentinel lines in {}",
                    region,
                    path.display()
                ),
                "Each region needs exactly one START line followed by one END line".into(),
            ],
            Self::FixFailed { .. } => vec![
                "Pass the cli.py of a scaffolded command package".into(),
                "Example: src/<package>/commands/<group>/<command>/cli.py".into(),
            ],
            Self::StoreLockError => vec!["Run again; this is a transient adapter failure".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::RegistryParse { .. } => ErrorCategory::Validation,
            Self::AliasConflict { .. } => ErrorCategory::Conflict,
            Self::FixFailed { .. } => ErrorCategory::NotFound,
            Self::ScaffoldIo { .. }
            | Self::ArtifactWrite { .. }
            | Self::FilesystemError { .. }
            | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
