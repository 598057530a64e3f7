// ============================================================================
// domain/error.rs - DOMAIN INVARIANT VIOLATIONS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (so reports can be carried into summaries)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Registry shape and naming
    // ========================================================================
    #[error("Invalid registry: {0}")]
    InvalidRegistry(String),

    #[error("Invalid {kind} name '{name}': {reason}")]
    InvalidName {
        kind: &'static str,
        name: String,
        reason: String,
    },

    #[error("Group '{group}' is declared more than once")]
    DuplicateGroup { group: String },

    #[error("Group '{group}' declares command '{command}' more than once (after normalizing '-' and '_')")]
    DuplicateCommand { group: String, command: String },

    // ========================================================================
    // Generated regions
    // ========================================================================
    #[error("Generated region '{region}' is malformed: {reason}")]
    MalformedRegion { region: String, reason: String },

    #[error("Generated region '{region}' could not be parsed: {reason}")]
    UnreadableRegion { region: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidRegistry(msg) => vec![
                "Check the structure of the command registry".into(),
                format!("Details: {}", msg),
            ],
            Self::InvalidName { kind, .. } => vec![match *kind {
                "group" => "Group names use lowercase letters, digits and '_' (e.g. send_probe)".into(),
                "command" => {
                    "Command names use lowercase letters, digits, '-' and '_' (e.g. map-planet)".into()
                }
                _ => "Aliases use lowercase letters, digits and '-' (e.g. map)".into(),
            }],
            Self::DuplicateGroup { group } => vec![format!(
                "Merge the two '{}' entries into a single group",
                group
            )],
            Self::DuplicateCommand { group, command } => vec![
                format!("Rename or merge one of the '{}' commands in '{}'", command, group),
                "'map_planet' and 'map-planet' name the same command".into(),
            ],
            Self::MalformedRegion { region, .. } => vec![
                format!(
                    "Make sure the file has exactly one '# [AUTO-GENERATED START: {0}]' line followed by one '# [AUTO-GENERATED END: {0}]' line",
                    region
                ),
                "Or delete both markers to let the synchronizer re-insert the region".into(),
            ],
            Self::UnreadableRegion { .. } => {
                vec!["The region will be regenerated from the registry on the next run".into()]
            }
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidRegistry(_)
            | Self::InvalidName { .. }
            | Self::DuplicateGroup { .. }
            | Self::DuplicateCommand { .. } => ErrorCategory::Validation,
            Self::MalformedRegion { .. } | Self::UnreadableRegion { .. } => {
                ErrorCategory::Internal
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Internal,
}
