//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "synchronize the project" or "fix one import".

pub mod artifact_service;
pub mod fix_service;
pub mod scaffold_service;
pub mod sync_service;

pub use artifact_service::{ArtifactChange, ArtifactService, RegionOutcome};
pub use fix_service::{FixOutcome, FixService};
pub use scaffold_service::{ScaffoldReport, ScaffoldService, StaleEntry, StaleKind};
pub use sync_service::{SyncMode, SyncService, SyncStage, SyncSummary};

use crate::{application::ApplicationError, error::ShipwrightError};

/// The adapter-level reason of a filesystem failure, without the wrapping
/// path that the caller's own error variant already carries.
pub(crate) fn underlying_reason(err: &ShipwrightError) -> String {
    match err {
        ShipwrightError::Application(ApplicationError::FilesystemError { reason, .. }) => {
            reason.clone()
        }
        other => other.to_string(),
    }
}
