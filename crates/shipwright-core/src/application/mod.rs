//! Application layer for Shipwright.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (SyncService, FixService and the
//!   scaffold/artifact stages it drives)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    ArtifactChange, ArtifactService, FixOutcome, FixService, RegionOutcome, ScaffoldReport,
    ScaffoldService, StaleEntry, StaleKind, SyncMode, SyncService, SyncStage, SyncSummary,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, RegistrySource, ReservedAliasSource};

pub use error::ApplicationError;
