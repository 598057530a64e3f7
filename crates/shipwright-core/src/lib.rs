//! Shipwright Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Shipwright
//! registry synchronizer, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          shipwright-cli (CLI)           │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (SyncService, FixService, Scaffold,   │
//! │    Artifact) - orchestrate the run      │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, RegistrySource, Reserved)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   shipwright-adapters (Infrastructure)  │
//! │ (LocalFilesystem, YamlRegistryLoader..) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Registry, resolution, conflicts,       │
//! │  generated regions)                     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use shipwright_core::prelude::*;
//!
//! # fn run(registry: Box<dyn RegistrySource>, reserved: Box<dyn ReservedAliasSource>,
//! #        fs: Box<dyn Filesystem>) -> ShipwrightResult<()> {
//! let layout = ProjectLayout::conventional(std::path::Path::new("."), "starship");
//! let service = SyncService::new(registry, reserved, fs, layout);
//! let summary = service.run(SyncMode::Apply)?;
//! println!("{} aliases", summary.alias_count);
//! # Ok(())
//! # }
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        FixOutcome, FixService, SyncMode, SyncService, SyncSummary,
        ports::{Filesystem, RegistrySource, ReservedAliasSource},
    };
    pub use crate::domain::{
        CommandGroup, CommandSpec, ConflictReport, OptionSpec, ProjectLayout, Registry,
    };
    pub use crate::error::{ShipwrightError, ShipwrightResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
