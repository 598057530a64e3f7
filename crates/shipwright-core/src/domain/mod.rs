// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Shipwright.
//!
//! Pure logic over an immutable registry snapshot: validation of names,
//! alias resolution, conflict detection and the rendering of generated
//! region bodies. Every I/O concern goes through the ports defined in the
//! application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable entities**: All domain objects are Clone + PartialEq
//! - **Pure stages**: resolution and detection are plain functions of their inputs

pub mod artifacts;
pub mod conflicts;
pub mod entities;
pub mod error;
pub mod resolution;
pub mod value_objects;

pub use entities::{
    AliasBinding, AliasSourceSet, CommandGroup, CommandSpec, Conflict, ConflictKind,
    ConflictReport, GeneratedRegion, OptionSpec, PackageFile, ProjectLayout, RegionSpec,
    Registry, ScaffoldedPackage, Splice,
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{Alias, CommandName, GroupId, SourceKind, TargetRef};

pub use conflicts::detect_conflicts;
pub use resolution::resolve_aliases;
