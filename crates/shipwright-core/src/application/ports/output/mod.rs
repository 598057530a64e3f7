//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `shipwright-adapters` crate provides implementations.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::domain::Registry;
use crate::error::ShipwrightResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `shipwright_adapters::filesystem::LocalFilesystem` (production)
/// - `shipwright_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - Text only; every artifact the synchronizer touches is UTF-8
/// - A missing file is `Ok(None)`, not an error
/// - `create_dir_all` is safe to repeat
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ShipwrightResult<()>;

    /// Write content to a file, replacing it.
    fn write_file(&self, path: &Path, content: &str) -> ShipwrightResult<()>;

    /// Read a file, `None` if it does not exist.
    fn read_file(&self, path: &Path) -> ShipwrightResult<Option<String>>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Immediate sub-directories of `path`, sorted. Empty if `path` is missing.
    fn list_dirs(&self, path: &Path) -> ShipwrightResult<Vec<PathBuf>>;
}

/// Port for the declarative registry document.
///
/// Implemented by `shipwright_adapters::registry_loader::YamlRegistryLoader`.
pub trait RegistrySource {
    /// Parse the document into a validated registry. Pure: no side effects.
    fn load(&self) -> ShipwrightResult<Registry>;

    /// Human-readable origin, used in logs and error messages.
    fn location(&self) -> String;
}

/// Port for the reserved-alias list.
pub trait ReservedAliasSource {
    fn load(&self) -> ShipwrightResult<BTreeSet<String>>;
}
