//! Infrastructure adapters for Shipwright.
//!
//! This crate implements the ports defined in `shipwright-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod registry_loader;
pub mod reserved;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use registry_loader::YamlRegistryLoader;
pub use reserved::ReservedListFile;
