pub mod alias;
pub mod conflict;
pub mod layout;
pub mod package;
pub mod region;
pub mod registry;

pub use crate::domain::DomainError;
pub use alias::{AliasBinding, AliasSourceSet};
pub use conflict::{Conflict, ConflictKind, ConflictReport};
pub use layout::ProjectLayout;
pub use package::{PackageFile, ScaffoldedPackage};
pub use region::{Anchor, GeneratedRegion, RegionSpec, Splice};
pub use registry::{CommandGroup, CommandSpec, OptionSpec, Registry};
