pub mod depends;
pub mod package;
pub mod registry;

pub use depends::{DependencyGroup, DependencyGroups, DependencyTextParser, InvalidDependencyName};
pub use package::{InstallationState, NodeClass, PackageRecord};
pub use registry::{Lookup, PackageRegistry, Reservation};
