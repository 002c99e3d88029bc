//! Domain layer: the employee hierarchy and its restructuring rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod error;
mod lookup;
pub mod restructure;
pub mod succession;
pub mod tree_traits;

pub use arena::{OrgNode, OrgTree, TreeIterator};
pub use builder::RosterBuilder;
pub use entities::*;
pub use error::{DomainError, TreeResult};
pub use restructure::{Demotion, Firing, Promotion};
pub use succession::{FirstInLine, RandomSuccession, SuccessionPolicy, SuccessorPicker};
pub use tree_traits::OrgTreeConvert;
