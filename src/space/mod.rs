//! Search-space model: parameter domains, the recording scope, and built
//! space instances.

mod builder;
mod graph;
mod param;

pub use builder::{build_space, SpaceBuilder, SpaceFn};
pub use graph::{OpId, ParamId, SearchSpace};
pub use param::{ParamDomain, ParamKind, ParamValue};
