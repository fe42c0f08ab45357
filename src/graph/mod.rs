//! The dependency graph and the passes that annotate it.
//!
//! - [`dependency`]: base graph built from `go.mod` alone.
//! - [`enhanced`]: merges `go.sum` into the base graph and carries the
//!   per-node annotations.
//! - [`conflicts`]: multiple resolved versions of one module.
//! - [`stats`]: summary counts handed to the renderers.
//! - [`analysis`]: runs a chosen set of passes exactly once.

pub mod analysis;
pub mod conflicts;
pub mod dependency;
pub mod enhanced;
pub mod stats;

pub use dependency::{DependencyGraph, Node};
pub use enhanced::{EnhancedDependencyGraph, EnhancedNode};
