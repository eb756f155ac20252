//! Retest Core — call-graph normalization, ancestor closure, and test selection

pub mod error;
pub mod model;
pub mod descriptor;
pub mod graph;
pub mod closure;
pub mod selection;


#[cfg(test)]
pub mod test_utils;

pub use error::{Result, RetestError};
pub use model::{ChangeSet, Edge, Granularity, Loader, MethodRef, Node, TestUniverse};
pub use descriptor::{CallEdge, Frame, NormalizeStats, Normalized, normalize, parse_descriptor, parse_frame};
pub use graph::{CallGraph, GraphBuilder, Graphs, PlatformFilter, DEFAULT_PLATFORM_PREFIXES};
pub use closure::{Closure, compute_closure};
pub use selection::{ClassMatch, Selection, TestSelector};
