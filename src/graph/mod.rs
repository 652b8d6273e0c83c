//! Attributed graph model
//!
//! Implements the mutable undirected graph the rest of the engine reads
//! and writes: arena storage with dense ids, insertion-order traversal,
//! typed topology errors and per-attribute setters.

pub mod edge;
pub mod node;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::{Edge, DEFAULT_EDGE_COLOR};
pub use node::{Node, NodeFlags};
pub use store::{BoundingBox, GraphError, GraphResult, GraphStore};
pub use types::{EdgeId, NodeId};
