//! Notegraph
//!
//! A graph analytics and layout engine for collections of interlinked
//! documents. The engine builds an attributed undirected graph from a
//! document snapshot, clusters it with hierarchical Louvain community
//! detection, colors communities, computes static and physics-based
//! layouts and animates between them, while tracking hover/search
//! highlight state for an external renderer.
//!
//! # Architecture
//!
//! - `graph` - the attributed store, the single source of truth every
//!   other component reads and mutates
//! - `algo` - adapter over the `notegraph-algorithms` crate (Louvain,
//!   HITS) plus the panel reports
//! - `palette` - distinct community colors
//! - `layout` - static placements and background simulations
//! - `animate` - single-active animated transitions
//! - `interact` - hover/search highlight state machine
//! - `exchange` - JSON graph exchange format
//! - `engine` - the control surface tying the pipeline together
//!
//! Rendering, UI widgets and document enumeration stay outside; the
//! engine exchanges snapshots, events and attribute reads with them.
//!
//! ## Example Usage
//!
//! ```rust
//! use notegraph::graph::{GraphStore, NodeFlags};
//! use notegraph::algo;
//!
//! // Build a graph store
//! let mut store = GraphStore::new();
//! let a = store.add_node("a.md", "a", NodeFlags::default()).unwrap();
//! let b = store.add_node("b.md", "b", NodeFlags::default()).unwrap();
//! let c = store.add_node("c.md", "c", NodeFlags::default()).unwrap();
//! store.add_edge(a, b, 1.0).unwrap();
//! store.add_edge(b, c, 1.0).unwrap();
//!
//! // Detect communities and write them onto the nodes
//! let result = algo::detect_communities(&store, 1.0);
//! algo::apply_communities(&mut store, &result);
//! assert!(store.nodes().all(|node| node.community.is_some()));
//! ```

pub mod algo;
pub mod animate;
pub mod engine;
pub mod exchange;
pub mod graph;
pub mod interact;
pub mod layout;
pub mod palette;

// Re-export the control surface
pub use engine::config::EngineConfig;
pub use engine::event::{EngineEvent, StopReason};
pub use engine::snapshot::DocumentRecord;
pub use engine::{Engine, EngineError, EngineResult};
pub use graph::{GraphError, GraphResult, GraphStore};
pub use layout::{LayoutKind, LayoutRequest};

/// Crate version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
