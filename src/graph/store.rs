//! In-memory attributed graph storage
//!
//! Arena-backed undirected graph: dense node/edge vectors plus adjacency
//! lists of indices, so traversal order is the insertion order and
//! community aggregation never chases pointers. One store instance is the
//! single source of truth for a view; pipeline stages mutate only the
//! attribute class they own and the whole store is replaced on rebuild.

use super::edge::Edge;
use super::node::{Node, NodeFlags};
use super::types::{EdgeId, NodeId};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during graph mutation
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    #[error("node {0:?} already exists")]
    DuplicateNode(String),

    #[error("edge endpoint {0} does not exist")]
    MissingEndpoint(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Axis-aligned bounds of all positioned nodes, for camera framing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// In-memory attributed undirected graph
#[derive(Debug, Default)]
pub struct GraphStore {
    /// Node arena, insertion order
    nodes: Vec<Node>,

    /// Edge arena, insertion order
    edges: Vec<Edge>,

    /// Adjacency per node: (neighbor, connecting edge)
    adjacency: Vec<Vec<(NodeId, EdgeId)>>,

    /// Key lookup preserving insertion order
    key_index: IndexMap<String, NodeId>,

    /// Normalized unordered pair -> edge, for duplicate detection.
    /// Hot during build; FxHashMap beats SipHash on these small keys.
    pair_index: FxHashMap<(NodeId, NodeId), EdgeId>,
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with preallocated node capacity
    pub fn with_capacity(nodes: usize) -> Self {
        GraphStore {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(nodes * 2),
            adjacency: Vec::with_capacity(nodes),
            key_index: IndexMap::with_capacity(nodes),
            pair_index: FxHashMap::default(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Insert a node. Fails if the key is already present.
    pub fn add_node(
        &mut self,
        key: impl Into<String>,
        label: impl Into<String>,
        flags: NodeFlags,
    ) -> GraphResult<NodeId> {
        let key = key.into();
        if self.key_index.contains_key(&key) {
            return Err(GraphError::DuplicateNode(key));
        }

        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(Node::with_flags(id, key.clone(), label, flags));
        self.adjacency.push(Vec::new());
        self.key_index.insert(key, id);
        Ok(id)
    }

    /// Insert an undirected edge between existing nodes.
    ///
    /// Both endpoints must exist. Self-loops and duplicates of an
    /// existing unordered pair are skipped and reported as `Ok(None)`.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, weight: f64) -> GraphResult<Option<EdgeId>> {
        if a.index() >= self.nodes.len() {
            return Err(GraphError::MissingEndpoint(a.to_string()));
        }
        if b.index() >= self.nodes.len() {
            return Err(GraphError::MissingEndpoint(b.to_string()));
        }
        if a == b {
            debug!(node = %a, "skipping self-loop");
            return Ok(None);
        }

        let pair = if a <= b { (a, b) } else { (b, a) };
        if self.pair_index.contains_key(&pair) {
            debug!(source = %pair.0, target = %pair.1, "edge already exists");
            return Ok(None);
        }

        let id = EdgeId::new(self.edges.len() as u32);
        self.edges.push(Edge::new(id, a, b, weight));
        self.adjacency[a.index()].push((b, id));
        self.adjacency[b.index()].push((a, id));
        self.pair_index.insert(pair, id);
        Ok(Some(id))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    /// Look up a node id by its key
    pub fn node_id(&self, key: &str) -> Option<NodeId> {
        self.key_index.get(key).copied()
    }

    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.edge_between(a, b).is_some()
    }

    /// The edge connecting two nodes, in either orientation
    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<EdgeId> {
        let pair = if a <= b { (a, b) } else { (b, a) };
        self.pair_index.get(&pair).copied()
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Neighbors of a node in edge-insertion order
    pub fn neighbors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency
            .get(id.index())
            .into_iter()
            .flatten()
            .map(|&(neighbor, _)| neighbor)
    }

    /// Edges incident to a node in insertion order
    pub fn incident_edges(&self, id: NodeId) -> impl Iterator<Item = &Edge> {
        self.adjacency
            .get(id.index())
            .into_iter()
            .flatten()
            .map(move |&(_, edge)| &self.edges[edge.index()])
    }

    /// Apply a transformation to a node's size
    pub fn update_size(&mut self, id: NodeId, f: impl FnOnce(f64) -> f64) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.size = f(node.size);
        }
    }

    pub fn set_position(&mut self, id: NodeId, x: f64, y: f64) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.x = Some(x);
            node.y = Some(y);
        }
    }

    pub fn set_community(&mut self, id: NodeId, community: usize) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.community = Some(community);
        }
    }

    pub fn set_color(&mut self, id: NodeId, color: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.color = Some(color.into());
        }
    }

    pub fn set_highlighted(&mut self, id: NodeId, highlighted: bool) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.highlighted = highlighted;
        }
    }

    pub fn set_edge_highlighted(&mut self, id: EdgeId, highlighted: bool) {
        if let Some(edge) = self.edges.get_mut(id.index()) {
            edge.highlighted = highlighted;
        }
    }

    pub fn set_edge_color(&mut self, id: EdgeId, color: impl Into<String>) {
        if let Some(edge) = self.edges.get_mut(id.index()) {
            edge.color = Some(color.into());
        }
    }

    /// Positions of all placed nodes, in insertion order
    pub fn positions(&self) -> Vec<(NodeId, (f64, f64))> {
        self.nodes
            .iter()
            .filter_map(|node| node.position().map(|pos| (node.id, pos)))
            .collect()
    }

    /// Bounds of all placed nodes; `None` until a layout has run
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut bounds: Option<BoundingBox> = None;
        for node in &self.nodes {
            if let Some((x, y)) = node.position() {
                let entry = bounds.get_or_insert(BoundingBox {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                });
                entry.min_x = entry.min_x.min(x);
                entry.min_y = entry.min_y.min(y);
                entry.max_x = entry.max_x.max(x);
                entry.max_y = entry.max_y.max(y);
            }
        }
        bounds
    }
}
