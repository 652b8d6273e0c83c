//! Edge record for the attributed graph

use super::types::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// Default edge color: fully transparent until a theme paints it
pub const DEFAULT_EDGE_COLOR: &str = "#00000000";

/// An undirected edge in the attributed graph
///
/// Endpoints are stored in normalized order (lower id first); (a, b) and
/// (b, a) denote the same edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    /// Dense identifier within the owning store
    pub id: EdgeId,

    /// Endpoint with the lower node id
    pub source: NodeId,

    /// Endpoint with the higher node id
    pub target: NodeId,

    /// Non-negative weight, defaults to 1
    pub weight: f64,

    /// Hex color
    pub color: Option<String>,

    /// Interaction highlight
    pub highlighted: bool,
}

impl Edge {
    /// Create a new edge; endpoints are normalized so the lower id comes
    /// first.
    pub fn new(id: EdgeId, a: NodeId, b: NodeId, weight: f64) -> Self {
        let (source, target) = if a <= b { (a, b) } else { (b, a) };
        Edge {
            id,
            source,
            target,
            weight,
            color: Some(DEFAULT_EDGE_COLOR.to_string()),
            highlighted: false,
        }
    }

    /// The opposite endpoint, if `id` is one of the two
    pub fn other(&self, id: NodeId) -> Option<NodeId> {
        if id == self.source {
            Some(self.target)
        } else if id == self.target {
            Some(self.source)
        } else {
            None
        }
    }
}
