//! Graph exchange format
//!
//! Self-contained JSON document enumerating nodes (key, label, size,
//! position, color) and edges (endpoint keys, weight, color), enough to
//! reconstruct the same topology and attributes. Produced on demand,
//! never streamed.

use crate::graph::{GraphError, GraphResult, GraphStore, NodeFlags};
use serde::{Deserialize, Serialize};

/// Format version written into every document
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub label: String,
    pub size: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A serialized graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    pub version: u32,
    /// Unix milliseconds at export time
    pub generated_at: i64,
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl GraphDocument {
    /// Snapshot the store into a document, in traversal order.
    pub fn from_store(store: &GraphStore) -> Self {
        let nodes = store
            .nodes()
            .map(|node| NodeRecord {
                id: node.key.clone(),
                label: node.label.clone(),
                size: node.size,
                x: node.x,
                y: node.y,
                color: node.color.clone(),
            })
            .collect();

        let edges = store
            .edges()
            .map(|edge| EdgeRecord {
                source: store
                    .node(edge.source)
                    .map(|n| n.key.clone())
                    .unwrap_or_default(),
                target: store
                    .node(edge.target)
                    .map(|n| n.key.clone())
                    .unwrap_or_default(),
                weight: edge.weight,
                color: edge.color.clone(),
            })
            .collect();

        GraphDocument {
            version: FORMAT_VERSION,
            generated_at: chrono::Utc::now().timestamp_millis(),
            nodes,
            edges,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Rebuild a store with the document's topology and attributes.
    pub fn into_store(self) -> GraphResult<GraphStore> {
        let mut store = GraphStore::with_capacity(self.nodes.len());
        for record in self.nodes {
            let id = store.add_node(record.id, record.label, NodeFlags::default())?;
            if let (Some(x), Some(y)) = (record.x, record.y) {
                store.set_position(id, x, y);
            }
            if let Some(color) = record.color {
                store.set_color(id, color);
            }
            if let Some(node) = store.node_mut(id) {
                node.size = record.size;
            }
        }

        for record in self.edges {
            let source = store
                .node_id(&record.source)
                .ok_or_else(|| GraphError::MissingEndpoint(record.source.clone()))?;
            let target = store
                .node_id(&record.target)
                .ok_or_else(|| GraphError::MissingEndpoint(record.target.clone()))?;
            if let Some(edge_id) = store.add_edge(source, target, record.weight)? {
                if let Some(color) = record.color {
                    store.set_edge_color(edge_id, color);
                }
            }
        }

        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> GraphStore {
        let mut store = GraphStore::new();
        for (key, label) in [("a.md", "a"), ("b.md", "b"), ("c.md", "c")] {
            store.add_node(key, label, NodeFlags::default()).unwrap();
        }
        let a = store.node_id("a.md").unwrap();
        let b = store.node_id("b.md").unwrap();
        let c = store.node_id("c.md").unwrap();
        store.add_edge(a, b, 1.0).unwrap();
        store.add_edge(b, c, 2.5).unwrap();

        store.set_position(a, 1.0, -2.0);
        store.set_position(b, 0.5, 3.25);
        store.set_position(c, -4.0, 0.0);
        store.set_color(a, "#aa0011");
        store.set_color(b, "#00bb22");
        store.set_color(c, "#0033cc");
        store.update_size(b, |s| s + 1.0);
        store
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let store = sample_store();
        let json = GraphDocument::from_store(&store).to_json().unwrap();
        let rebuilt = GraphDocument::from_json(&json).unwrap().into_store().unwrap();

        assert_eq!(rebuilt.node_count(), 3);
        assert_eq!(rebuilt.edge_count(), 2);

        for node in store.nodes() {
            let copy = rebuilt.node(rebuilt.node_id(&node.key).unwrap()).unwrap();
            assert_eq!(copy.label, node.label);
            assert_eq!(copy.size, node.size);
            assert_eq!(copy.x, node.x);
            assert_eq!(copy.y, node.y);
            assert_eq!(copy.color, node.color);
        }

        for (original, copy) in store.edges().zip(rebuilt.edges()) {
            assert_eq!(original.weight, copy.weight);
            assert_eq!(original.color, copy.color);
            let source_key = &store.node(original.source).unwrap().key;
            let copy_source_key = &rebuilt.node(copy.source).unwrap().key;
            assert_eq!(source_key, copy_source_key);
        }
    }

    #[test]
    fn test_unplaced_nodes_omit_coordinates() {
        let mut store = GraphStore::new();
        store.add_node("a", "a", NodeFlags::default()).unwrap();
        let json = GraphDocument::from_store(&store).to_json().unwrap();

        assert!(!json.contains("\"x\""));
        let rebuilt = GraphDocument::from_json(&json).unwrap().into_store().unwrap();
        assert!(rebuilt.node(rebuilt.node_id("a").unwrap()).unwrap().x.is_none());
    }

    #[test]
    fn test_document_version_stamped() {
        let doc = GraphDocument::from_store(&sample_store());
        assert_eq!(doc.version, FORMAT_VERSION);
        assert!(doc.generated_at > 0);
    }
}
