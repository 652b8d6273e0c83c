//! Algorithm integration layer
//!
//! Algorithms are implemented in the `notegraph-algorithms` crate over a
//! dense index view. This module projects the attributed store into that
//! view, writes results back onto node attributes, and assembles the
//! read-only reports the side panel consumes.

use crate::graph::{GraphStore, NodeId};
use notegraph_algorithms::{hits, louvain, GraphView, HitsConfig, LouvainConfig, LouvainResult};
use serde::Serialize;
use std::collections::HashMap;

// Node ids are dense arena indices, so the projection is a plain copy of
// the edge list; index i in the view is NodeId(i) in the store.
pub fn build_view(store: &GraphStore) -> GraphView {
    let mut view = GraphView::new(store.node_count());
    for edge in store.edges() {
        view.add_edge(edge.source.index(), edge.target.index(), edge.weight);
    }
    view
}

/// Node sizes in index order, for layouts that need radii
pub fn node_sizes(store: &GraphStore) -> Vec<f64> {
    store.nodes().map(|node| node.size).collect()
}

/// Community assignment in index order; nodes without one get community 0
pub fn node_communities(store: &GraphStore) -> Vec<usize> {
    store
        .nodes()
        .map(|node| node.community.unwrap_or(0))
        .collect()
}

/// Run community detection over the store's current topology.
pub fn detect_communities(store: &GraphStore, resolution: f64) -> LouvainResult {
    let view = build_view(store);
    let config = LouvainConfig {
        resolution,
        ..Default::default()
    };
    louvain(&view, &config)
}

/// Write a detection result onto the node community attributes.
pub fn apply_communities(store: &mut GraphStore, result: &LouvainResult) {
    for (index, &community) in result.communities.iter().enumerate() {
        store.set_community(NodeId::new(index as u32), community);
    }
}

/// Read-only community detection snapshot for the details panel.
///
/// Refreshed once per rebuild or re-detection, not live.
#[derive(Debug, Clone, Serialize)]
pub struct CommunityReport {
    /// Node key -> community id
    pub assignments: HashMap<String, usize>,
    pub community_count: usize,
    pub modularity: f64,
    /// Total accepted moves across all optimization levels
    pub move_count: usize,
    /// Accepted moves per hierarchy level
    pub moves_per_level: Vec<usize>,
    /// Total modularity-delta evaluations
    pub delta_computations: u64,
    /// Node key -> times the local-moving loop evaluated it
    pub visits_per_node: HashMap<String, u64>,
    pub level_count: usize,
    pub resolution: f64,
}

pub fn build_report(store: &GraphStore, result: &LouvainResult) -> CommunityReport {
    let mut assignments = HashMap::with_capacity(store.node_count());
    let mut visits_per_node = HashMap::with_capacity(store.node_count());
    for node in store.nodes() {
        let index = node.id.index();
        assignments.insert(node.key.clone(), result.communities[index]);
        visits_per_node.insert(node.key.clone(), result.visits[index]);
    }

    CommunityReport {
        assignments,
        community_count: result.community_count,
        modularity: result.modularity,
        move_count: result.move_count(),
        moves_per_level: result.moves_per_level.clone(),
        delta_computations: result.delta_computations,
        visits_per_node,
        level_count: result.level_count,
        resolution: result.resolution,
    }
}

/// Top hub and authority nodes by HITS score
#[derive(Debug, Clone, Serialize)]
pub struct CentralityReport {
    pub hubs: Vec<(String, f64)>,
    pub authorities: Vec<(String, f64)>,
    pub iterations: usize,
}

pub fn centrality_report(store: &GraphStore, top_k: usize) -> CentralityReport {
    let view = build_view(store);
    let result = hits(&view, &HitsConfig::default());

    let ranked = |scores: &[f64]| -> Vec<(String, f64)> {
        let mut entries: Vec<(String, f64)> = store
            .nodes()
            .map(|node| (node.key.clone(), scores[node.id.index()]))
            .collect();
        entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        entries.truncate(top_k);
        entries
    };

    CentralityReport {
        hubs: ranked(&result.hubs),
        authorities: ranked(&result.authorities),
        iterations: result.iterations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeFlags;

    fn diamond() -> GraphStore {
        let mut store = GraphStore::new();
        for key in ["a", "b", "c", "d"] {
            store.add_node(key, key, NodeFlags::default()).unwrap();
        }
        let ids: Vec<NodeId> = store.nodes().map(|n| n.id).collect();
        store.add_edge(ids[0], ids[1], 1.0).unwrap();
        store.add_edge(ids[1], ids[2], 1.0).unwrap();
        store.add_edge(ids[2], ids[3], 1.0).unwrap();
        store.add_edge(ids[3], ids[0], 1.0).unwrap();
        store
    }

    #[test]
    fn test_view_projection() {
        let store = diamond();
        let view = build_view(&store);
        assert_eq!(view.node_count, 4);
        assert_eq!(view.total_weight, 4.0);
        assert_eq!(view.degree(0), 2);
    }

    #[test]
    fn test_detection_covers_every_node() {
        let mut store = diamond();
        let result = detect_communities(&store, 1.0);
        apply_communities(&mut store, &result);

        let mut sizes = vec![0usize; result.community_count];
        for node in store.nodes() {
            sizes[node.community.unwrap()] += 1;
        }
        assert_eq!(sizes.iter().sum::<usize>(), 4);
    }

    #[test]
    fn test_report_keys_by_node() {
        let store = diamond();
        let result = detect_communities(&store, 1.0);
        let report = build_report(&store, &result);

        assert_eq!(report.assignments.len(), 4);
        assert_eq!(report.visits_per_node.len(), 4);
        assert_eq!(report.resolution, 1.0);
        assert!(report.modularity >= -1.0 && report.modularity <= 1.0);
    }

    #[test]
    fn test_centrality_top_k() {
        // Star: the center is the strongest hub and authority
        let mut store = GraphStore::new();
        for key in ["hub", "a", "b", "c"] {
            store.add_node(key, key, NodeFlags::default()).unwrap();
        }
        let hub = store.node_id("hub").unwrap();
        for key in ["a", "b", "c"] {
            let leaf = store.node_id(key).unwrap();
            store.add_edge(hub, leaf, 1.0).unwrap();
        }

        let report = centrality_report(&store, 2);
        assert_eq!(report.hubs.len(), 2);
        assert_eq!(report.hubs[0].0, "hub");
        assert_eq!(report.authorities[0].0, "hub");
    }
}
