//! Layout computation and dispatch
//!
//! Layout kind is a closed variant set dispatched through a single
//! compute contract: the three static algorithms produce a full target
//! position set in one shot (animated into place by the caller), while
//! the two iterative algorithms run as background simulations stepping
//! the store directly.

pub mod simulation;

use crate::algo;
use crate::graph::{GraphStore, NodeId};
use notegraph_algorithms::{circle_pack, circular, random, CirclePackSettings};
use serde::{Deserialize, Serialize};

pub use simulation::SimulationHandle;

/// The available layout algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    Random,
    Circular,
    CirclePack,
    ForceDirected,
    Noverlap,
}

impl LayoutKind {
    /// Whether this layout runs as a background simulation
    pub fn is_iterative(&self) -> bool {
        matches!(self, LayoutKind::ForceDirected | LayoutKind::Noverlap)
    }

    /// Scale used when a request does not carry one, matching the
    /// interactive slider defaults.
    pub fn default_scale(&self) -> f64 {
        match self {
            LayoutKind::Random => 1000.0,
            LayoutKind::Circular => 500.0,
            _ => 1.0,
        }
    }
}

/// A one-shot layout request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutRequest {
    pub kind: LayoutKind,
    /// Positive multiplier; the kind's default when absent
    pub scale: Option<f64>,
    /// Seed for the random layout; entropy-seeded when absent
    pub seed: Option<u64>,
}

impl LayoutRequest {
    pub fn new(kind: LayoutKind) -> Self {
        Self {
            kind,
            scale: None,
            seed: None,
        }
    }

    pub fn with_scale(kind: LayoutKind, scale: f64) -> Self {
        Self {
            kind,
            scale: Some(scale),
            seed: None,
        }
    }

    pub fn effective_scale(&self) -> f64 {
        self.scale.unwrap_or_else(|| self.kind.default_scale())
    }
}

/// Compute target positions for a static layout request.
///
/// Returns `None` for iterative kinds, which have no one-shot result.
pub fn compute_static(
    store: &GraphStore,
    request: &LayoutRequest,
) -> Option<Vec<(NodeId, (f64, f64))>> {
    let n = store.node_count();
    let scale = request.effective_scale();

    let positions = match request.kind {
        LayoutKind::Random => random(n, scale, request.seed),
        LayoutKind::Circular => circular(n, scale),
        LayoutKind::CirclePack => {
            let groups = algo::node_communities(store);
            let radii = algo::node_sizes(store);
            circle_pack(
                &groups,
                &radii,
                &CirclePackSettings {
                    scale,
                    ..Default::default()
                },
            )
        }
        LayoutKind::ForceDirected | LayoutKind::Noverlap => return None,
    };

    Some(
        positions
            .into_iter()
            .enumerate()
            .map(|(index, pos)| (NodeId::new(index as u32), pos))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeFlags;

    fn small_store() -> GraphStore {
        let mut store = GraphStore::new();
        for key in ["a", "b", "c", "d"] {
            store.add_node(key, key, NodeFlags::default()).unwrap();
        }
        store
    }

    #[test]
    fn test_kind_classification() {
        assert!(!LayoutKind::Random.is_iterative());
        assert!(!LayoutKind::Circular.is_iterative());
        assert!(!LayoutKind::CirclePack.is_iterative());
        assert!(LayoutKind::ForceDirected.is_iterative());
        assert!(LayoutKind::Noverlap.is_iterative());
    }

    #[test]
    fn test_circular_request() {
        let store = small_store();
        let request = LayoutRequest::with_scale(LayoutKind::Circular, 100.0);
        let positions = compute_static(&store, &request).unwrap();

        assert_eq!(positions.len(), 4);
        for &(_, (x, y)) in &positions {
            assert!(((x * x + y * y).sqrt() - 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_default_scales() {
        assert_eq!(LayoutRequest::new(LayoutKind::Random).effective_scale(), 1000.0);
        assert_eq!(LayoutRequest::new(LayoutKind::Circular).effective_scale(), 500.0);
        assert_eq!(LayoutRequest::new(LayoutKind::CirclePack).effective_scale(), 1.0);
    }

    #[test]
    fn test_iterative_kinds_have_no_static_result() {
        let store = small_store();
        assert!(compute_static(&store, &LayoutRequest::new(LayoutKind::ForceDirected)).is_none());
        assert!(compute_static(&store, &LayoutRequest::new(LayoutKind::Noverlap)).is_none());
    }

    #[test]
    fn test_circlepack_groups_members_by_community() {
        let mut store = small_store();
        let ids: Vec<NodeId> = store.nodes().map(|n| n.id).collect();
        store.set_community(ids[0], 0);
        store.set_community(ids[1], 0);
        store.set_community(ids[2], 1);
        store.set_community(ids[3], 1);

        let positions =
            compute_static(&store, &LayoutRequest::new(LayoutKind::CirclePack)).unwrap();
        let pos: Vec<(f64, f64)> = positions.iter().map(|&(_, p)| p).collect();

        let d = |a: (f64, f64), b: (f64, f64)| ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt();
        let intra = d(pos[0], pos[1]).max(d(pos[2], pos[3]));
        let inter = d(pos[0], pos[2])
            .min(d(pos[0], pos[3]))
            .min(d(pos[1], pos[2]))
            .min(d(pos[1], pos[3]));
        assert!(intra < inter);
    }
}
