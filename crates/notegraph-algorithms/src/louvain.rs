//! Louvain community detection
//!
//! Hierarchical modularity optimization in two repeated phases: a
//! local-moving phase that greedily relocates nodes between neighboring
//! communities, and an aggregation phase that contracts each community
//! into a supernode and recurses on the coarser graph.
//!
//! The optimizer is fully deterministic: nodes are processed in ascending
//! index order, candidate communities are evaluated in ascending community
//! id, and a move is accepted only for a strictly larger gain, so the
//! lowest community id wins ties.

use super::common::GraphView;
use std::collections::BTreeMap;

/// Louvain configuration
#[derive(Debug, Clone)]
pub struct LouvainConfig {
    /// Resolution parameter scaling the null-model term. Values above 1
    /// penalize merging and yield more, smaller communities.
    pub resolution: f64,
    /// Cap on aggregation levels
    pub max_levels: usize,
    /// Cap on local-moving passes per level
    pub max_passes: usize,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            max_levels: 32,
            max_passes: 100,
        }
    }
}

/// Result of community detection, including optimizer diagnostics
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LouvainResult {
    /// Community id per node index, renumbered dense in node order
    pub communities: Vec<usize>,
    /// Number of distinct communities
    pub community_count: usize,
    /// Modularity of the final partition, in [-1, 1]
    pub modularity: f64,
    /// Accepted moves per hierarchy level
    pub moves_per_level: Vec<usize>,
    /// Total modularity-delta evaluations across all levels
    pub delta_computations: u64,
    /// Times each top-level node was evaluated by the local-moving loop
    pub visits: Vec<u64>,
    /// Number of hierarchy levels that produced at least one move (min 1)
    pub level_count: usize,
    /// Resolution the partition was computed with
    pub resolution: f64,
}

impl LouvainResult {
    /// Total accepted moves across all levels
    pub fn move_count(&self) -> usize {
        self.moves_per_level.iter().sum()
    }

    fn trivial(node_count: usize, resolution: f64) -> Self {
        Self {
            communities: (0..node_count).collect(),
            community_count: node_count,
            modularity: 0.0,
            moves_per_level: Vec::new(),
            delta_computations: 0,
            visits: vec![0; node_count],
            level_count: 1,
            resolution,
        }
    }
}

/// One level of the aggregation hierarchy.
///
/// Self-loop weights are kept separately and follow the doubled
/// convention: a contracted community with intra-weight w carries a
/// self-loop of weight 2w, so weighted degrees stay consistent across
/// levels.
struct LevelGraph {
    neighbors: Vec<Vec<(usize, f64)>>,
    self_loops: Vec<f64>,
}

impl LevelGraph {
    fn from_view(view: &GraphView) -> Self {
        Self {
            neighbors: view.neighbors.clone(),
            self_loops: vec![0.0; view.node_count],
        }
    }

    fn node_count(&self) -> usize {
        self.neighbors.len()
    }

    fn strength(&self, idx: usize) -> f64 {
        self.self_loops[idx] + self.neighbors[idx].iter().map(|(_, w)| w).sum::<f64>()
    }
}

/// Run community detection over the view.
pub fn louvain(view: &GraphView, config: &LouvainConfig) -> LouvainResult {
    let n = view.node_count;
    let resolution = config.resolution;

    // Degenerate graphs: a single community per connected node
    if n < 2 || view.total_weight <= 0.0 {
        return LouvainResult::trivial(n, resolution);
    }

    let m = view.total_weight;
    let mut delta_computations = 0u64;
    let mut visits = vec![0u64; n];
    let mut moves_per_level = Vec::new();

    // Maps each original node to its supernode at the current level
    let mut assignment: Vec<usize> = (0..n).collect();
    let mut level = LevelGraph::from_view(view);
    let mut level_count = 0usize;

    loop {
        let top_level = level_count == 0;
        let (mut community, moves) = local_moving(
            &level,
            resolution,
            m,
            config.max_passes,
            &mut delta_computations,
            |node| {
                if top_level {
                    visits[node] += 1;
                }
            },
        );

        if moves == 0 {
            break;
        }

        let count = renumber(&mut community);
        level_count += 1;
        moves_per_level.push(moves);

        for slot in assignment.iter_mut() {
            *slot = community[*slot];
        }

        if count == level.node_count() || level_count >= config.max_levels {
            break;
        }
        level = aggregate(&level, &community, count);
    }

    let mut communities = assignment;
    let community_count = renumber(&mut communities);
    let modularity = partition_modularity(view, &communities, community_count, resolution);

    LouvainResult {
        communities,
        community_count,
        modularity,
        moves_per_level,
        delta_computations,
        visits,
        level_count: level_count.max(1),
        resolution,
    }
}

/// Local-moving phase: full passes in ascending node order until a pass
/// makes zero moves. Returns the per-node community assignment and the
/// number of accepted moves.
fn local_moving(
    g: &LevelGraph,
    resolution: f64,
    m: f64,
    max_passes: usize,
    delta_computations: &mut u64,
    mut on_visit: impl FnMut(usize),
) -> (Vec<usize>, usize) {
    let n = g.node_count();
    let m2 = 2.0 * m;

    let strengths: Vec<f64> = (0..n).map(|i| g.strength(i)).collect();
    let mut community: Vec<usize> = (0..n).collect();
    let mut sigma_tot = strengths.clone();
    let mut total_moves = 0usize;

    for _ in 0..max_passes {
        let mut pass_moves = 0usize;

        for node in 0..n {
            on_visit(node);
            let current = community[node];
            let ki = strengths[node];

            // Edge weight into each neighboring community; BTreeMap gives
            // the ascending-id candidate order the tie-break relies on.
            let mut comm_weights: BTreeMap<usize, f64> = BTreeMap::new();
            for &(nbr, w) in &g.neighbors[node] {
                *comm_weights.entry(community[nbr]).or_insert(0.0) += w;
            }

            let w_current = comm_weights.get(&current).copied().unwrap_or(0.0);
            let remove_cost = w_current - resolution * ki * (sigma_tot[current] - ki) / m2;

            let mut best = current;
            let mut best_gain = 0.0;
            for (&candidate, &w_to) in &comm_weights {
                if candidate == current {
                    continue;
                }
                *delta_computations += 1;
                let insert_gain = w_to - resolution * ki * sigma_tot[candidate] / m2;
                let gain = insert_gain - remove_cost;
                if gain > best_gain {
                    best_gain = gain;
                    best = candidate;
                }
            }

            if best != current {
                sigma_tot[current] -= ki;
                sigma_tot[best] += ki;
                community[node] = best;
                pass_moves += 1;
            }
        }

        total_moves += pass_moves;
        if pass_moves == 0 {
            break;
        }
    }

    (community, total_moves)
}

/// Contract communities into supernodes. Inter-community weights are
/// summed; intra-community weight w becomes a self-loop of weight 2w.
fn aggregate(g: &LevelGraph, community: &[usize], count: usize) -> LevelGraph {
    let mut self_loops = vec![0.0; count];
    let mut weights: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); count];

    for node in 0..g.node_count() {
        let cu = community[node];
        self_loops[cu] += g.self_loops[node];
        for &(nbr, w) in &g.neighbors[node] {
            let cv = community[nbr];
            if cu == cv {
                // Each intra edge is seen from both endpoints, which
                // yields exactly the doubled self-loop weight.
                self_loops[cu] += w;
            } else {
                *weights[cu].entry(cv).or_insert(0.0) += w;
            }
        }
    }

    let neighbors = weights
        .into_iter()
        .map(|map| map.into_iter().collect())
        .collect();

    LevelGraph {
        neighbors,
        self_loops,
    }
}

/// Renumber community ids to be dense (0, 1, 2, ...) in first-seen order.
fn renumber(community: &mut [usize]) -> usize {
    let mut remap = vec![usize::MAX; community.len()];
    let mut next = 0usize;
    for c in community.iter_mut() {
        if remap[*c] == usize::MAX {
            remap[*c] = next;
            next += 1;
        }
        *c = remap[*c];
    }
    next
}

/// Modularity of a partition over the original view.
fn partition_modularity(
    view: &GraphView,
    communities: &[usize],
    count: usize,
    resolution: f64,
) -> f64 {
    let m = view.total_weight;
    if m <= 0.0 {
        return 0.0;
    }

    // intra[c] accumulates every internal edge from both endpoints
    let mut intra = vec![0.0; count];
    let mut sigma = vec![0.0; count];
    for i in 0..view.node_count {
        let ci = communities[i];
        sigma[ci] += view.strength(i);
        for &(j, w) in &view.neighbors[i] {
            if communities[j] == ci {
                intra[ci] += w;
            }
        }
    }

    let m2 = 2.0 * m;
    (0..count)
        .map(|c| intra[c] / m2 - resolution * (sigma[c] / m2) * (sigma[c] / m2))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle4() -> GraphView {
        let mut view = GraphView::new(4);
        view.add_edge(0, 1, 1.0);
        view.add_edge(1, 2, 1.0);
        view.add_edge(2, 3, 1.0);
        view.add_edge(3, 0, 1.0);
        view
    }

    fn two_cliques() -> GraphView {
        // Two K4 cliques bridged by a single edge
        let mut view = GraphView::new(8);
        for a in 0..4 {
            for b in (a + 1)..4 {
                view.add_edge(a, b, 1.0);
                view.add_edge(a + 4, b + 4, 1.0);
            }
        }
        view.add_edge(3, 4, 1.0);
        view
    }

    #[test]
    fn test_four_cycle_fixed_partition() {
        // With ascending traversal and lowest-id tie-break the 4-cycle
        // always lands on {0,1} and {2,3}.
        let result = louvain(&cycle4(), &LouvainConfig::default());

        assert_eq!(result.communities, vec![0, 0, 1, 1]);
        assert_eq!(result.community_count, 2);
        assert!(result.modularity.abs() < 1e-12);
        assert_eq!(result.moves_per_level, vec![2]);
        assert_eq!(result.move_count(), 2);
        assert_eq!(result.level_count, 1);
        assert_eq!(result.visits, vec![2, 2, 2, 2]);
        assert_eq!(result.delta_computations, 12);
    }

    #[test]
    fn test_two_cliques_split() {
        let result = louvain(&two_cliques(), &LouvainConfig::default());

        assert_eq!(result.community_count, 2);
        for idx in 0..4 {
            assert_eq!(result.communities[idx], result.communities[0]);
            assert_eq!(result.communities[idx + 4], result.communities[4]);
        }
        assert_ne!(result.communities[0], result.communities[4]);
        assert!(result.modularity > 0.3);
    }

    #[test]
    fn test_partition_is_total() {
        let result = louvain(&two_cliques(), &LouvainConfig::default());

        assert_eq!(result.communities.len(), 8);
        let mut sizes = vec![0usize; result.community_count];
        for &c in &result.communities {
            sizes[c] += 1;
        }
        assert_eq!(sizes.iter().sum::<usize>(), 8);
        assert!(sizes.iter().all(|&s| s > 0));
    }

    #[test]
    fn test_modularity_bounds() {
        for view in [cycle4(), two_cliques()] {
            let result = louvain(&view, &LouvainConfig::default());
            assert!(result.modularity >= -1.0 && result.modularity <= 1.0);
        }
    }

    #[test]
    fn test_resolution_monotonicity() {
        let counts: Vec<usize> = [0.25, 1.0, 4.0]
            .iter()
            .map(|&resolution| {
                let config = LouvainConfig {
                    resolution,
                    ..Default::default()
                };
                louvain(&two_cliques(), &config).community_count
            })
            .collect();

        assert!(counts[0] <= counts[1]);
        assert!(counts[1] <= counts[2]);
    }

    #[test]
    fn test_degenerate_graphs() {
        let empty = louvain(&GraphView::new(0), &LouvainConfig::default());
        assert_eq!(empty.community_count, 0);
        assert_eq!(empty.modularity, 0.0);
        assert_eq!(empty.level_count, 1);

        let single = louvain(&GraphView::new(1), &LouvainConfig::default());
        assert_eq!(single.communities, vec![0]);
        assert_eq!(single.community_count, 1);

        let edgeless = louvain(&GraphView::new(3), &LouvainConfig::default());
        assert_eq!(edgeless.communities, vec![0, 1, 2]);
        assert_eq!(edgeless.modularity, 0.0);
        assert_eq!(edgeless.move_count(), 0);
    }

    #[test]
    fn test_detection_is_deterministic() {
        let a = louvain(&two_cliques(), &LouvainConfig::default());
        let b = louvain(&two_cliques(), &LouvainConfig::default());
        assert_eq!(a.communities, b.communities);
        assert_eq!(a.delta_computations, b.delta_computations);
        assert_eq!(a.visits, b.visits);
    }
}
