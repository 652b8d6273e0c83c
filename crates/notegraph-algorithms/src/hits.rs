//! HITS hub and authority scores
//!
//! Power iteration over the undirected view: authority scores gather from
//! neighboring hub scores and vice versa, normalized each round, until the
//! largest per-node change drops below the tolerance.

use super::common::GraphView;

/// HITS configuration
#[derive(Debug, Clone)]
pub struct HitsConfig {
    /// Iteration cap
    pub max_iterations: usize,
    /// Convergence tolerance on the largest per-node change
    pub tolerance: f64,
}

impl Default for HitsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 150,
            tolerance: 1e-6,
        }
    }
}

/// Hub and authority scores per node index
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitsResult {
    pub hubs: Vec<f64>,
    pub authorities: Vec<f64>,
    /// Iterations actually run
    pub iterations: usize,
}

/// Compute HITS scores for the graph view.
pub fn hits(view: &GraphView, config: &HitsConfig) -> HitsResult {
    let n = view.node_count;
    if n == 0 {
        return HitsResult {
            hubs: Vec::new(),
            authorities: Vec::new(),
            iterations: 0,
        };
    }

    let mut hubs = vec![1.0; n];
    let mut authorities = vec![1.0; n];
    let mut iterations = 0;

    for _ in 0..config.max_iterations {
        iterations += 1;

        let mut next_authorities = vec![0.0; n];
        for i in 0..n {
            for &(j, w) in &view.neighbors[i] {
                next_authorities[i] += hubs[j] * w;
            }
        }
        normalize(&mut next_authorities);

        let mut next_hubs = vec![0.0; n];
        for i in 0..n {
            for &(j, w) in &view.neighbors[i] {
                next_hubs[i] += next_authorities[j] * w;
            }
        }
        normalize(&mut next_hubs);

        let drift = max_change(&hubs, &next_hubs).max(max_change(&authorities, &next_authorities));
        hubs = next_hubs;
        authorities = next_authorities;

        if drift < config.tolerance {
            break;
        }
    }

    HitsResult {
        hubs,
        authorities,
        iterations,
    }
}

fn normalize(scores: &mut [f64]) {
    let total: f64 = scores.iter().sum();
    if total > 0.0 {
        for s in scores.iter_mut() {
            *s /= total;
        }
    }
}

fn max_change(before: &[f64], after: &[f64]) -> f64 {
    before
        .iter()
        .zip(after)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max)
}
