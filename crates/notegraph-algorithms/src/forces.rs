//! Iterative layout simulations
//!
//! Single-tick step functions for the two background simulations: a
//! force-directed attraction/repulsion pass and an overlap-removal pass.
//! Callers own the loop; each step reads and writes a plain position
//! slice so the driving task can snapshot and restore around it.

use super::common::GraphView;
use rayon::prelude::*;

/// Force-directed simulation settings
#[derive(Debug, Clone)]
pub struct ForceSettings {
    /// Repulsion scaling between every node pair
    pub repulsion: f64,
    /// Attraction multiplier along edges
    pub attraction: f64,
    /// Pull toward the origin, scaled by node mass
    pub gravity: f64,
    /// Divisor applied to every displacement
    pub slow_down: f64,
    /// Per-tick displacement clamp
    pub max_displacement: f64,
}

impl ForceSettings {
    /// Infer settings from the graph order, the way the interactive
    /// defaults are chosen: larger graphs get a stronger slow-down so a
    /// single tick never tears the picture apart.
    pub fn infer(view: &GraphView) -> Self {
        let order = view.node_count.max(1) as f64;
        Self {
            repulsion: 10.0,
            attraction: 1.0,
            gravity: 0.05,
            slow_down: 1.0 + order.ln(),
            max_displacement: 50.0,
        }
    }
}

/// Overlap-removal settings
#[derive(Debug, Clone)]
pub struct NoverlapSettings {
    /// Extra spacing required between circle borders
    pub margin: f64,
    /// Fraction of the overlap resolved per tick, in (0, 1]
    pub speed: f64,
}

impl Default for NoverlapSettings {
    fn default() -> Self {
        Self {
            margin: 0.0,
            speed: 0.5,
        }
    }
}

/// Advance the force-directed simulation by one tick.
///
/// Every node pair repels with strength inversely related to distance,
/// edges attract proportionally to weight and distance, and a weak
/// gravity keeps disconnected components from drifting off. Returns the
/// largest displacement magnitude applied this tick.
pub fn force_directed_step(
    view: &GraphView,
    positions: &mut [(f64, f64)],
    settings: &ForceSettings,
) -> f64 {
    let n = positions.len();
    if n < 2 {
        return 0.0;
    }

    let masses: Vec<f64> = (0..n).map(|i| view.degree(i) as f64 + 1.0).collect();
    let snapshot: Vec<(f64, f64)> = positions.to_vec();

    // The per-node force sums stay sequential, so the result does not
    // depend on rayon's scheduling.
    let displacements: Vec<(f64, f64)> = (0..n)
        .into_par_iter()
        .map(|i| {
            let (xi, yi) = snapshot[i];
            let mut fx = 0.0;
            let mut fy = 0.0;

            // Pairwise repulsion
            for j in 0..n {
                if i == j {
                    continue;
                }
                let (dx, dy) = separation(snapshot[i], snapshot[j], i, j);
                let dist_sq = dx * dx + dy * dy;
                let force = settings.repulsion * masses[i] * masses[j] / dist_sq;
                let dist = dist_sq.sqrt();
                fx += dx / dist * force;
                fy += dy / dist * force;
            }

            // Attraction along incident edges
            for &(j, weight) in &view.neighbors[i] {
                let (xj, yj) = snapshot[j];
                fx += (xj - xi) * weight * settings.attraction;
                fy += (yj - yi) * weight * settings.attraction;
            }

            // Gravity toward the origin
            fx -= xi * settings.gravity * masses[i];
            fy -= yi * settings.gravity * masses[i];

            clamp(
                (fx / settings.slow_down, fy / settings.slow_down),
                settings.max_displacement,
            )
        })
        .collect();

    let mut max_moved: f64 = 0.0;
    for (pos, (dx, dy)) in positions.iter_mut().zip(&displacements) {
        pos.0 += dx;
        pos.1 += dy;
        max_moved = max_moved.max((dx * dx + dy * dy).sqrt());
    }
    max_moved
}

/// Advance the overlap-removal simulation by one tick.
///
/// Every overlapping circle pair is pushed apart along the line between
/// centers, proportionally to the overlap depth. Returns the largest
/// overlap observed before the push; the caller stops the loop once this
/// residual drops under its tolerance.
pub fn noverlap_step(
    positions: &mut [(f64, f64)],
    radii: &[f64],
    settings: &NoverlapSettings,
) -> f64 {
    let n = positions.len();
    let mut pushes = vec![(0.0, 0.0); n];
    let mut residual: f64 = 0.0;

    for a in 0..n {
        for b in (a + 1)..n {
            let (dx, dy) = separation(positions[a], positions[b], a, b);
            let dist = (dx * dx + dy * dy).sqrt();
            let required = radii[a] + radii[b] + settings.margin;
            let overlap = required - dist;
            if overlap <= 0.0 {
                continue;
            }
            residual = residual.max(overlap);

            let push = overlap / 2.0 * settings.speed;
            pushes[a].0 += dx / dist * push;
            pushes[a].1 += dy / dist * push;
            pushes[b].0 -= dx / dist * push;
            pushes[b].1 -= dy / dist * push;
        }
    }

    for (pos, (dx, dy)) in positions.iter_mut().zip(&pushes) {
        pos.0 += dx;
        pos.1 += dy;
    }
    residual
}

/// Vector from `b` to `a`, replaced by a deterministic synthetic
/// direction when the points coincide.
fn separation(a: (f64, f64), b: (f64, f64), ia: usize, ib: usize) -> (f64, f64) {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    if dx * dx + dy * dy > 1e-12 {
        (dx, dy)
    } else {
        let angle = (ia * 13 + ib * 7) as f64 * 2.399_963;
        (angle.cos() * 1e-3, angle.sin() * 1e-3)
    }
}

fn clamp(delta: (f64, f64), limit: f64) -> (f64, f64) {
    let magnitude = (delta.0 * delta.0 + delta.1 * delta.1).sqrt();
    if magnitude > limit {
        (delta.0 / magnitude * limit, delta.1 / magnitude * limit)
    } else {
        delta
    }
}
