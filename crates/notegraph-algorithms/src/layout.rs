//! Static one-shot layouts
//!
//! Deterministic placements computed in a single pass: uniform random,
//! evenly spaced circular, and hierarchical circle packing grouped by a
//! per-node attribute (communities in practice).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

const MIN_RADIUS: f64 = 1e-3;

/// Uniform random positions in [-scale, scale]².
///
/// Reproducible only when an explicit seed is supplied; otherwise the
/// generator is entropy-seeded by design.
pub fn random(node_count: usize, scale: f64, seed: Option<u64>) -> Vec<(f64, f64)> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    (0..node_count)
        .map(|_| {
            (
                rng.gen_range(-scale..=scale),
                rng.gen_range(-scale..=scale),
            )
        })
        .collect()
}

/// Evenly spaced positions on a circle of radius `scale`, in node order.
pub fn circular(node_count: usize, scale: f64) -> Vec<(f64, f64)> {
    if node_count == 0 {
        return Vec::new();
    }

    let angle_step = 2.0 * PI / node_count as f64;
    (0..node_count)
        .map(|i| {
            let angle = i as f64 * angle_step;
            (scale * angle.cos(), scale * angle.sin())
        })
        .collect()
}

/// Circle-packing settings
#[derive(Debug, Clone)]
pub struct CirclePackSettings {
    /// Multiplier applied to every computed coordinate
    pub scale: f64,
    /// Fraction of the largest sibling radius kept free between circles
    pub padding_ratio: f64,
}

impl Default for CirclePackSettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            padding_ratio: 0.1,
        }
    }
}

/// Hierarchical circle packing.
///
/// `groups[i]` names the group of node `i` (dense ids), `radii[i]` its
/// circle radius. Each group's members are packed into an enclosing
/// circle, then the enclosures are packed into the outer circle; sibling
/// circles never overlap by construction. Groups are laid out in
/// first-seen order, members in node order.
pub fn circle_pack(
    groups: &[usize],
    radii: &[f64],
    settings: &CirclePackSettings,
) -> Vec<(f64, f64)> {
    assert_eq!(groups.len(), radii.len());
    let n = groups.len();
    if n == 0 {
        return Vec::new();
    }

    // Bucket members per group in first-seen group order
    let mut order: Vec<usize> = Vec::new();
    let mut members: Vec<Vec<usize>> = Vec::new();
    let mut slot_of = vec![usize::MAX; groups.iter().max().copied().unwrap_or(0) + 1];
    for (node, &group) in groups.iter().enumerate() {
        if slot_of[group] == usize::MAX {
            slot_of[group] = order.len();
            order.push(group);
            members.push(Vec::new());
        }
        members[slot_of[group]].push(node);
    }

    // Pack each group's members, then pack the enclosures
    let mut offsets: Vec<Vec<(f64, f64)>> = Vec::with_capacity(members.len());
    let mut enclosures: Vec<f64> = Vec::with_capacity(members.len());
    for group_members in &members {
        let leaf_radii: Vec<f64> = group_members
            .iter()
            .map(|&node| radii[node].max(MIN_RADIUS))
            .collect();
        let (positions, enclosure) = pack_disc(&leaf_radii, settings.padding_ratio);
        offsets.push(positions);
        enclosures.push(enclosure);
    }
    let (centers, _) = pack_disc(&enclosures, settings.padding_ratio);

    let mut result = vec![(0.0, 0.0); n];
    for (slot, group_members) in members.iter().enumerate() {
        let (cx, cy) = centers[slot];
        for (pos, &node) in offsets[slot].iter().zip(group_members) {
            result[node] = (
                (cx + pos.0) * settings.scale,
                (cy + pos.1) * settings.scale,
            );
        }
    }
    result
}

/// Pack circles of the given radii into a disc around the origin.
///
/// Concentric-ring placement sized by the largest radius: the first
/// circle sits at the center and each ring holds as many circles as fit
/// without adjacent contact. Returns the centers and the radius of the
/// enclosing circle.
fn pack_disc(radii: &[f64], padding_ratio: f64) -> (Vec<(f64, f64)>, f64) {
    let n = radii.len();
    if n == 0 {
        return (Vec::new(), 0.0);
    }

    let rmax = radii.iter().cloned().fold(MIN_RADIUS, f64::max);
    let gap = rmax * padding_ratio;
    let step = 2.0 * rmax + gap;

    let mut positions = Vec::with_capacity(n);
    positions.push((0.0, 0.0));

    let mut ring = 0usize;
    let mut outer = radii[0];
    while positions.len() < n {
        ring += 1;
        let ring_radius = ring as f64 * step;
        // Adjacent centers end up at least 2*rmax + gap apart
        let half_angle = ((rmax + gap / 2.0) / ring_radius).asin();
        let capacity = ((PI / half_angle).floor() as usize).max(1);
        let offset = ring as f64 * 0.5;

        let remaining = n - positions.len();
        for slot in 0..capacity.min(remaining) {
            let angle = offset + slot as f64 * 2.0 * PI / capacity as f64;
            positions.push((ring_radius * angle.cos(), ring_radius * angle.sin()));
        }
        outer = ring_radius + rmax;
    }

    (positions, outer + gap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
        ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
    }

    #[test]
    fn test_circular_spacing() {
        let positions = circular(8, 100.0);
        assert_eq!(positions.len(), 8);
        for &(x, y) in &positions {
            assert!(((x * x + y * y).sqrt() - 100.0).abs() < 1e-9);
        }
        // Consecutive nodes are evenly spaced
        let d01 = distance(positions[0], positions[1]);
        let d12 = distance(positions[1], positions[2]);
        assert!((d01 - d12).abs() < 1e-9);
    }

    #[test]
    fn test_circular_degenerate() {
        assert!(circular(0, 10.0).is_empty());
        assert_eq!(circular(1, 10.0), vec![(10.0, 0.0)]);
    }

    #[test]
    fn test_random_seeded_reproducible() {
        let a = random(50, 1000.0, Some(7));
        let b = random(50, 1000.0, Some(7));
        assert_eq!(a, b);
        for &(x, y) in &a {
            assert!(x.abs() <= 1000.0 && y.abs() <= 1000.0);
        }
    }

    #[test]
    fn test_random_seeds_differ() {
        // Unseeded runs are non-reproducible by design, so determinism is
        // only asserted through explicit seeds.
        let a = random(50, 1000.0, Some(1));
        let b = random(50, 1000.0, Some(2));
        assert_ne!(a, b);
    }

    #[test]
    fn test_circle_pack_no_sibling_overlap() {
        let groups = vec![0, 0, 0, 1, 1, 1, 2, 2];
        let radii = vec![1.0, 2.0, 1.5, 1.0, 1.0, 3.0, 2.0, 1.0];
        let positions = circle_pack(&groups, &radii, &CirclePackSettings::default());

        for a in 0..groups.len() {
            for b in (a + 1)..groups.len() {
                if groups[a] == groups[b] {
                    assert!(
                        distance(positions[a], positions[b]) >= radii[a] + radii[b] - 1e-9,
                        "members {a} and {b} overlap"
                    );
                }
            }
        }
    }

    #[test]
    fn test_circle_pack_groups_separated() {
        // Two groups: intra-group distances stay below inter-group ones
        let groups = vec![0, 0, 0, 1, 1, 1];
        let radii = vec![1.0; 6];
        let positions = circle_pack(&groups, &radii, &CirclePackSettings::default());

        let mut intra = Vec::new();
        let mut inter = Vec::new();
        for a in 0..6 {
            for b in (a + 1)..6 {
                let d = distance(positions[a], positions[b]);
                if groups[a] == groups[b] {
                    intra.push(d);
                } else {
                    inter.push(d);
                }
            }
        }
        let intra_mean: f64 = intra.iter().sum::<f64>() / intra.len() as f64;
        let inter_mean: f64 = inter.iter().sum::<f64>() / inter.len() as f64;
        assert!(intra_mean < inter_mean);
    }

    #[test]
    fn test_circle_pack_scale() {
        let groups = vec![0, 0, 1];
        let radii = vec![1.0; 3];
        let unit = circle_pack(&groups, &radii, &CirclePackSettings::default());
        let doubled = circle_pack(
            &groups,
            &radii,
            &CirclePackSettings {
                scale: 2.0,
                ..Default::default()
            },
        );
        for (a, b) in unit.iter().zip(&doubled) {
            assert!((a.0 * 2.0 - b.0).abs() < 1e-9);
            assert!((a.1 * 2.0 - b.1).abs() < 1e-9);
        }
    }
}
