//! Community color palette
//!
//! Produces a deterministic set of visually distinct colors, one per
//! community. Hues advance by the golden angle so neighboring indices
//! land far apart on the wheel, and saturation/lightness rotate through
//! three bands to keep colors apart once hues start crowding.

use crate::graph::GraphStore;

const GOLDEN_ANGLE: f64 = 137.507_764;

// (saturation, lightness) bands, cycled by index
const BANDS: [(f64, f64); 3] = [(0.65, 0.52), (0.80, 0.38), (0.55, 0.65)];

/// Generate `count` distinct hex colors, stable across calls.
pub fn distinct_colors(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let hue = (i as f64 * GOLDEN_ANGLE).rem_euclid(360.0);
            let (saturation, lightness) = BANDS[i % BANDS.len()];
            hex(hue, saturation, lightness)
        })
        .collect()
}

/// Color every node by its community, communities ordered by first
/// appearance in traversal order. Nodes without a community keep their
/// current color.
pub fn colorize(store: &mut GraphStore) {
    let mut seen: Vec<usize> = Vec::new();
    for node in store.nodes() {
        if let Some(community) = node.community {
            if !seen.contains(&community) {
                seen.push(community);
            }
        }
    }

    let colors = distinct_colors(seen.len());
    let assignments: Vec<(crate::graph::NodeId, String)> = store
        .nodes()
        .filter_map(|node| {
            node.community.map(|community| {
                let slot = seen.iter().position(|&c| c == community).unwrap_or(0);
                (node.id, colors[slot].clone())
            })
        })
        .collect();

    for (id, color) in assignments {
        store.set_color(id, color);
    }
}

fn hex(hue: f64, saturation: f64, lightness: f64) -> String {
    let (r, g, b) = hsl_to_rgb(hue, saturation, lightness);
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let hue_prime = hue / 60.0;
    let x = chroma * (1.0 - (hue_prime.rem_euclid(2.0) - 1.0).abs());

    let (r, g, b) = match hue_prime as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };

    let m = lightness - chroma / 2.0;
    (
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeFlags;
    use std::collections::HashSet;

    #[test]
    fn test_colors_distinct_and_stable() {
        let colors = distinct_colors(32);
        assert_eq!(colors.len(), 32);

        let unique: HashSet<&String> = colors.iter().collect();
        assert_eq!(unique.len(), 32);

        assert_eq!(colors, distinct_colors(32));
        for color in &colors {
            assert_eq!(color.len(), 7);
            assert!(color.starts_with('#'));
        }
    }

    #[test]
    fn test_colorize_by_first_seen_community() {
        let mut store = GraphStore::new();
        for key in ["a", "b", "c"] {
            store.add_node(key, key, NodeFlags::default()).unwrap();
        }
        let a = store.node_id("a").unwrap();
        let b = store.node_id("b").unwrap();
        let c = store.node_id("c").unwrap();
        // First-seen order is 7 then 3, regardless of numeric order
        store.set_community(a, 7);
        store.set_community(b, 3);
        store.set_community(c, 7);

        colorize(&mut store);

        let colors = distinct_colors(2);
        assert_eq!(store.node(a).unwrap().color.as_deref(), Some(colors[0].as_str()));
        assert_eq!(store.node(b).unwrap().color.as_deref(), Some(colors[1].as_str()));
        assert_eq!(store.node(c).unwrap().color.as_deref(), Some(colors[0].as_str()));
    }

    #[test]
    fn test_colorize_skips_unassigned_nodes() {
        let mut store = GraphStore::new();
        store.add_node("a", "a", NodeFlags::default()).unwrap();
        colorize(&mut store);
        assert!(store.node(store.node_id("a").unwrap()).unwrap().color.is_none());
    }
}
