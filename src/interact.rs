//! Hover and search highlight state
//!
//! Consumes discrete hover/search events and derives the highlighted
//! attribute the renderer reads. Hover and search are independent
//! overlays over the same attribute; whichever wrote last wins on a
//! given node.

use crate::graph::{EdgeId, GraphStore, NodeId};

/// Minimum search term length before highlighting kicks in
pub const MIN_SEARCH_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HoverState {
    Idle,
    Hovering(NodeId),
}

/// Interaction state machine
#[derive(Debug)]
pub struct InteractionState {
    hover: HoverState,
    /// Exactly the nodes the current hover set, to reverse on leave
    hover_applied: Vec<NodeId>,
    /// Edges lit along with the expanded neighborhood
    hover_applied_edges: Vec<EdgeId>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionState {
    pub fn new() -> Self {
        Self {
            hover: HoverState::Idle,
            hover_applied: Vec::new(),
            hover_applied_edges: Vec::new(),
        }
    }

    /// Pointer entered a node. Highlights it, and for person nodes also
    /// their direct person neighbors.
    pub fn hover_enter(&mut self, store: &mut GraphStore, id: NodeId) {
        if let HoverState::Hovering(previous) = self.hover {
            if previous == id {
                return;
            }
            self.clear_hover(store);
        }

        let mut applied = vec![id];
        let mut applied_edges = Vec::new();
        let expand = store.node(id).map(|node| node.flags.person).unwrap_or(false);
        if expand {
            for neighbor in store.neighbors(id).collect::<Vec<_>>() {
                let person = store
                    .node(neighbor)
                    .map(|node| node.flags.person)
                    .unwrap_or(false);
                if person {
                    applied.push(neighbor);
                    if let Some(edge) = store.edge_between(id, neighbor) {
                        applied_edges.push(edge);
                    }
                }
            }
        }

        for &node in &applied {
            store.set_highlighted(node, true);
        }
        for &edge in &applied_edges {
            store.set_edge_highlighted(edge, true);
        }
        self.hover = HoverState::Hovering(id);
        self.hover_applied = applied;
        self.hover_applied_edges = applied_edges;
    }

    /// Pointer left a node. Reverses exactly what enter applied.
    pub fn hover_leave(&mut self, store: &mut GraphStore, id: NodeId) {
        if self.hover == HoverState::Hovering(id) {
            self.clear_hover(store);
        }
    }

    /// Search term changed. Terms shorter than the threshold clear every
    /// highlight; otherwise nodes match by case-insensitive substring on
    /// the label.
    pub fn search(&mut self, store: &mut GraphStore, term: &str, min_len: usize) {
        if term.chars().count() < min_len {
            let ids: Vec<NodeId> = store.nodes().map(|node| node.id).collect();
            for id in ids {
                store.set_highlighted(id, false);
            }
            return;
        }

        let needle = term.to_lowercase();
        let matches: Vec<(NodeId, bool)> = store
            .nodes()
            .map(|node| (node.id, node.label.to_lowercase().contains(&needle)))
            .collect();
        for (id, matched) in matches {
            store.set_highlighted(id, matched);
        }
    }

    fn clear_hover(&mut self, store: &mut GraphStore) {
        for id in self.hover_applied.drain(..) {
            store.set_highlighted(id, false);
        }
        for edge in self.hover_applied_edges.drain(..) {
            store.set_edge_highlighted(edge, false);
        }
        self.hover = HoverState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeFlags;

    fn person_flags() -> NodeFlags {
        NodeFlags {
            person: true,
            ..Default::default()
        }
    }

    fn highlighted(store: &GraphStore, key: &str) -> bool {
        store.node(store.node_id(key).unwrap()).unwrap().highlighted
    }

    fn people_graph() -> GraphStore {
        let mut store = GraphStore::new();
        store.add_node("alice", "Alice", person_flags()).unwrap();
        store.add_node("bob", "Bob", person_flags()).unwrap();
        store
            .add_node("notes/topic", "Topic", NodeFlags::default())
            .unwrap();
        let alice = store.node_id("alice").unwrap();
        let bob = store.node_id("bob").unwrap();
        let topic = store.node_id("notes/topic").unwrap();
        store.add_edge(alice, bob, 1.0).unwrap();
        store.add_edge(alice, topic, 1.0).unwrap();
        store
    }

    #[test]
    fn test_hover_plain_node() {
        let mut store = people_graph();
        let mut state = InteractionState::new();
        let topic = store.node_id("notes/topic").unwrap();

        state.hover_enter(&mut store, topic);
        assert!(highlighted(&store, "notes/topic"));
        assert!(!highlighted(&store, "alice"));

        state.hover_leave(&mut store, topic);
        assert!(!highlighted(&store, "notes/topic"));
    }

    #[test]
    fn test_hover_person_expands_to_person_neighbors() {
        let mut store = people_graph();
        let mut state = InteractionState::new();
        let alice = store.node_id("alice").unwrap();
        let bob = store.node_id("bob").unwrap();
        let edge = store.edge_between(alice, bob).unwrap();

        state.hover_enter(&mut store, alice);
        assert!(highlighted(&store, "alice"));
        assert!(highlighted(&store, "bob"));
        assert!(store.edge(edge).unwrap().highlighted);
        // Non-person neighbor stays dark
        assert!(!highlighted(&store, "notes/topic"));

        state.hover_leave(&mut store, alice);
        assert!(!highlighted(&store, "alice"));
        assert!(!highlighted(&store, "bob"));
        assert!(!store.edge(edge).unwrap().highlighted);
    }

    #[test]
    fn test_hover_switch_reverses_previous() {
        let mut store = people_graph();
        let mut state = InteractionState::new();
        let alice = store.node_id("alice").unwrap();
        let topic = store.node_id("notes/topic").unwrap();

        state.hover_enter(&mut store, alice);
        state.hover_enter(&mut store, topic);
        assert!(!highlighted(&store, "alice"));
        assert!(!highlighted(&store, "bob"));
        assert!(highlighted(&store, "notes/topic"));
    }

    #[test]
    fn test_search_case_insensitive_substring() {
        let mut store = GraphStore::new();
        store
            .add_node("x", "ABCdef", NodeFlags::default())
            .unwrap();
        store
            .add_node("y", "other", NodeFlags::default())
            .unwrap();
        let mut state = InteractionState::new();

        state.search(&mut store, "abcd", MIN_SEARCH_LEN);
        assert!(highlighted(&store, "x"));
        assert!(!highlighted(&store, "y"));
    }

    #[test]
    fn test_short_term_clears_all() {
        let mut store = people_graph();
        let mut state = InteractionState::new();

        state.search(&mut store, "alice", MIN_SEARCH_LEN);
        assert!(highlighted(&store, "alice"));

        // Three characters is under the threshold, regardless of content
        state.search(&mut store, "ali", MIN_SEARCH_LEN);
        for node in store.nodes() {
            assert!(!node.highlighted);
        }
    }

    #[test]
    fn test_search_overwrites_nonmatches() {
        let mut store = people_graph();
        let mut state = InteractionState::new();

        state.search(&mut store, "alice", MIN_SEARCH_LEN);
        state.search(&mut store, "topic", MIN_SEARCH_LEN);
        assert!(!highlighted(&store, "alice"));
        assert!(highlighted(&store, "notes/topic"));
    }
}
