//! Node record for the attributed graph

use super::types::NodeId;
use serde::{Deserialize, Serialize};

/// Category flags derived from the document snapshot.
///
/// Person notes live under the people category, acronym notes have an
/// all-caps title, journal notes carry the journal marker. Flagged nodes
/// get emphasized sizing and drive the hover neighborhood expansion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFlags {
    pub person: bool,
    pub acronym: bool,
    pub journal: bool,
}

impl NodeFlags {
    /// Whether any emphasis flag is set
    pub fn emphasized(&self) -> bool {
        self.person || self.acronym || self.journal
    }
}

/// A node in the attributed graph
///
/// Topology (id) is fixed at insertion; the remaining attributes are
/// filled in progressively by the pipeline stages: size during build,
/// community by detection, color by the palette, position by layouts,
/// highlighted by interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Dense identifier within the owning store
    pub id: NodeId,

    /// Unique string key (the document path)
    pub key: String,

    /// Display text
    pub label: String,

    /// Positive display size, grows monotonically during build
    pub size: f64,

    /// Horizontal position, unset until a layout runs
    pub x: Option<f64>,

    /// Vertical position, unset until a layout runs
    pub y: Option<f64>,

    /// Community id, unset before the first detection
    pub community: Option<usize>,

    /// Hex color derived from the community, unset before colorization
    pub color: Option<String>,

    /// Interaction highlight
    pub highlighted: bool,

    /// Snapshot-derived category flags
    pub flags: NodeFlags,
}

impl Node {
    /// Create a new node with default attributes
    pub fn new(id: NodeId, key: impl Into<String>, label: impl Into<String>) -> Self {
        Node {
            id,
            key: key.into(),
            label: label.into(),
            size: 1.0,
            x: None,
            y: None,
            community: None,
            color: None,
            highlighted: false,
            flags: NodeFlags::default(),
        }
    }

    /// Create a new node with category flags
    pub fn with_flags(
        id: NodeId,
        key: impl Into<String>,
        label: impl Into<String>,
        flags: NodeFlags,
    ) -> Self {
        Node {
            flags,
            ..Node::new(id, key, label)
        }
    }

    /// Both coordinates, when a layout has run
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        }
    }
}
