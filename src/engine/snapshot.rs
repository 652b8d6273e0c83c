//! Document snapshot input
//!
//! The document-collection collaborator hands over a flat list of
//! records; this module turns one into a fresh graph store. A node per
//! record, an edge per link whose target resolves to another record;
//! unresolved targets are an expected case and are silently dropped.

use super::config::EngineConfig;
use crate::graph::{GraphResult, GraphStore, NodeFlags, NodeId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One document in the collection snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Unique key, typically the document path
    pub id: String,

    /// Display title
    pub title: String,

    /// Name of the containing category, if any
    #[serde(default)]
    pub parent_category: Option<String>,

    /// Title consists solely of capital letters
    #[serde(default)]
    pub is_all_caps_token: bool,

    /// Document carries the journal marker
    #[serde(default)]
    pub is_journal: bool,

    /// Raw link targets, resolved against the other records' ids
    #[serde(default)]
    pub link_targets: Vec<String>,
}

/// Build a store from a snapshot.
pub fn build_store(records: &[DocumentRecord], config: &EngineConfig) -> GraphResult<GraphStore> {
    let mut store = GraphStore::with_capacity(records.len());

    for record in records {
        let flags = NodeFlags {
            person: record.parent_category.as_deref() == Some(config.person_category.as_str()),
            acronym: record.is_all_caps_token,
            journal: record.is_journal,
        };
        store.add_node(&record.id, &record.title, flags)?;
    }

    let mut dropped = 0usize;
    for record in records {
        let Some(source) = store.node_id(&record.id) else {
            continue;
        };
        for target_key in &record.link_targets {
            match store.node_id(target_key) {
                Some(target) => {
                    store.add_edge(source, target, 1.0)?;
                    // Emphasized endpoints grow with every resolved link
                    // occurrence, duplicates included
                    bump_size(&mut store, source);
                    bump_size(&mut store, target);
                }
                None => {
                    dropped += 1;
                    debug!(source = %record.id, target = %target_key, "dropping unresolved link");
                }
            }
        }
    }
    if dropped > 0 {
        debug!(dropped, "unresolved link targets dropped");
    }

    Ok(store)
}

// Diminishing growth: size += 1/size², only for flagged nodes
fn bump_size(store: &mut GraphStore, id: NodeId) {
    let emphasized = store
        .node(id)
        .map(|node| node.flags.emphasized())
        .unwrap_or(false);
    if emphasized {
        store.update_size(id, |size| size + 1.0 / (size * size));
    }
}
