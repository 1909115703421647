//! JSON import/export of the whole net.
//!
//! The document is `{"nodes": [...], "edges": [...]}`, the same shape the model
//! types serialize to. The clock and the saved snapshot are not part of it.

use itertools::Itertools;
use log::{info, warn};

use crate::error::DocumentError;
use crate::model::{Net, Node};

/// Pretty-printed JSON in model order.
pub fn export(net: &Net) -> Result<String, DocumentError> {
    serde_json::to_string_pretty(net).map_err(DocumentError::Encode)
}

/// Parses, validates and normalizes a document. The result is renumbered and
/// ready to become live.
pub fn parse(json: &str) -> Result<Net, DocumentError> {
    let mut net: Net = serde_json::from_str(json)?;
    validate(&net)?;
    normalize(&mut net);
    net.renumber();
    info!(
        "Parsed model document: {} places, {} transitions, {} arcs",
        net.places().count(),
        net.transitions().count(),
        net.arcs.len()
    );
    Ok(net)
}

fn validate(net: &Net) -> Result<(), DocumentError> {
    let duplicate_nodes: Vec<_> = net.nodes.iter().map(Node::id).duplicates().collect();
    if !duplicate_nodes.is_empty() {
        return Err(DocumentError::Invalid(format!(
            "duplicate node ids: {}",
            duplicate_nodes.iter().join(", ")
        )));
    }

    let duplicate_arcs: Vec<_> = net.arcs.iter().map(|a| a.id.as_str()).duplicates().collect();
    if !duplicate_arcs.is_empty() {
        return Err(DocumentError::Invalid(format!(
            "duplicate edge ids: {}",
            duplicate_arcs.iter().join(", ")
        )));
    }

    for arc in &net.arcs {
        let source_kind = net.kind_of(&arc.source).ok_or_else(|| {
            DocumentError::Invalid(format!("edge {} starts at unknown node {}", arc.id, arc.source))
        })?;
        let target_kind = net.kind_of(&arc.target).ok_or_else(|| {
            DocumentError::Invalid(format!("edge {} ends at unknown node {}", arc.id, arc.target))
        })?;
        if source_kind == target_kind {
            return Err(DocumentError::Invalid(format!(
                "edge {} joins two nodes of kind {:?}",
                arc.id, source_kind
            )));
        }
    }

    if next_node_counter(net).is_none() {
        return Err(DocumentError::Invalid(
            "node id numbers leave no room for new nodes".to_string(),
        ));
    }
    Ok(())
}

// Execution flags that the engine itself can never produce are reset to
// something the scheduler can act on.
fn normalize(net: &mut Net) {
    for transition in net.transitions_mut() {
        let data = &mut transition.data;
        if data.waiting != data.tokens_removed {
            warn!(
                "Transition {} has inconsistent waiting flags, resetting it to idle",
                transition.id
            );
            data.waiting = false;
            data.tokens_removed = false;
            data.activation_time = None;
        } else if data.is_committed() && data.activation_time.is_none() {
            warn!(
                "Transition {} is waiting without an activation time, assuming 0",
                transition.id
            );
            data.activation_time = Some(0);
        } else if !data.waiting && data.activation_time.is_some() {
            data.activation_time = None;
        }
    }
}

/// Next value for the node id counter: one past the largest number found after
/// the first `-` of a node id (`position-3-copy` counts as 3). `None` when that
/// number is `u64::MAX`.
pub fn next_node_counter(net: &Net) -> Option<u64> {
    net.nodes
        .iter()
        .filter_map(|n| n.id().split('-').nth(1)?.parse::<u64>().ok())
        .max()
        .map_or(Some(0), |highest| highest.checked_add(1))
}
