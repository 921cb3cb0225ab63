//! Field-level node updates with blank-value sanitization.

use super::draft::Draft;
use super::ops::{add_seed, remove_rec};
use super::NodeSeed;
use crate::error::GraphError;
use crate::graph::{Graph, NodeId};
use crate::id::IdGenerator;
use crate::mutate::Changeset;
use serde_json::{Map, Value};

/// Options for [`update`].
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// When set, existing data fields absent from the patch are pruned, and
    /// `children` (if supplied) fully replaces the node's edge list. Pruning
    /// semantics are provisional; see DESIGN.md.
    pub remove_key_if_missing: bool,
    /// Replacement child list, reconciled against the node's current edges.
    pub children: Option<Vec<NodeSeed>>,
}

/// Merges `patch` into the node's data.
///
/// Emits exactly one op per field that actually changed; an update with no
/// net change returns an empty changeset. `null` and blank-equivalent values
/// (empty or whitespace-only strings, zero-width characters) mean "absent":
/// they delete the field when it exists and are never written.
pub fn update(
    graph: &Graph,
    id: &str,
    patch: Map<String, Value>,
    options: UpdateOptions,
    ids: &mut dyn IdGenerator,
) -> Result<(Graph, Changeset), GraphError> {
    graph.node(id)?;
    let mut draft = Draft::new(graph);
    update_in(&mut draft, id, patch, &options, ids)?;
    Ok(draft.finish())
}

fn update_in(
    draft: &mut Draft,
    id: &str,
    patch: Map<String, Value>,
    options: &UpdateOptions,
    ids: &mut dyn IdGenerator,
) -> Result<(), GraphError> {
    draft.graph().node(id)?;

    if options.remove_key_if_missing {
        if let Some(children) = &options.children {
            reconcile_children(draft, id, children.clone(), ids)?;
        }
        // Prune fields the new payload no longer carries.
        let existing: Vec<String> = draft.graph().node(id)?.data.keys().cloned().collect();
        for field in existing {
            if patch.get(&field).cloned().and_then(sanitize).is_none() {
                draft.delete_data(id, &field)?;
            }
        }
    }

    for (field, value) in patch {
        match sanitize(value) {
            Some(value) => draft.set_data(id, &field, value)?,
            None => draft.delete_data(id, &field)?,
        }
    }
    Ok(())
}

fn reconcile_children(
    draft: &mut Draft,
    id: &str,
    children: Vec<NodeSeed>,
    ids: &mut dyn IdGenerator,
) -> Result<(), GraphError> {
    let seeded: Vec<NodeSeed> = children
        .into_iter()
        .map(|mut child| {
            if child.id.is_none() {
                child.id = Some(ids.generate());
            }
            child
        })
        .collect();
    let target: Vec<NodeId> = seeded.iter().filter_map(|child| child.id.clone()).collect();
    let current = draft.graph().node(id)?.edges.clone();

    if current != target {
        for child in &seeded {
            let Some(child_id) = &child.id else { continue };
            if !current.iter().any(|edge| edge == child_id) {
                add_seed(draft, child.clone(), id, None, ids)?;
            }
        }
        for child_id in &current {
            if !target.iter().any(|wanted| wanted == child_id) {
                remove_rec(draft, child_id, id)?;
            }
        }
        reorder_edges(draft, id, &target)?;
    }

    // Recurse into children that already existed; fresh ones were just built
    // from their seeds.
    for child in seeded {
        let Some(child_id) = child.id.clone() else {
            continue;
        };
        if current.iter().any(|edge| edge == &child_id) {
            update_in(
                draft,
                &child_id,
                child.data,
                &UpdateOptions {
                    remove_key_if_missing: true,
                    children: None,
                },
                ids,
            )?;
        }
    }
    Ok(())
}

fn reorder_edges(draft: &mut Draft, id: &str, target: &[NodeId]) -> Result<(), GraphError> {
    if draft.graph().node(id)?.edges.as_slice() == target {
        return Ok(());
    }
    let current = draft.graph().node(id)?.edges.clone();
    for child in &current {
        draft.remove_edge(id, child)?;
    }
    for child in target {
        draft.insert_edge(id, None, child)?;
    }
    Ok(())
}

/// Collapses blank-equivalent values to `None`.
///
/// Strings lose zero-width characters and surrounding whitespace; objects and
/// arrays are sanitized recursively and collapse when they end up empty.
pub(crate) fn sanitize(value: Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::String(text) => {
            let cleaned: String = text
                .chars()
                .filter(|c| !matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}' | '\u{21B5}'))
                .collect();
            let trimmed = cleaned.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(Value::String(trimmed.to_string()))
            }
        }
        Value::Object(map) => {
            let cleaned: Map<String, Value> = map
                .into_iter()
                .filter_map(|(key, value)| sanitize(value).map(|value| (key, value)))
                .collect();
            if cleaned.is_empty() {
                None
            } else {
                Some(Value::Object(cleaned))
            }
        }
        Value::Array(items) => {
            let cleaned: Vec<Value> = items.into_iter().filter_map(sanitize).collect();
            if cleaned.is_empty() {
                None
            } else {
                Some(Value::Array(cleaned))
            }
        }
        other => Some(other),
    }
}

pub(crate) fn sanitize_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter_map(|(key, value)| sanitize(value).map(|value| (key, value)))
        .collect()
}
