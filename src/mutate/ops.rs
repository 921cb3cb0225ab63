//! Structural mutations: creating, referencing, relocating and removing nodes.

use super::draft::Draft;
use super::{NodeSeed, Placement, Relationships, is_valid_section_position, sanitize_map};
use crate::error::{GraphError, InvalidOperation};
use crate::graph::{Graph, Node, NodeId, ROOT_NODE_KEY};
use crate::id::IdGenerator;
use crate::mutate::Changeset;
use crate::step::StepType;

/// Inserts a node (and any nested children) under a parent.
pub fn add(
    graph: &Graph,
    seed: NodeSeed,
    relationships: Relationships,
    ids: &mut dyn IdGenerator,
) -> Result<(Graph, Changeset), GraphError> {
    let parent = relationships.parent.as_deref().unwrap_or(ROOT_NODE_KEY);
    let mut draft = Draft::new(graph);
    add_seed(&mut draft, seed, parent, relationships.before.as_deref(), ids)?;
    Ok(draft.finish())
}

pub(crate) fn add_seed(
    draft: &mut Draft,
    seed: NodeSeed,
    parent: &str,
    before: Option<&str>,
    ids: &mut dyn IdGenerator,
) -> Result<NodeId, GraphError> {
    if !draft.graph().contains(parent) {
        return Err(GraphError::NotFound(parent.to_string()));
    }

    let id = match seed.id {
        Some(id) => id,
        None => ids.generate(),
    };
    let node = Node {
        step: seed.step,
        data: sanitize_map(seed.data),
        edges: Vec::new(),
    };

    if node.is_step(StepType::Section) && !is_valid_section_position(draft.graph(), parent) {
        return Err(InvalidOperation::SectionOffMainFlow.into());
    }

    let index = match before {
        Some(before) => Some(
            draft
                .graph()
                .node(parent)?
                .edges
                .iter()
                .position(|edge| edge.as_str() == before)
                .ok_or_else(|| InvalidOperation::NotAChild {
                    id: before.to_string(),
                    parent: parent.to_string(),
                })?,
        ),
        None => None,
    };

    draft.insert_node(&id, node);
    draft.insert_edge(parent, index, &id)?;

    for child in seed.children {
        add_seed(draft, child, &id, None, ids)?;
    }
    Ok(id)
}

/// Adds an edge reference to an existing node.
///
/// The node becomes multi-parented: clones share, they never duplicate.
/// Validation is ordered and fatal; a failure returns no graph at all.
pub fn clone_node(
    graph: &Graph,
    id: &str,
    placement: Placement,
) -> Result<(Graph, Changeset), GraphError> {
    graph.node(id)?;

    let (owner, index) = resolve_placement(graph, &placement)?;

    if graph
        .node(&owner)?
        .edges
        .iter()
        .any(|edge| edge.as_str() == id)
    {
        return Err(InvalidOperation::AlreadyChildOf {
            id: id.to_string(),
            parent: owner,
        }
        .into());
    }
    if graph.is_reachable(id, &owner) {
        return Err(GraphError::Cycle {
            source_id: id.to_string(),
            target: owner,
        });
    }

    let node = graph.node(id)?;
    if node.is_step(StepType::Section) {
        return Err(InvalidOperation::CloneSection.into());
    }
    if node.is_step(StepType::ExternalPortal) {
        return Err(InvalidOperation::CloneExternalPortal.into());
    }

    let mut draft = Draft::new(graph);
    draft.insert_edge(&owner, index, id)?;
    Ok(draft.finish())
}

/// Resolves `to_parent`/`to_before` into a concrete owner and splice index.
fn resolve_placement(
    graph: &Graph,
    placement: &Placement,
) -> Result<(NodeId, Option<usize>), GraphError> {
    match (&placement.to_parent, &placement.to_before) {
        (None, None) => Ok((ROOT_NODE_KEY.to_string(), None)),
        (Some(parent), None) => {
            graph.node(parent)?;
            Ok((parent.clone(), None))
        }
        (parent, Some(before)) => {
            graph.node(before)?;
            let owner = match parent {
                Some(parent) => {
                    graph.node(parent)?;
                    parent.clone()
                }
                None => owner_of(graph, before)?,
            };
            let index = graph
                .node(&owner)?
                .edges
                .iter()
                .position(|edge| edge == before)
                .ok_or_else(|| InvalidOperation::NotAChild {
                    id: before.clone(),
                    parent: owner.clone(),
                })?;
            Ok((owner, Some(index)))
        }
    }
}

/// First parent of `id` in depth-first order.
fn owner_of(graph: &Graph, id: &str) -> Result<NodeId, GraphError> {
    for candidate in graph.ids_depth_first() {
        if let Some(node) = graph.get(&candidate) {
            if node.edges.iter().any(|edge| edge.as_str() == id) {
                return Ok(candidate);
            }
        }
    }
    Err(GraphError::IncompleteGraph(id.to_string()))
}

/// Relocates the edge `parent -> id` to a new position or parent.
pub fn move_node(
    graph: &Graph,
    id: &str,
    parent: &str,
    destination: Placement,
) -> Result<(Graph, Changeset), GraphError> {
    graph.node(id)?;
    graph.node(parent)?;
    let to_parent = destination
        .to_parent
        .as_deref()
        .unwrap_or(parent)
        .to_string();
    graph.node(&to_parent)?;

    if to_parent != parent
        && graph
            .node(&to_parent)?
            .edges
            .iter()
            .any(|edge| edge.as_str() == id)
    {
        return Err(InvalidOperation::AlreadyChildOf {
            id: id.to_string(),
            parent: to_parent,
        }
        .into());
    }
    if graph.node(id)?.is_step(StepType::Section) && !is_valid_section_position(graph, &to_parent) {
        return Err(InvalidOperation::SectionOffMainFlow.into());
    }
    if to_parent != parent && graph.is_reachable(id, &to_parent) {
        return Err(GraphError::Cycle {
            source_id: id.to_string(),
            target: to_parent,
        });
    }

    let mut draft = Draft::new(graph);
    draft.remove_edge(parent, id)?;
    let index = match &destination.to_before {
        Some(before) => Some(
            draft
                .graph()
                .node(&to_parent)?
                .edges
                .iter()
                .position(|edge| edge == before)
                .ok_or_else(|| InvalidOperation::NotAChild {
                    id: before.clone(),
                    parent: to_parent.clone(),
                })?,
        ),
        None => None,
    };
    draft.insert_edge(&to_parent, index, id)?;
    Ok(draft.finish())
}

/// Removes the edge `parent -> id`.
///
/// When that was the last reference, the newly orphaned subtree is swept
/// recursively; nodes still referenced elsewhere survive.
pub fn remove(graph: &Graph, id: &str, parent: &str) -> Result<(Graph, Changeset), GraphError> {
    graph.node(id)?;
    graph.node(parent)?;
    let mut draft = Draft::new(graph);
    remove_rec(&mut draft, id, parent)?;
    Ok(draft.finish())
}

pub(crate) fn remove_rec(draft: &mut Draft, id: &str, parent: &str) -> Result<(), GraphError> {
    draft.remove_edge(parent, id)?;
    if draft.graph().parents_of(id).is_empty() {
        let children = draft.graph().node(id)?.edges.clone();
        for child in children {
            remove_rec(draft, &child, id)?;
        }
        draft.remove_node(id)?;
    }
    Ok(())
}
