//! Deep copy of a referenced subtree, preserving intentional sharing.

use super::draft::Draft;
use crate::error::{GraphError, InvalidOperation};
use crate::graph::{Graph, Node, NodeId};
use crate::id::IdGenerator;
use crate::mutate::Changeset;
use ahash::AHashMap;

/// Deep-copies `id` and every descendant, appending the new top copy as an
/// additional child of `parent`. Originals are untouched.
///
/// Descendants that are themselves clones (more than one parent in the
/// pre-mutation graph) are preserved as shared references, not duplicated:
/// sharing is intentional, and copying through it would fan out without
/// bound.
pub fn make_unique(
    graph: &Graph,
    id: &str,
    parent: &str,
    ids: &mut dyn IdGenerator,
) -> Result<(Graph, Changeset), GraphError> {
    let source = graph.node(id)?;
    let parent_node = graph.node(parent)?;
    if !parent_node.edges.iter().any(|edge| edge.as_str() == id) {
        return Err(InvalidOperation::NotAChild {
            id: id.to_string(),
            parent: parent.to_string(),
        }
        .into());
    }

    // Pass 1: mint an id for every node that will be copied, in traversal
    // order. The top node is always copied; shared descendants are not.
    let mut minted: AHashMap<NodeId, NodeId> = AHashMap::new();
    let new_top = ids.generate();
    minted.insert(id.to_string(), new_top.clone());
    for child in &source.edges {
        mint(graph, child, ids, &mut minted);
    }

    // Pass 2: attach the new top id, then emit one copy per minted node in
    // traversal order, each with edges rewritten to the new ids.
    let mut draft = Draft::new(graph);
    draft.insert_edge(parent, None, &new_top)?;
    emit(graph, &mut draft, id, &minted)?;
    Ok(draft.finish())
}

fn mint(
    graph: &Graph,
    id: &str,
    ids: &mut dyn IdGenerator,
    minted: &mut AHashMap<NodeId, NodeId>,
) {
    if graph.is_clone(id) || minted.contains_key(id) {
        return;
    }
    minted.insert(id.to_string(), ids.generate());
    if let Some(node) = graph.get(id) {
        for child in &node.edges {
            mint(graph, child, ids, minted);
        }
    }
}

fn emit(
    graph: &Graph,
    draft: &mut Draft,
    id: &str,
    minted: &AHashMap<NodeId, NodeId>,
) -> Result<(), GraphError> {
    let Some(new_id) = minted.get(id) else {
        // Shared node: the copy keeps referencing the original.
        return Ok(());
    };
    let node = graph.node(id)?;
    let edges = node
        .edges
        .iter()
        .map(|edge| minted.get(edge).cloned().unwrap_or_else(|| edge.clone()))
        .collect();
    draft.insert_node(
        new_id,
        Node {
            step: node.step,
            data: node.data.clone(),
            edges,
        },
    );
    for child in &node.edges {
        emit(graph, draft, child, minted)?;
    }
    Ok(())
}
