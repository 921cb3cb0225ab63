//! The arena-style graph store: every node lives in one flat map keyed by id.
//!
//! "Ownership" is simply appearing in some node's `edges` list; a node with
//! more than one parent is a clone, shared by design. Reclaiming unreferenced
//! nodes is an explicit reachability sweep from the root, never reference
//! counting.

use crate::error::GraphError;
use crate::step::StepType;
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the distinguished root node; its edges are the top-level flow line.
pub const ROOT_NODE_KEY: &str = "_root";

pub type NodeId = String;

/// A single addressable step in a flow graph.
///
/// `data` is a free-form payload whose meaning depends on the step type
/// (question text, condition expressions, target field names, ...). Edge
/// order is semantically meaningful, e.g. answer display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub step: Option<StepType>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<NodeId>,
}

impl Node {
    pub fn with_step(step: StepType) -> Self {
        Node {
            step: Some(step),
            ..Default::default()
        }
    }

    pub fn is_step(&self, step: StepType) -> bool {
        self.step == Some(step)
    }

    /// String-valued data field, if present.
    pub fn data_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }

    /// Boolean data field; absent fields read as `false`.
    pub fn data_flag(&self, field: &str) -> bool {
        self.data
            .get(field)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// A complete flow graph: `id -> Node` with a `_root` entry.
///
/// Serializes flat, exactly as the editor wire format stores it:
/// `{"_root": {"edges": [...]}, "abc123XYZ0": {"type": 100, ...}, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(flatten)]
    nodes: AHashMap<NodeId, Node>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// An empty graph containing only the root node.
    pub fn new() -> Self {
        let mut nodes = AHashMap::new();
        nodes.insert(ROOT_NODE_KEY.to_string(), Node::default());
        Graph { nodes }
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Like [`Graph::get`], but a missing id is a [`GraphError::NotFound`].
    pub fn node(&self, id: &str) -> Result<&Node, GraphError> {
        self.nodes
            .get(id)
            .ok_or_else(|| GraphError::NotFound(id.to_string()))
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Result<&mut Node, GraphError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::NotFound(id.to_string()))
    }

    pub(crate) fn insert(&mut self, id: NodeId, node: Node) {
        self.nodes.insert(id, node);
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<Node> {
        self.nodes.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter()
    }

    /// The top-level flow line.
    pub fn root_edges(&self) -> &[NodeId] {
        self.nodes
            .get(ROOT_NODE_KEY)
            .map(|node| node.edges.as_slice())
            .unwrap_or(&[])
    }

    /// All non-root nodes of the given step type.
    pub fn steps(&self, step: StepType) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes
            .iter()
            .filter(move |(id, node)| id.as_str() != ROOT_NODE_KEY && node.step == Some(step))
    }

    /// Ids of every node whose edges reference `id`.
    pub fn parents_of(&self, id: &str) -> Vec<&NodeId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.edges.iter().any(|edge| edge.as_str() == id))
            .map(|(parent, _)| parent)
            .collect()
    }

    /// Whether `id` is referenced by more than one parent.
    pub fn is_clone(&self, id: &str) -> bool {
        let mut count = 0;
        for node in self.nodes.values() {
            if node.edges.iter().any(|edge| edge.as_str() == id) {
                count += 1;
                // Early exit, no need to scan the whole graph
                if count > 1 {
                    return true;
                }
            }
        }
        false
    }

    /// Whether `to` can be reached from `from` by following edges.
    /// Every node is trivially reachable from itself.
    pub fn is_reachable(&self, from: &str, to: &str) -> bool {
        if from == to {
            return true;
        }
        let mut seen: AHashSet<&str> = AHashSet::new();
        let mut stack: Vec<&str> = vec![from];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if id == to {
                return true;
            }
            if let Some(node) = self.nodes.get(id) {
                for edge in &node.edges {
                    stack.push(edge.as_str());
                }
            }
        }
        false
    }

    /// Every reachable node id in depth-first order, edges left-to-right.
    /// Clones appear at their first visited position only.
    pub fn ids_depth_first(&self) -> Vec<NodeId> {
        let mut ordered: Vec<NodeId> = Vec::new();
        let mut seen: AHashSet<&str> = AHashSet::new();
        let mut stack: Vec<&str> = vec![ROOT_NODE_KEY];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            ordered.push(id.to_string());
            if let Some(node) = self.nodes.get(id) {
                // The stack is last-in-first-out, so push edges backwards to
                // visit them left-to-right.
                for edge in node.edges.iter().rev() {
                    if !seen.contains(edge.as_str()) {
                        stack.push(edge.as_str());
                    }
                }
            }
        }
        ordered
    }

    /// Depth-first structural check from the root: every edge target must
    /// exist ([`GraphError::NotFound`]) and every stored node must be visited
    /// ([`GraphError::IncompleteGraph`]).
    pub fn validate_structure(&self) -> Result<(), GraphError> {
        if !self.nodes.contains_key(ROOT_NODE_KEY) {
            return Err(GraphError::NotFound(ROOT_NODE_KEY.to_string()));
        }
        let mut seen: AHashSet<&str> = AHashSet::new();
        let mut stack: Vec<&str> = vec![ROOT_NODE_KEY];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            let node = self
                .nodes
                .get(id)
                .ok_or_else(|| GraphError::NotFound(id.to_string()))?;
            for edge in node.edges.iter().rev() {
                stack.push(edge.as_str());
            }
        }
        if seen.len() != self.nodes.len() {
            let mut orphans: Vec<&NodeId> = self
                .nodes
                .keys()
                .filter(|id| !seen.contains(id.as_str()))
                .collect();
            orphans.sort();
            if let Some(first) = orphans.first() {
                return Err(GraphError::IncompleteGraph((*first).clone()));
            }
        }
        Ok(())
    }

    /// Whether any edge path returns to an ancestor.
    pub fn is_cyclic(&self) -> bool {
        let mut visited: AHashSet<&str> = AHashSet::new();
        let mut in_stack: AHashSet<&str> = AHashSet::new();
        self.nodes
            .keys()
            .any(|id| self.cyclic_from(id, &mut visited, &mut in_stack))
    }

    fn cyclic_from<'a>(
        &'a self,
        id: &'a str,
        visited: &mut AHashSet<&'a str>,
        in_stack: &mut AHashSet<&'a str>,
    ) -> bool {
        if in_stack.contains(id) {
            return true;
        }
        if !visited.insert(id) {
            return false;
        }
        in_stack.insert(id);
        if let Some(node) = self.nodes.get(id) {
            for edge in &node.edges {
                if self.cyclic_from(edge, visited, in_stack) {
                    return true;
                }
            }
        }
        in_stack.remove(id);
        false
    }
}
