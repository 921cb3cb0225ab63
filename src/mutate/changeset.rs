use crate::error::{GraphError, InvalidOperation};
use crate::graph::{Graph, Node, NodeId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Addresses the part of a graph an [`Op`] touches.
///
/// Serializes as a segment array (`["a"]`, `["a","edges"]`,
/// `["a","data","fn"]`) so any sync or undo layer can consume it without
/// knowing this crate's types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub enum Path {
    /// A whole node entry in the graph map.
    Node { node: NodeId },
    /// A node's ordered `edges` list.
    Edges { node: NodeId },
    /// A single field of a node's `data` payload.
    Data { node: NodeId, field: String },
}

impl Path {
    pub fn node_id(&self) -> &str {
        match self {
            Path::Node { node } | Path::Edges { node } | Path::Data { node, .. } => node,
        }
    }
}

impl From<Path> for Vec<String> {
    fn from(path: Path) -> Vec<String> {
        match path {
            Path::Node { node } => vec![node],
            Path::Edges { node } => vec![node, "edges".to_string()],
            Path::Data { node, field } => vec![node, "data".to_string(), field],
        }
    }
}

impl TryFrom<Vec<String>> for Path {
    type Error = String;

    fn try_from(segments: Vec<String>) -> Result<Self, Self::Error> {
        let mut parts = segments.into_iter();
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(node), None, _, _) => Ok(Path::Node { node }),
            (Some(node), Some(list), None, _) if list == "edges" => Ok(Path::Edges { node }),
            (Some(node), Some(map), Some(field), None) if map == "data" => {
                Ok(Path::Data { node, field })
            }
            _ => Err("unrecognized op path".to_string()),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Path::Node { node } => write!(f, "{}", node),
            Path::Edges { node } => write!(f, "{}/edges", node),
            Path::Data { node, field } => write!(f, "{}/data/{}", node, field),
        }
    }
}

/// One minimal patch operation.
///
/// The tagged serialization (`op` field) uses a generic vocabulary:
/// `list-insert`/`list-delete` for edge lists, `object-insert`/
/// `object-delete`/`object-replace` for nodes and data fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Op {
    ListInsert {
        path: Path,
        index: usize,
        value: NodeId,
    },
    ListDelete {
        path: Path,
        index: usize,
        value: NodeId,
    },
    ObjectInsert {
        path: Path,
        value: Value,
    },
    ObjectDelete {
        path: Path,
        old_value: Value,
    },
    ObjectReplace {
        path: Path,
        old_value: Value,
        new_value: Value,
    },
}

/// Ordered list of ops describing exactly what one mutation changed.
///
/// Recorded as edits are applied, never diffed after the fact, so replaying
/// it against the pre-mutation snapshot reproduces the post-mutation graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Changeset(Vec<Op>);

impl Changeset {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Op> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Op] {
        &self.0
    }

    pub fn into_ops(self) -> Vec<Op> {
        self.0
    }

    pub(crate) fn push(&mut self, op: Op) {
        self.0.push(op);
    }

    /// Replays the recorded ops against a pre-mutation snapshot.
    pub fn apply(&self, graph: &Graph) -> Result<Graph, GraphError> {
        let mut next = graph.clone();
        for op in &self.0 {
            apply_op(&mut next, op)?;
        }
        Ok(next)
    }
}

impl From<Vec<Op>> for Changeset {
    fn from(ops: Vec<Op>) -> Self {
        Changeset(ops)
    }
}

impl<'a> IntoIterator for &'a Changeset {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn replay_error(path: &Path, message: &str) -> GraphError {
    InvalidOperation::Replay {
        message: format!("{} at '{}'", message, path),
    }
    .into()
}

fn apply_op(graph: &mut Graph, op: &Op) -> Result<(), GraphError> {
    match op {
        Op::ListInsert { path, index, value } => {
            let Path::Edges { node } = path else {
                return Err(replay_error(path, "list op on a non-list path"));
            };
            let edges = &mut graph.node_mut(node)?.edges;
            if *index > edges.len() {
                return Err(replay_error(path, "insert index out of range"));
            }
            edges.insert(*index, value.clone());
        }
        Op::ListDelete { path, index, value } => {
            let Path::Edges { node } = path else {
                return Err(replay_error(path, "list op on a non-list path"));
            };
            let edges = &mut graph.node_mut(node)?.edges;
            if edges.get(*index).map(String::as_str) != Some(value.as_str()) {
                return Err(replay_error(path, "deleted value does not match"));
            }
            edges.remove(*index);
        }
        Op::ObjectInsert { path, value } => write_object(graph, path, value)?,
        Op::ObjectReplace {
            path, new_value, ..
        } => write_object(graph, path, new_value)?,
        Op::ObjectDelete { path, .. } => match path {
            Path::Node { node } => {
                graph.node(node)?;
                graph.remove(node);
            }
            Path::Data { node, field } => {
                graph.node_mut(node)?.data.remove(field);
            }
            Path::Edges { .. } => {
                return Err(replay_error(path, "object op on a list path"));
            }
        },
    }
    Ok(())
}

fn write_object(graph: &mut Graph, path: &Path, value: &Value) -> Result<(), GraphError> {
    match path {
        Path::Node { node } => {
            let parsed: Node = serde_json::from_value(value.clone())
                .map_err(|e| replay_error(path, &format!("bad node payload ({})", e)))?;
            graph.insert(node.clone(), parsed);
        }
        Path::Data { node, field } => {
            graph
                .node_mut(node)?
                .data
                .insert(field.clone(), value.clone());
        }
        Path::Edges { .. } => {
            return Err(replay_error(path, "object op on a list path"));
        }
    }
    Ok(())
}

/// Serializes a node the same way the graph wire format does.
pub(crate) fn node_value(node: &Node) -> Value {
    let mut object = Map::new();
    if let Some(step) = node.step {
        object.insert("type".to_string(), Value::from(step.code()));
    }
    if !node.data.is_empty() {
        object.insert("data".to_string(), Value::Object(node.data.clone()));
    }
    if !node.edges.is_empty() {
        object.insert(
            "edges".to_string(),
            Value::Array(node.edges.iter().map(|e| Value::String(e.clone())).collect()),
        );
    }
    Value::Object(object)
}
