use super::changeset::{Changeset, Op, Path, node_value};
use crate::error::{GraphError, InvalidOperation};
use crate::graph::{Graph, Node};
use serde_json::Value;

/// Working copy of a graph that records every edit as it is applied.
///
/// All mutation operations funnel their edits through this type, which keeps
/// the changeset an exact record of the mutation rather than a structural
/// equivalent of it.
pub(crate) struct Draft {
    graph: Graph,
    ops: Changeset,
}

impl Draft {
    pub fn new(graph: &Graph) -> Self {
        Draft {
            graph: graph.clone(),
            ops: Changeset::default(),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn finish(self) -> (Graph, Changeset) {
        (self.graph, self.ops)
    }

    /// Splices `child` into `parent.edges` at `index`, appending when `None`.
    pub fn insert_edge(
        &mut self,
        parent: &str,
        index: Option<usize>,
        child: &str,
    ) -> Result<usize, GraphError> {
        let node = self.graph.node_mut(parent)?;
        let index = index.unwrap_or(node.edges.len()).min(node.edges.len());
        node.edges.insert(index, child.to_string());
        self.ops.push(Op::ListInsert {
            path: Path::Edges {
                node: parent.to_string(),
            },
            index,
            value: child.to_string(),
        });
        Ok(index)
    }

    /// Removes the edge `parent -> child`.
    pub fn remove_edge(&mut self, parent: &str, child: &str) -> Result<usize, GraphError> {
        let node = self.graph.node_mut(parent)?;
        let index = node
            .edges
            .iter()
            .position(|edge| edge.as_str() == child)
            .ok_or_else(|| InvalidOperation::NotAChild {
                id: child.to_string(),
                parent: parent.to_string(),
            })?;
        node.edges.remove(index);
        self.ops.push(Op::ListDelete {
            path: Path::Edges {
                node: parent.to_string(),
            },
            index,
            value: child.to_string(),
        });
        Ok(index)
    }

    pub fn insert_node(&mut self, id: &str, node: Node) {
        self.ops.push(Op::ObjectInsert {
            path: Path::Node {
                node: id.to_string(),
            },
            value: node_value(&node),
        });
        self.graph.insert(id.to_string(), node);
    }

    pub fn remove_node(&mut self, id: &str) -> Result<(), GraphError> {
        let old_value = node_value(self.graph.node(id)?);
        self.graph.remove(id);
        self.ops.push(Op::ObjectDelete {
            path: Path::Node {
                node: id.to_string(),
            },
            old_value,
        });
        Ok(())
    }

    /// Writes one data field, recording an op only when the value changed.
    pub fn set_data(&mut self, id: &str, field: &str, value: Value) -> Result<(), GraphError> {
        let node = self.graph.node_mut(id)?;
        match node.data.get(field).cloned() {
            Some(old) if old == value => {}
            Some(old) => {
                node.data.insert(field.to_string(), value.clone());
                self.ops.push(Op::ObjectReplace {
                    path: Path::Data {
                        node: id.to_string(),
                        field: field.to_string(),
                    },
                    old_value: old,
                    new_value: value,
                });
            }
            None => {
                node.data.insert(field.to_string(), value.clone());
                self.ops.push(Op::ObjectInsert {
                    path: Path::Data {
                        node: id.to_string(),
                        field: field.to_string(),
                    },
                    value,
                });
            }
        }
        Ok(())
    }

    /// Deletes one data field if present.
    pub fn delete_data(&mut self, id: &str, field: &str) -> Result<(), GraphError> {
        let node = self.graph.node_mut(id)?;
        if let Some(old_value) = node.data.remove(field) {
            self.ops.push(Op::ObjectDelete {
                path: Path::Data {
                    node: id.to_string(),
                    field: field.to_string(),
                },
                old_value,
            });
        }
        Ok(())
    }
}
