//! Pure mutation operations over an immutable graph snapshot.
//!
//! Every operation takes a graph reference plus arguments and returns a new
//! graph together with the ordered changeset of ops that were applied. The
//! caller's graph is never touched, and a failed operation returns no graph
//! at all. This purity is what makes a changeset a trustworthy, replayable
//! description of an edit for any consuming synchronization or undo layer;
//! serializing mutations per graph version remains the caller's job.

mod changeset;
mod draft;
mod ops;
mod unique;
mod update;

pub use changeset::{Changeset, Op, Path};
pub use ops::{add, clone_node, move_node, remove};
pub use unique::make_unique;
pub use update::{UpdateOptions, update};

pub(crate) use update::sanitize_map;

use crate::graph::{Graph, NodeId, ROOT_NODE_KEY};
use crate::step::StepType;
use serde_json::{Map, Value};

/// Where a newly created node attaches.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    /// Parent to attach under; the root line when absent.
    pub parent: Option<NodeId>,
    /// Older sibling to insert before instead of appending.
    pub before: Option<NodeId>,
}

/// Target position for [`clone_node`] and [`move_node`].
#[derive(Debug, Clone, Default)]
pub struct Placement {
    /// Destination parent; the root line when absent.
    pub to_parent: Option<NodeId>,
    /// Splice immediately before this sibling.
    pub to_before: Option<NodeId>,
}

impl Placement {
    pub fn under(parent: &str) -> Self {
        Placement {
            to_parent: Some(parent.to_string()),
            to_before: None,
        }
    }

    pub fn before(sibling: &str) -> Self {
        Placement {
            to_parent: None,
            to_before: Some(sibling.to_string()),
        }
    }
}

/// Recursive creation payload for [`add`] and child reconciliation.
#[derive(Debug, Clone, Default)]
pub struct NodeSeed {
    /// Explicit id; minted by the injected generator when absent.
    pub id: Option<NodeId>,
    pub step: Option<StepType>,
    pub data: Map<String, Value>,
    pub children: Vec<NodeSeed>,
}

impl NodeSeed {
    pub fn with_step(step: StepType) -> Self {
        NodeSeed {
            step: Some(step),
            ..Default::default()
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    pub fn child(mut self, child: NodeSeed) -> Self {
        self.children.push(child);
        self
    }
}

/// Sections may only sit on the root line, or in the first level of a Folder
/// that is itself on the root line.
pub(crate) fn is_valid_section_position(graph: &Graph, parent: &str) -> bool {
    parent == ROOT_NODE_KEY
        || (graph
            .get(parent)
            .is_some_and(|node| node.is_step(StepType::Folder))
            && graph.root_edges().iter().any(|edge| edge.as_str() == parent))
}
