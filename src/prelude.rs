//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the
//! keiro crate. Import this module to get access to the core functionality
//! without having to import each item individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use keiro::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let graph = Graph::new();
//! let mut ids = RandomIds;
//! let (graph, changeset) =
//!     add(&graph, NodeSeed::with_step(StepType::Notice), Relationships::default(), &mut ids)?;
//! assert_eq!(changeset.apply(&Graph::new())?, graph);
//! # Ok(())
//! # }
//! ```

// Graph data model
pub use crate::graph::{Graph, Node, NodeId, ROOT_NODE_KEY};
pub use crate::step::{StepMeta, StepType};

// Mutation operations and the changeset vocabulary
pub use crate::mutate::{
    Changeset, NodeSeed, Op, Path, Placement, Relationships, UpdateOptions, add, clone_node,
    make_unique, move_node, remove, update,
};

// Id generation strategies
pub use crate::id::{IdGenerator, RandomIds, SequentialIds};

// Flattening and the export artifact
pub use crate::flatten::artifact::FlattenedArtifact;
pub use crate::flatten::{
    FetchedFlow, Flattener, FlowFetcher, NoExternalFlows, PublishedSnapshot, ResolveMode,
};

// Validation
pub use crate::validate::{
    RuleReport, RuleStatus, SchemaCategory, SchemaValues, StaticSchemaValues, Validator,
};

// Error types
pub use crate::error::{
    ArtifactError, FlattenError, GraphError, InvalidOperation, SchemaValuesError,
};

// Commonly used serde_json items: node data payloads are JSON values
pub use serde_json::{Map, Value, json};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
