use thiserror::Error;

/// Structural errors raised by graph queries and mutation operations.
///
/// A mutation that returns one of these has touched nothing: the caller's
/// graph snapshot is unchanged and no partial result exists.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("node '{0}' not found in graph")]
    NotFound(String),

    #[error("node '{0}' is not reachable from '_root'")]
    IncompleteGraph(String),

    #[error("attaching '{source_id}' under '{target}' would create a cycle")]
    Cycle { source_id: String, target: String },

    #[error(transparent)]
    InvalidOperation(#[from] InvalidOperation),
}

/// Mutation requests that are well-formed but not allowed on this graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidOperation {
    #[error("'{id}' is already a child of '{parent}'")]
    AlreadyChildOf { id: String, parent: String },

    #[error("Section steps cannot be cloned")]
    CloneSection,

    #[error("nested flow references cannot be cloned")]
    CloneExternalPortal,

    #[error("'{id}' is not a child of '{parent}'")]
    NotAChild { id: String, parent: String },

    #[error("Sections can only sit on the main flow line or in a top-level Folder")]
    SectionOffMainFlow,

    #[error("cannot replay changeset: {message}")]
    Replay { message: String },
}

/// Errors raised while inlining nested flows into a host graph.
///
/// An incomplete flatten risks publishing a broken service, so every failure
/// here is surfaced by name and never swallowed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlattenError {
    #[error("portal node '{node_id}' does not reference a flow id")]
    MissingFlowReference { node_id: String },

    #[error("flow '{team_slug}/{slug}' must be published before it can be flattened")]
    Unpublished { team_slug: String, slug: String },

    #[error("cyclic portal reference: {}", .chain.join(" -> "))]
    CyclicPortal { chain: Vec<String> },

    #[error("failed to fetch flow '{flow_id}': {message}")]
    Fetch { flow_id: String, message: String },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Failure of the injected schema-values collaborator.
///
/// The only error the validator can raise; rule outcomes themselves are data.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("failed to load '{category}' schema values: {message}")]
pub struct SchemaValuesError {
    pub category: String,
    pub message: String,
}

/// Errors raised while saving or loading a flattened artifact.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("could not access artifact file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("artifact codec error: {0}")]
    Codec(String),
}
