//! Common test utilities for building flow graphs and collaborators.
use keiro::prelude::*;
use std::cell::RefCell;

/// Builds a graph from its JSON wire representation.
#[allow(dead_code)]
pub fn graph_from_json(value: Value) -> Graph {
    serde_json::from_value(value).expect("valid graph JSON")
}

/// Two sibling notices on the root line: `_root -> [a, b]`.
#[allow(dead_code)]
pub fn two_sibling_graph() -> Graph {
    graph_from_json(json!({
        "_root": { "edges": ["a", "b"] },
        "a": { "type": StepType::Notice.code() },
        "b": { "type": StepType::Notice.code() },
    }))
}

/// A question with two answers: `_root -> q -> [yes, no]`.
#[allow(dead_code)]
pub fn question_graph() -> Graph {
    graph_from_json(json!({
        "_root": { "edges": ["q"] },
        "q": {
            "type": StepType::Question.code(),
            "data": { "text": "Is the property listed?" },
            "edges": ["yes", "no"],
        },
        "yes": { "type": StepType::Answer.code(), "data": { "text": "Yes" } },
        "no": { "type": StepType::Answer.code(), "data": { "text": "No" } },
    }))
}

/// The shared-subtree fixture: `clone` is referenced from both the root line
/// and `foo`, and owns `c1`/`c2`.
#[allow(dead_code)]
pub fn shared_subtree_graph() -> Graph {
    graph_from_json(json!({
        "_root": { "edges": ["foo", "clone"] },
        "foo": { "type": StepType::Folder.code(), "edges": ["clone"] },
        "clone": { "type": StepType::Question.code(), "edges": ["c1", "c2"] },
        "c1": { "type": StepType::Answer.code(), "data": { "text": "A" } },
        "c2": { "type": StepType::Answer.code(), "data": { "text": "B" } },
    }))
}

/// In-memory flow source that records every fetch it serves.
#[allow(dead_code)]
pub struct StubFlows {
    flows: Vec<(String, FetchedFlow)>,
    pub fetched: RefCell<Vec<String>>,
}

#[allow(dead_code)]
impl StubFlows {
    pub fn new() -> Self {
        StubFlows {
            flows: Vec::new(),
            fetched: RefCell::new(Vec::new()),
        }
    }

    pub fn with_draft(mut self, flow_id: &str, draft: Graph) -> Self {
        self.flows.push((
            flow_id.to_string(),
            FetchedFlow {
                slug: flow_id.to_string(),
                team_slug: "testing".to_string(),
                draft,
                published: None,
            },
        ));
        self
    }

    pub fn with_published(mut self, flow_id: &str, graph: Graph, version: u64) -> Self {
        self.flows.push((
            flow_id.to_string(),
            FetchedFlow {
                slug: flow_id.to_string(),
                team_slug: "testing".to_string(),
                draft: graph.clone(),
                published: Some(PublishedSnapshot {
                    id: version,
                    graph,
                    published_at: "2024-05-01T10:00:00Z".to_string(),
                    published_by: "editor-1".to_string(),
                    summary: Some("Latest changes".to_string()),
                }),
            },
        ));
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetched.borrow().len()
    }
}

impl FlowFetcher for StubFlows {
    fn fetch_flow(&self, flow_id: &str) -> std::result::Result<FetchedFlow, FlattenError> {
        self.fetched.borrow_mut().push(flow_id.to_string());
        self.flows
            .iter()
            .find(|(id, _)| id == flow_id)
            .map(|(_, flow)| flow.clone())
            .ok_or_else(|| FlattenError::Fetch {
                flow_id: flow_id.to_string(),
                message: "unknown flow".to_string(),
            })
    }
}

/// Schema collaborator that always fails, for error propagation tests.
#[allow(dead_code)]
pub struct BrokenSchema;

impl SchemaValues for BrokenSchema {
    fn valid_values(
        &self,
        category: SchemaCategory,
    ) -> std::result::Result<Vec<String>, SchemaValuesError> {
        Err(SchemaValuesError {
            category: category.to_string(),
            message: "schema service unavailable".to_string(),
        })
    }
}
