//! Inlines externally-referenced flows into one portal-free graph.
//!
//! Flattening is the only blocking part of the engine: resolving a nested
//! flow means calling out to a [`FlowFetcher`] collaborator. Each unique flow
//! id is fetched at most once per pass, cyclic portal references are rejected
//! by name, and any failure returns an error with no partial graph.
//!
//! Every node of a fetched flow is relabelled `"{flowId}:{id}"` before it is
//! spliced in, which keeps ids collision-free against the host graph
//! (generated node ids never contain `:`).

pub mod artifact;

use crate::error::FlattenError;
use crate::graph::{Graph, Node, NodeId, ROOT_NODE_KEY};
use crate::step::StepType;
use ahash::AHashMap;
use serde_json::{Map, Value};

/// Which data source nested flows are resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Use draft data for every nested flow, published or not.
    Draft,
    /// Require the latest published snapshot of every nested flow.
    Published,
}

/// Latest published snapshot of a flow.
#[derive(Debug, Clone)]
pub struct PublishedSnapshot {
    pub id: u64,
    pub graph: Graph,
    pub published_at: String,
    pub published_by: String,
    pub summary: Option<String>,
}

/// A flow as returned by the fetch collaborator.
#[derive(Debug, Clone)]
pub struct FetchedFlow {
    pub slug: String,
    pub team_slug: String,
    pub draft: Graph,
    pub published: Option<PublishedSnapshot>,
}

/// Collaborator that resolves a flow id to its stored data.
///
/// Retry, timeout and cancellation policy live in the implementation; a
/// cancelled or failed fetch surfaces as [`FlattenError::Fetch`].
pub trait FlowFetcher {
    fn fetch_flow(&self, flow_id: &str) -> Result<FetchedFlow, FlattenError>;
}

/// Fetcher for flows known to contain no portals; any fetch fails.
pub struct NoExternalFlows;

impl FlowFetcher for NoExternalFlows {
    fn fetch_flow(&self, flow_id: &str) -> Result<FetchedFlow, FlattenError> {
        Err(FlattenError::Fetch {
            flow_id: flow_id.to_string(),
            message: "no external flow source configured".to_string(),
        })
    }
}

pub struct Flattener<'a, F: FlowFetcher> {
    fetcher: &'a F,
}

impl<'a, F: FlowFetcher> Flattener<'a, F> {
    pub fn new(fetcher: &'a F) -> Self {
        Flattener { fetcher }
    }

    /// Produces a portal-free copy of `graph`.
    ///
    /// Each external-portal node becomes a Folder whose edges are the inlined
    /// flow's root line; inlined nodes carry provenance stamps. The result is
    /// derived and transient: recompute it per validation or export pass,
    /// never mutate it.
    pub fn flatten(&self, graph: &Graph, mode: ResolveMode) -> Result<Graph, FlattenError> {
        let mut pass = FlattenPass {
            fetcher: self.fetcher,
            mode,
            out: Graph::new(),
            inlined: AHashMap::new(),
            in_flight: Vec::new(),
        };
        pass.merge(graph, None)?;
        Ok(pass.out)
    }
}

/// Provenance carried by every node inlined from a nested flow.
#[derive(Debug, Clone)]
struct Provenance {
    text: String,
    published: Option<PublishedMeta>,
}

#[derive(Debug, Clone)]
struct PublishedMeta {
    id: u64,
    published_at: String,
    published_by: String,
    summary: Option<String>,
}

struct Scope {
    flow_id: String,
    stamp: Provenance,
}

struct FlattenPass<'a, F: FlowFetcher> {
    fetcher: &'a F,
    mode: ResolveMode,
    out: Graph,
    /// Flow id -> relabelled root line of the already-inlined copy.
    inlined: AHashMap<String, (Vec<NodeId>, Provenance)>,
    /// Fetch stack, for cyclic reference detection.
    in_flight: Vec<String>,
}

impl<F: FlowFetcher> FlattenPass<'_, F> {
    fn merge(&mut self, graph: &Graph, scope: Option<&Scope>) -> Result<(), FlattenError> {
        for (id, node) in graph.iter() {
            // A fetched flow's root was already captured as the portal's edges.
            if scope.is_some() && id == ROOT_NODE_KEY {
                continue;
            }
            let new_id = relabel(scope, id);

            if node.is_step(StepType::ExternalPortal) {
                let flow_id = node
                    .data_str("flowId")
                    .ok_or_else(|| FlattenError::MissingFlowReference {
                        node_id: new_id.clone(),
                    })?
                    .to_string();
                let (edges, provenance) = self.inline_flow(&flow_id)?;
                let mut data = Map::new();
                data.insert("text".to_string(), Value::String(provenance.text.clone()));
                stamp(&mut data, &provenance);
                self.out.insert(
                    new_id,
                    Node {
                        step: Some(StepType::Folder),
                        data,
                        edges,
                    },
                );
            } else {
                let mut copy = node.clone();
                copy.edges = node.edges.iter().map(|edge| relabel(scope, edge)).collect();
                if let Some(scope) = scope {
                    stamp(&mut copy.data, &scope.stamp);
                }
                self.out.insert(new_id, copy);
            }
        }
        Ok(())
    }

    /// Fetches and merges one nested flow, memoized per pass.
    fn inline_flow(&mut self, flow_id: &str) -> Result<(Vec<NodeId>, Provenance), FlattenError> {
        if let Some(hit) = self.inlined.get(flow_id) {
            return Ok(hit.clone());
        }
        if self.in_flight.iter().any(|active| active == flow_id) {
            let mut chain = self.in_flight.clone();
            chain.push(flow_id.to_string());
            return Err(FlattenError::CyclicPortal { chain });
        }

        let fetched = self.fetcher.fetch_flow(flow_id)?;
        let (graph, published) = match self.mode {
            ResolveMode::Published => {
                let snapshot =
                    fetched
                        .published
                        .as_ref()
                        .ok_or_else(|| FlattenError::Unpublished {
                            team_slug: fetched.team_slug.clone(),
                            slug: fetched.slug.clone(),
                        })?;
                (
                    &snapshot.graph,
                    Some(PublishedMeta {
                        id: snapshot.id,
                        published_at: snapshot.published_at.clone(),
                        published_by: snapshot.published_by.clone(),
                        summary: snapshot.summary.clone(),
                    }),
                )
            }
            ResolveMode::Draft => (&fetched.draft, None),
        };
        let provenance = Provenance {
            text: format!("{}/{}", fetched.team_slug, fetched.slug),
            published,
        };
        let scope = Scope {
            flow_id: flow_id.to_string(),
            stamp: provenance.clone(),
        };

        self.in_flight.push(flow_id.to_string());
        self.merge(graph, Some(&scope))?;
        self.in_flight.pop();

        let edges: Vec<NodeId> = graph
            .root_edges()
            .iter()
            .map(|edge| relabel(Some(&scope), edge))
            .collect();
        self.inlined
            .insert(flow_id.to_string(), (edges.clone(), provenance.clone()));
        Ok((edges, provenance))
    }
}

fn relabel(scope: Option<&Scope>, id: &str) -> NodeId {
    match scope {
        Some(scope) => format!("{}:{}", scope.flow_id, id),
        None => id.to_string(),
    }
}

fn stamp(data: &mut Map<String, Value>, provenance: &Provenance) {
    data.insert(
        "flattenedFromExternalPortal".to_string(),
        Value::Bool(true),
    );
    if let Some(published) = &provenance.published {
        data.insert("publishedFlowId".to_string(), Value::from(published.id));
        data.insert(
            "publishedAt".to_string(),
            Value::String(published.published_at.clone()),
        );
        data.insert(
            "publishedBy".to_string(),
            Value::String(published.published_by.clone()),
        );
        if let Some(summary) = &published.summary {
            data.insert("summary".to_string(), Value::String(summary.clone()));
        }
    }
}
