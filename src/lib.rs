//! # Keiro - Flow-Graph Engine for Editor-Built Decision Flows
//!
//! **Keiro** is the graph engine behind editors that let non-technical users
//! assemble multi-step decision flows (such as planning-permission
//! eligibility checks) as a directed graph of typed steps. It keeps the whole
//! flow in one flat, arena-style store, applies every edit as a pure function
//! and describes each edit as a minimal, replayable changeset that any
//! real-time sync or undo layer can consume.
//!
//! ## Core Workflow
//!
//! 1.  **Mutate**: operations like [`mutate::clone_node`], [`mutate::update`]
//!     and [`mutate::make_unique`] take an immutable graph snapshot plus
//!     arguments and return a new snapshot together with the ordered
//!     [`mutate::Changeset`] of what was applied. A failed operation returns
//!     an error and no graph at all.
//! 2.  **Flatten**: before a flow can be validated or exported, the
//!     [`flatten::Flattener`] resolves every nested-flow portal through an
//!     injected [`flatten::FlowFetcher`], splicing the referenced flows into
//!     one portal-free graph stamped with provenance.
//! 3.  **Validate**: the [`validate::Validator`] runs independent
//!     publish-readiness rules over the flattened graph and returns one
//!     [`validate::RuleReport`] per rule. Outcomes are data; whether a `Fail`
//!     blocks publishing is the caller's policy.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use keiro::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // Build a small flow. Ids come from an injected generator, so tests
//!     // can use deterministic ones.
//!     let graph = Graph::new();
//!     let mut ids = SequentialIds::new("n");
//!     let question = NodeSeed::with_step(StepType::Question)
//!         .field("text", "Is the property listed?")
//!         .child(NodeSeed::with_step(StepType::Answer).field("text", "Yes"))
//!         .child(NodeSeed::with_step(StepType::Answer).field("text", "No"));
//!     let (graph, changeset) = add(&graph, question, Relationships::default(), &mut ids)?;
//!     println!("recorded {} ops", changeset.len());
//!
//!     // Flatten (this flow has no nested flows) and validate.
//!     let flattener = Flattener::new(&NoExternalFlows);
//!     let flattened = flattener.flatten(&graph, ResolveMode::Draft)?;
//!     let schema = StaticSchemaValues::default();
//!     let reports = Validator::new(&schema).validate(&flattened)?;
//!     for report in &reports {
//!         println!("[{}] {}: {}", report.status, report.title, report.message);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod flatten;
pub mod graph;
pub mod id;
pub mod mutate;
pub mod prelude;
pub mod step;
pub mod validate;
