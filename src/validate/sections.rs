use super::RuleReport;
use crate::graph::{Graph, NodeId};
use crate::step::StepType;
use ahash::AHashSet;

const TITLE: &str = "Sections";

/// Sections partition the user-visible flow, so they must sit on the root
/// line (or in the first level of a root-level Folder) and must lead it.
pub(super) fn check(flattened: &Graph) -> RuleReport {
    let section_ids: Vec<&NodeId> = flattened
        .steps(StepType::Section)
        .map(|(id, _)| id)
        .collect();
    if section_ids.is_empty() {
        return RuleReport::not_applicable(TITLE, "This flow is not using Sections");
    }

    let starts_with_section = flattened
        .root_edges()
        .first()
        .and_then(|first| flattened.get(first))
        .is_some_and(|node| node.is_step(StepType::Section));
    if !starts_with_section {
        return RuleReport::fail(
            TITLE,
            "When using Sections, your flow must start with a Section",
        );
    }

    let mut allowed: AHashSet<&str> = flattened
        .root_edges()
        .iter()
        .map(|edge| edge.as_str())
        .collect();
    for edge in flattened.root_edges() {
        if let Some(node) = flattened.get(edge) {
            if node.is_step(StepType::Folder) && !node.data_flag("flattenedFromExternalPortal") {
                allowed.extend(node.edges.iter().map(|child| child.as_str()));
            }
        }
    }

    let misplaced: Vec<&NodeId> = section_ids
        .into_iter()
        .filter(|id| !allowed.contains(id.as_str()))
        .collect();
    if misplaced.is_empty() {
        return RuleReport::pass(TITLE, "All Sections are correctly placed");
    }

    let from_portal = misplaced.iter().any(|id| {
        flattened
            .get(id)
            .is_some_and(|node| node.data_flag("flattenedFromExternalPortal"))
    });
    if from_portal {
        RuleReport::fail(
            TITLE,
            "Found Sections in one or more External Portals, but Sections are only allowed in the main flow",
        )
    } else {
        RuleReport::fail(
            TITLE,
            "Sections must be placed on the main flow line, not on branches",
        )
    }
}
