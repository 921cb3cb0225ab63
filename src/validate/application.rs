use super::{RuleReport, SchemaCategory, SchemaValues};
use crate::error::SchemaValuesError;
use crate::graph::Graph;
use crate::step::StepType;

const TITLE: &str = "Statutory application path";

const APPLICATION_TYPE: &str = "application.type";

/// A flow that submits somewhere must put the user on a statutory
/// application path: some node has to set `application.type` to a statutory
/// value, either directly via a fixed value or through a Question/Checklist
/// option. The search walks depth-first and stops at the first match.
pub(super) fn check<S: SchemaValues>(
    flattened: &Graph,
    schema: &S,
) -> Result<RuleReport, SchemaValuesError> {
    if flattened.steps(StepType::Send).next().is_none() {
        return Ok(RuleReport::not_applicable(
            TITLE,
            "This flow is not using Send",
        ));
    }
    let statutory = schema.valid_values(SchemaCategory::StatutoryApplicationType)?;

    for id in flattened.ids_depth_first() {
        let Some(node) = flattened.get(&id) else {
            continue;
        };
        if node.data_str("fn") != Some(APPLICATION_TYPE) {
            continue;
        }
        if node
            .data_str("val")
            .is_some_and(|value| statutory.iter().any(|known| known == value))
        {
            return Ok(RuleReport::pass(
                TITLE,
                format!("Found a statutory application type set by '{}'", id),
            ));
        }
        if matches!(
            node.step,
            Some(StepType::Question | StepType::Checklist)
        ) {
            let option_matches = node.edges.iter().any(|child| {
                flattened
                    .get(child)
                    .and_then(|option| option.data_str("val"))
                    .is_some_and(|value| statutory.iter().any(|known| known == value))
            });
            if option_matches {
                return Ok(RuleReport::pass(
                    TITLE,
                    format!("Found a statutory application type set by '{}'", id),
                ));
            }
        }
    }

    Ok(RuleReport::fail(
        TITLE,
        "When using Send, your flow must set `application.type` to a statutory application type",
    ))
}
