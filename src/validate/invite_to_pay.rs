use super::RuleReport;
use crate::graph::Graph;
use crate::step::StepType;

const TITLE: &str = "Invite to Pay";

/// Invite-to-Pay flows hand a payment link to a third party, which only
/// works when the flow has exactly one payment point and the submission
/// carries a property and a project type. Checks short-circuit at the first
/// failure.
pub(super) fn check(flattened: &Graph) -> RuleReport {
    let pay_count = flattened.steps(StepType::Pay).count();
    let all_opted_in = flattened
        .steps(StepType::Pay)
        .all(|(_, node)| node.data_flag("allowInviteToPay"));
    if pay_count == 0 || !all_opted_in {
        return RuleReport::not_applicable(TITLE, "This flow is not using Invite to Pay");
    }

    if pay_count > 1 {
        return RuleReport::fail(
            TITLE,
            "When using Invite to Pay, your flow must have exactly ONE Pay",
        );
    }
    let send_count = flattened.steps(StepType::Send).count();
    if send_count == 0 {
        return RuleReport::fail(TITLE, "When using Invite to Pay, your flow must have a Send");
    }
    if send_count > 1 {
        return RuleReport::fail(
            TITLE,
            "When using Invite to Pay, your flow must have exactly ONE Send. It can select many destinations",
        );
    }
    if flattened.steps(StepType::FindProperty).next().is_none() {
        return RuleReport::fail(
            TITLE,
            "When using Invite to Pay, your flow must have a FindProperty",
        );
    }
    let sets_project_type = flattened
        .steps(StepType::Checklist)
        .any(|(_, node)| node.data_str("fn") == Some("proposal.projectType"));
    if !sets_project_type {
        return RuleReport::fail(
            TITLE,
            "When using Invite to Pay, your flow must have a Checklist that sets `proposal.projectType`",
        );
    }

    RuleReport::pass(TITLE, "This flow is valid for Invite to Pay")
}
