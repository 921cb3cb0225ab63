//! Tests for the publish-readiness rules.
mod common;
use common::*;
use keiro::prelude::*;
use pretty_assertions::assert_eq;

fn schema() -> StaticSchemaValues {
    StaticSchemaValues {
        file_types: vec!["roofPlan".to_string(), "sitePlan".to_string()],
        application_types: vec!["ldc".to_string(), "pp.full".to_string()],
    }
}

fn report_for<'a>(reports: &'a [RuleReport], title: &str) -> &'a RuleReport {
    reports
        .iter()
        .find(|report| report.title == title)
        .unwrap_or_else(|| panic!("no report titled '{}'", title))
}

fn validate(graph: &Graph) -> Vec<RuleReport> {
    let schema = schema();
    Validator::new(&schema).validate(graph).expect("validate")
}

#[test]
fn sections_rule_is_not_applicable_without_sections() {
    let reports = validate(&question_graph());
    let report = report_for(&reports, "Sections");
    assert_eq!(report.status, RuleStatus::NotApplicable);
}

#[test]
fn sections_flow_must_start_with_a_section() {
    let graph = graph_from_json(json!({
        "_root": { "edges": ["intro", "s1"] },
        "intro": { "type": StepType::Notice.code() },
        "s1": { "type": StepType::Section.code(), "data": { "title": "About you" } },
    }));
    let reports = validate(&graph);
    let report = report_for(&reports, "Sections");
    assert_eq!(report.status, RuleStatus::Fail);
    assert!(report.message.contains("must start with a Section"));
}

#[test]
fn sections_on_the_root_line_pass() {
    let graph = graph_from_json(json!({
        "_root": { "edges": ["s1", "q", "s2"] },
        "s1": { "type": StepType::Section.code() },
        "q": { "type": StepType::Question.code() },
        "s2": { "type": StepType::Section.code() },
    }));
    let reports = validate(&graph);
    assert_eq!(report_for(&reports, "Sections").status, RuleStatus::Pass);
}

#[test]
fn sections_in_a_root_level_folder_pass() {
    let graph = graph_from_json(json!({
        "_root": { "edges": ["s1", "folder"] },
        "s1": { "type": StepType::Section.code() },
        "folder": { "type": StepType::Folder.code(), "edges": ["s2"] },
        "s2": { "type": StepType::Section.code() },
    }));
    let reports = validate(&graph);
    assert_eq!(report_for(&reports, "Sections").status, RuleStatus::Pass);
}

#[test]
fn sections_on_a_branch_fail() {
    let graph = graph_from_json(json!({
        "_root": { "edges": ["s1", "q"] },
        "s1": { "type": StepType::Section.code() },
        "q": { "type": StepType::Question.code(), "edges": ["s2"] },
        "s2": { "type": StepType::Section.code() },
    }));
    let reports = validate(&graph);
    let report = report_for(&reports, "Sections");
    assert_eq!(report.status, RuleStatus::Fail);
    assert!(report.message.contains("main flow line"));
}

#[test]
fn sections_inside_a_flattened_portal_are_called_out() {
    // A section that only exists behind a nested flow comes back stamped
    let nested = graph_from_json(json!({
        "_root": { "edges": ["s2"] },
        "s2": { "type": StepType::Section.code() },
    }));
    let flows = StubFlows::new().with_draft("flow-a", nested);
    let host = graph_from_json(json!({
        "_root": { "edges": ["s1", "portal"] },
        "s1": { "type": StepType::Section.code() },
        "portal": { "type": StepType::ExternalPortal.code(), "data": { "flowId": "flow-a" } },
    }));
    let flattened = Flattener::new(&flows)
        .flatten(&host, ResolveMode::Draft)
        .expect("flatten");

    let reports = validate(&flattened);
    let report = report_for(&reports, "Sections");
    assert_eq!(report.status, RuleStatus::Fail);
    assert!(report.message.contains("External Portal"));
}

fn invite_to_pay_graph(pay_count: usize, send_count: usize, with_property: bool) -> Graph {
    let mut value = json!({
        "_root": { "edges": [] },
        "checklist": {
            "type": StepType::Checklist.code(),
            "data": { "fn": "proposal.projectType" },
        },
    });
    let root = value["_root"]["edges"].as_array_mut().unwrap();
    root.push(json!("checklist"));
    for i in 0..pay_count {
        root.push(json!(format!("pay{}", i)));
    }
    for i in 0..send_count {
        root.push(json!(format!("send{}", i)));
    }
    if with_property {
        root.push(json!("property"));
    }
    let object = value.as_object_mut().unwrap();
    for i in 0..pay_count {
        object.insert(
            format!("pay{}", i),
            json!({ "type": StepType::Pay.code(), "data": { "allowInviteToPay": true } }),
        );
    }
    for i in 0..send_count {
        object.insert(format!("send{}", i), json!({ "type": StepType::Send.code() }));
    }
    if with_property {
        object.insert(
            "property".to_string(),
            json!({ "type": StepType::FindProperty.code() }),
        );
    }
    graph_from_json(value)
}

#[test]
fn invite_to_pay_requires_exactly_one_pay() {
    let reports = validate(&invite_to_pay_graph(2, 1, true));
    let report = report_for(&reports, "Invite to Pay");
    assert_eq!(report.status, RuleStatus::Fail);
    assert!(report.message.contains("exactly ONE Pay"));
}

#[test]
fn invite_to_pay_requires_a_send() {
    let reports = validate(&invite_to_pay_graph(1, 0, true));
    let report = report_for(&reports, "Invite to Pay");
    assert_eq!(report.status, RuleStatus::Fail);
    assert!(report.message.contains("must have a Send"));
}

#[test]
fn invite_to_pay_requires_exactly_one_send() {
    let reports = validate(&invite_to_pay_graph(1, 2, true));
    let report = report_for(&reports, "Invite to Pay");
    assert_eq!(report.status, RuleStatus::Fail);
    assert!(report.message.contains("exactly ONE Send"));
}

#[test]
fn invite_to_pay_requires_a_find_property() {
    let reports = validate(&invite_to_pay_graph(1, 1, false));
    let report = report_for(&reports, "Invite to Pay");
    assert_eq!(report.status, RuleStatus::Fail);
    assert!(report.message.contains("FindProperty"));
}

#[test]
fn invite_to_pay_requires_a_project_type_checklist() {
    let graph = graph_from_json(json!({
        "_root": { "edges": ["pay", "send", "property"] },
        "pay": { "type": StepType::Pay.code(), "data": { "allowInviteToPay": true } },
        "send": { "type": StepType::Send.code() },
        "property": { "type": StepType::FindProperty.code() },
    }));
    let reports = validate(&graph);
    let report = report_for(&reports, "Invite to Pay");
    assert_eq!(report.status, RuleStatus::Fail);
    assert!(report.message.contains("proposal.projectType"));
}

#[test]
fn invite_to_pay_happy_path_passes() {
    let reports = validate(&invite_to_pay_graph(1, 1, true));
    assert_eq!(
        report_for(&reports, "Invite to Pay").status,
        RuleStatus::Pass
    );
}

#[test]
fn invite_to_pay_is_not_applicable_without_opt_in() {
    let graph = graph_from_json(json!({
        "_root": { "edges": ["pay"] },
        "pay": { "type": StepType::Pay.code() },
    }));
    let reports = validate(&graph);
    assert_eq!(
        report_for(&reports, "Invite to Pay").status,
        RuleStatus::NotApplicable
    );
}

#[test]
fn unknown_file_types_warn_with_counts() {
    let graph = graph_from_json(json!({
        "_root": { "edges": ["u1", "u2", "u3"] },
        "u1": { "type": StepType::FileUpload.code(), "data": { "fn": "sketchy" } },
        "u2": { "type": StepType::FileUpload.code(), "data": { "fn": "sketchy" } },
        "u3": { "type": StepType::FileUpload.code(), "data": { "fn": "roofPlan" } },
    }));
    let reports = validate(&graph);
    let report = report_for(&reports, "File types");
    // A warning, never a failure
    assert_eq!(report.status, RuleStatus::Warn);
    assert!(report.message.contains("sketchy (2)"));
    assert!(!report.message.contains("roofPlan"));
}

#[test]
fn file_types_from_labelled_uploads_are_checked() {
    let graph = graph_from_json(json!({
        "_root": { "edges": ["upload", "hidden"] },
        "upload": {
            "type": StepType::FileUploadAndLabel.code(),
            "data": { "fileTypes": [
                { "name": "Roof plan", "fn": "roofPlan" },
                { "name": "Mystery", "fn": "mystery" },
            ] },
        },
        "hidden": {
            "type": StepType::FileUploadAndLabel.code(),
            "data": { "hidden": true, "fileTypes": [{ "name": "Skipped", "fn": "skipped" }] },
        },
    }));
    let reports = validate(&graph);
    let report = report_for(&reports, "File types");
    assert_eq!(report.status, RuleStatus::Warn);
    assert!(report.message.contains("mystery (1)"));
    assert!(!report.message.contains("skipped"));
}

#[test]
fn file_types_rule_is_not_applicable_without_uploads() {
    let reports = validate(&question_graph());
    assert_eq!(
        report_for(&reports, "File types").status,
        RuleStatus::NotApplicable
    );
}

#[test]
fn statutory_rule_passes_on_a_direct_set_value() {
    let graph = graph_from_json(json!({
        "_root": { "edges": ["set", "send"] },
        "set": {
            "type": StepType::SetValue.code(),
            "data": { "fn": "application.type", "val": "ldc" },
        },
        "send": { "type": StepType::Send.code() },
    }));
    let reports = validate(&graph);
    assert_eq!(
        report_for(&reports, "Statutory application path").status,
        RuleStatus::Pass
    );
}

#[test]
fn statutory_rule_passes_via_a_question_option() {
    let graph = graph_from_json(json!({
        "_root": { "edges": ["q", "send"] },
        "q": {
            "type": StepType::Question.code(),
            "data": { "fn": "application.type" },
            "edges": ["opt1", "opt2"],
        },
        "opt1": { "type": StepType::Answer.code(), "data": { "val": "not.statutory" } },
        "opt2": { "type": StepType::Answer.code(), "data": { "val": "pp.full" } },
        "send": { "type": StepType::Send.code() },
    }));
    let reports = validate(&graph);
    let report = report_for(&reports, "Statutory application path");
    assert_eq!(report.status, RuleStatus::Pass);
    assert!(report.message.contains("'q'"));
}

#[test]
fn statutory_rule_fails_when_no_statutory_value_is_set() {
    let graph = graph_from_json(json!({
        "_root": { "edges": ["set", "send"] },
        "set": {
            "type": StepType::SetValue.code(),
            "data": { "fn": "application.type", "val": "made.up" },
        },
        "send": { "type": StepType::Send.code() },
    }));
    let reports = validate(&graph);
    assert_eq!(
        report_for(&reports, "Statutory application path").status,
        RuleStatus::Fail
    );
}

#[test]
fn statutory_rule_is_not_applicable_without_send() {
    let reports = validate(&question_graph());
    assert_eq!(
        report_for(&reports, "Statutory application path").status,
        RuleStatus::NotApplicable
    );
}

#[test]
fn schema_collaborator_failures_propagate() {
    let graph = graph_from_json(json!({
        "_root": { "edges": ["upload"] },
        "upload": { "type": StepType::FileUpload.code(), "data": { "fn": "roofPlan" } },
    }));
    let err = Validator::new(&BrokenSchema).validate(&graph).unwrap_err();
    assert!(err.to_string().contains("schema service unavailable"));
}

#[test]
fn rule_order_is_stable() {
    let reports = validate(&question_graph());
    let titles: Vec<&str> = reports.iter().map(|report| report.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Sections",
            "Invite to Pay",
            "File types",
            "Statutory application path"
        ]
    );
}
