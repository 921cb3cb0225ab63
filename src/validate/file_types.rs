use super::{RuleReport, SchemaCategory, SchemaValues};
use crate::error::SchemaValuesError;
use crate::graph::Graph;
use crate::step::StepType;
use itertools::Itertools;
use serde_json::Value;

const TITLE: &str = "File types";

/// An unrecognised file-type field name will not block a submission, it only
/// degrades downstream document handling, so this rule warns rather than
/// fails.
pub(super) fn check<S: SchemaValues>(
    flattened: &Graph,
    schema: &S,
) -> Result<RuleReport, SchemaValuesError> {
    let mut field_names: Vec<&str> = Vec::new();
    for (_, node) in flattened.steps(StepType::FileUpload) {
        if let Some(name) = node.data_str("fn") {
            field_names.push(name);
        }
    }
    for (_, node) in flattened.steps(StepType::FileUploadAndLabel) {
        if node.data_flag("hidden") {
            continue;
        }
        if let Some(Value::Array(file_types)) = node.data.get("fileTypes") {
            for entry in file_types {
                if let Some(name) = entry.get("fn").and_then(Value::as_str) {
                    field_names.push(name);
                }
            }
        }
    }
    if field_names.is_empty() {
        return Ok(RuleReport::not_applicable(
            TITLE,
            "This flow has no file upload steps that set a data field",
        ));
    }

    let valid = schema.valid_values(SchemaCategory::FileType)?;
    let unknown: Vec<(&str, usize)> = field_names
        .into_iter()
        .filter(|name| !valid.iter().any(|known| known == name))
        .counts()
        .into_iter()
        .sorted()
        .collect();
    if unknown.is_empty() {
        return Ok(RuleReport::pass(
            TITLE,
            "All file upload data fields are recognised file types",
        ));
    }

    let listing = unknown
        .iter()
        .map(|(name, count)| format!("{} ({})", name, count))
        .join(", ");
    Ok(RuleReport::warn(
        TITLE,
        format!("Unrecognised file type data fields: {}", listing),
    ))
}
