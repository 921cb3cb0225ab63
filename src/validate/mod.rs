//! Publish-readiness rule checks over a flattened graph.
//!
//! Rules are independent and run in a fixed order for stable output, but no
//! rule depends on another. Outcomes are data, not exceptions: `Fail`, `Warn`
//! and `NotApplicable` are normal results, and only a failure of the injected
//! schema-values collaborator propagates as an error. Whether a `Fail` blocks
//! publishing is the caller's policy, not this module's.

mod application;
mod file_types;
mod invite_to_pay;
mod sections;

use crate::error::SchemaValuesError;
use crate::graph::Graph;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleStatus {
    Pass,
    Fail,
    Warn,
    NotApplicable,
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            RuleStatus::Pass => "Pass",
            RuleStatus::Fail => "Fail",
            RuleStatus::Warn => "Warn",
            RuleStatus::NotApplicable => "Not applicable",
        };
        f.write_str(text)
    }
}

/// One rule's result, transport-agnostic: consumable by a CLI, an HTTP
/// endpoint or a UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleReport {
    pub title: String,
    pub status: RuleStatus,
    pub message: String,
}

impl RuleReport {
    pub(crate) fn pass(title: &str, message: impl Into<String>) -> Self {
        Self::with_status(title, RuleStatus::Pass, message)
    }

    pub(crate) fn fail(title: &str, message: impl Into<String>) -> Self {
        Self::with_status(title, RuleStatus::Fail, message)
    }

    pub(crate) fn warn(title: &str, message: impl Into<String>) -> Self {
        Self::with_status(title, RuleStatus::Warn, message)
    }

    pub(crate) fn not_applicable(title: &str, message: impl Into<String>) -> Self {
        Self::with_status(title, RuleStatus::NotApplicable, message)
    }

    fn with_status(title: &str, status: RuleStatus, message: impl Into<String>) -> Self {
        RuleReport {
            title: title.to_string(),
            status,
            message: message.into(),
        }
    }
}

/// Schema-value categories, versioned independently of this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaCategory {
    FileType,
    StatutoryApplicationType,
}

impl fmt::Display for SchemaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SchemaCategory::FileType => "file types",
            SchemaCategory::StatutoryApplicationType => "statutory application types",
        };
        f.write_str(text)
    }
}

/// Collaborator supplying the externally-maintained value sets; injected,
/// never hard-coded.
pub trait SchemaValues {
    fn valid_values(&self, category: SchemaCategory) -> Result<Vec<String>, SchemaValuesError>;
}

/// Fixed, in-memory schema values for tests and offline runs.
#[derive(Debug, Clone, Default)]
pub struct StaticSchemaValues {
    pub file_types: Vec<String>,
    pub application_types: Vec<String>,
}

impl SchemaValues for StaticSchemaValues {
    fn valid_values(&self, category: SchemaCategory) -> Result<Vec<String>, SchemaValuesError> {
        Ok(match category {
            SchemaCategory::FileType => self.file_types.clone(),
            SchemaCategory::StatutoryApplicationType => self.application_types.clone(),
        })
    }
}

pub struct Validator<'a, S: SchemaValues> {
    schema: &'a S,
}

impl<'a, S: SchemaValues> Validator<'a, S> {
    pub fn new(schema: &'a S) -> Self {
        Validator { schema }
    }

    /// Runs every rule over a flattened graph.
    pub fn validate(&self, flattened: &Graph) -> Result<Vec<RuleReport>, SchemaValuesError> {
        Ok(vec![
            sections::check(flattened),
            invite_to_pay::check(flattened),
            file_types::check(flattened, self.schema)?,
            application::check(flattened, self.schema)?,
        ])
    }
}
