//! The step-type catalogue: every kind of step an editor can place in a flow.
//!
//! The catalogue is a closed tagged union with one lookup-table row per
//! variant (display label, icon key, edit-form binding). Adding a step kind
//! is one line in the `step_catalogue!` invocation below.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalogue row describing how a step kind is presented in an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepMeta {
    pub label: &'static str,
    pub icon: &'static str,
    /// Key of the editor form bound to this step kind.
    pub form: &'static str,
}

/// Master macro defining the step union, its wire codes and its catalogue rows.
macro_rules! step_catalogue {
    ( $( ($variant:ident, $code:literal, $label:literal, $icon:literal, $form:literal) ),* $(,)? ) => {
        /// Closed union of step kinds. Serialized as its numeric wire code.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u16", into = "u16")]
        pub enum StepType {
            $( $variant = $code, )*
        }

        impl StepType {
            pub const ALL: &'static [StepType] = &[ $( StepType::$variant, )* ];

            /// Stable numeric code used on the wire.
            pub const fn code(self) -> u16 {
                self as u16
            }

            pub const fn meta(self) -> StepMeta {
                match self {
                    $( StepType::$variant => StepMeta { label: $label, icon: $icon, form: $form }, )*
                }
            }
        }

        impl TryFrom<u16> for StepType {
            type Error = String;

            fn try_from(code: u16) -> Result<Self, Self::Error> {
                match code {
                    $( $code => Ok(StepType::$variant), )*
                    other => Err(format!("unknown step type code: {}", other)),
                }
            }
        }

        impl From<StepType> for u16 {
            fn from(step: StepType) -> u16 {
                step as u16
            }
        }
    };
}

step_catalogue! {
    (Flow, 1, "Flow", "flow", "flow-settings"),
    (Result, 3, "Result", "result", "result-editor"),
    (FindProperty, 9, "Find property", "find-property", "find-property-editor"),
    (DrawBoundary, 10, "Draw boundary", "draw-boundary", "draw-boundary-editor"),
    (PlanningConstraints, 11, "Planning constraints", "planning-constraints", "planning-constraints-editor"),
    (PropertyInformation, 12, "Property information", "property-information", "property-information-editor"),
    (Question, 100, "Question", "question", "question-editor"),
    (Checklist, 105, "Checklist", "checklist", "checklist-editor"),
    (TaskList, 110, "Task list", "task-list", "task-list-editor"),
    (Notice, 115, "Notice", "notice", "notice-editor"),
    (DateInput, 120, "Date input", "date-input", "date-input-editor"),
    (AddressInput, 130, "Address input", "address-input", "address-input-editor"),
    (ContactInput, 135, "Contact input", "contact-input", "contact-input-editor"),
    (FileUpload, 140, "File upload", "file-upload", "file-upload-editor"),
    (FileUploadAndLabel, 145, "File upload and label", "file-upload-label", "file-upload-label-editor"),
    (NumberInput, 150, "Number input", "number-input", "number-input-editor"),
    (MapAndLabel, 155, "Map and label", "map-and-label", "map-and-label-editor"),
    (TextInput, 160, "Text input", "text-input", "text-input-editor"),
    (List, 165, "List", "list", "list-editor"),
    (Page, 170, "Page", "page", "page-editor"),
    (Feedback, 180, "Feedback", "feedback", "feedback-editor"),
    (Answer, 200, "Answer", "answer", "answer-editor"),
    (Content, 250, "Content", "content", "content-editor"),
    (Folder, 300, "Folder", "folder", "folder-editor"),
    (ExternalPortal, 310, "Nested flow", "external-portal", "external-portal-editor"),
    (Section, 360, "Section", "section", "section-editor"),
    (SetValue, 380, "Set value", "set-value", "set-value-editor"),
    (SetFee, 390, "Set fee", "set-fee", "set-fee-editor"),
    (Pay, 400, "Pay", "pay", "pay-editor"),
    (Filter, 500, "Filter", "filter", "filter-editor"),
    (Review, 600, "Review", "review", "review-editor"),
    (Send, 650, "Send", "send", "send-editor"),
    (Calculate, 700, "Calculate", "calculate", "calculate-editor"),
    (Confirmation, 725, "Confirmation", "confirmation", "confirmation-editor"),
    (NextSteps, 730, "Next steps", "next-steps", "next-steps-editor"),
    (ResponsiveQuestion, 735, "Responsive question", "responsive-question", "responsive-question-editor"),
    (ResponsiveChecklist, 740, "Responsive checklist", "responsive-checklist", "responsive-checklist-editor"),
}

impl StepType {
    pub const fn label(self) -> &'static str {
        self.meta().label
    }

    /// Structural steps partition or nest the flow rather than ask anything.
    pub const fn is_structural(self) -> bool {
        matches!(
            self,
            StepType::Section | StepType::Folder | StepType::ExternalPortal
        )
    }
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
