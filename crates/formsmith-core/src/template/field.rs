//! Custom question fields.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};
use validator::Validate;

/// The input kind of a custom question.
///
/// This is a closed set: the authoring page only ever offers these four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter, EnumString, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FieldKind {
    /// Single line of text.
    String,
    /// Multi-line text.
    Text,
    /// Whole number.
    Integer,
    /// Yes/no checkbox.
    Checkbox,
}

impl FieldKind {
    /// Parses a kind from a flat-record slot name fragment.
    ///
    /// Accepts the canonical names plus `int`, which is what the backend
    /// uses in its column names.
    pub fn from_slot_fragment(fragment: &str) -> Option<Self> {
        match fragment {
            "string" => Some(Self::String),
            "text" => Some(Self::Text),
            "integer" | "int" => Some(Self::Integer),
            "checkbox" => Some(Self::Checkbox),
            _ => None,
        }
    }
}

/// One custom question being authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CustomField {
    /// Input kind, fixed at creation.
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Question label shown to respondents.
    #[validate(length(min = 1, message = "question is required"))]
    pub question: String,
    /// Whether the question is active.
    #[serde(rename = "state")]
    pub enabled: bool,
}

impl CustomField {
    /// Creates an enabled field with an empty question.
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            question: String::new(),
            enabled: true,
        }
    }

    /// Sets the question text.
    #[must_use]
    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = question.into();
        self
    }

    /// Applies an update to this field.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Question(question) => self.question = question,
            FieldUpdate::Enabled(enabled) => self.enabled = enabled,
        }
    }
}

/// An editable attribute of a [`CustomField`] together with its new value.
///
/// The kind is deliberately absent: it cannot change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    /// Replace the question text.
    Question(String),
    /// Toggle the active state.
    Enabled(bool),
}
