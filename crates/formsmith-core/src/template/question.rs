//! Display blocks for custom questions.

use serde::{Deserialize, Serialize};

/// A labelled question ready to be shown on the template page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBlock {
    /// Slot name the block was built from.
    pub name: String,
    /// Human readable heading derived from the slot name.
    pub label: String,
    /// The question text.
    pub text: String,
}

impl QuestionBlock {
    /// Builds a block, deriving the label from the slot name.
    pub fn new(name: &str, text: &str) -> Self {
        Self {
            name: name.to_owned(),
            label: slot_label(name),
            text: text.to_owned(),
        }
    }
}

/// Turns a slot name into a heading.
///
/// Underscores become spaces and the first letter is upper-cased, so
/// `custom_string1` reads as `Custom string1`.
///
/// Only the first character is capitalised; a `custom` word elsewhere in
/// the name is left alone, so `my_custom` reads as `My custom`.
pub fn slot_label(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
