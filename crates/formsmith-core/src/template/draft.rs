//! Template authoring model.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{CustomField, FieldKind, FieldUpdate};
use crate::Result;

/// A template under construction.
///
/// Fields keep the order in which they were added; removing a field shifts
/// the later ones left.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateDraft {
    title: String,
    description: String,
    fields: Vec<CustomField>,
}

impl TemplateDraft {
    /// Creates an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the template title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Sets the template description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Returns the template title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the template description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the fields in authoring order.
    pub fn fields(&self) -> &[CustomField] {
        &self.fields
    }

    /// Appends an enabled field with an empty question and returns its index.
    pub fn add_field(&mut self, kind: FieldKind) -> usize {
        self.fields.push(CustomField::new(kind));
        self.fields.len() - 1
    }

    /// Updates the field at `index`.
    ///
    /// Returns `false` without touching anything when `index` is out of
    /// bounds.
    pub fn update_field(&mut self, index: usize, update: FieldUpdate) -> bool {
        match self.fields.get_mut(index) {
            Some(field) => {
                field.apply(update);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the field at `index`, or `None` when out of bounds.
    pub fn remove_field(&mut self, index: usize) -> Option<CustomField> {
        (index < self.fields.len()).then(|| self.fields.remove(index))
    }

    /// Builds the creation payload, checking the required inputs.
    ///
    /// Title, description and every question must be non-empty. A draft
    /// without fields is valid.
    pub fn to_request(&self) -> Result<CreateTemplate> {
        let request = CreateTemplate {
            title: self.title.clone(),
            description: self.description.clone(),
            custom_fields: self.fields.clone(),
        };

        request.validate()?;
        Ok(request)
    }
}

/// Request body for `POST /templates`.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplate {
    /// Template title.
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    /// Template description.
    #[validate(length(min = 1, message = "description is required"))]
    pub description: String,
    /// Custom questions in authoring order.
    #[validate(nested)]
    pub custom_fields: Vec<CustomField>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn draft_with(kinds: &[FieldKind]) -> TemplateDraft {
        let mut draft = TemplateDraft::new();
        draft.set_title("Survey");
        draft.set_description("Quarterly survey");
        for (i, kind) in kinds.iter().enumerate() {
            let index = draft.add_field(*kind);
            draft.update_field(index, FieldUpdate::Question(format!("Q{}", i + 1)));
        }
        draft
    }

    #[test]
    fn test_add_field_appends_enabled_empty() {
        let mut draft = draft_with(&[FieldKind::String]);
        let index = draft.add_field(FieldKind::Checkbox);

        assert_eq!(index, 1);
        let added = &draft.fields()[1];
        assert_eq!(added.kind, FieldKind::Checkbox);
        assert!(added.question.is_empty());
        assert!(added.enabled);
        assert_eq!(draft.fields()[0].question, "Q1");
    }

    #[test]
    fn test_add_then_remove_is_noop() {
        let mut draft = draft_with(&[FieldKind::String, FieldKind::Text, FieldKind::Integer]);
        let before = draft.fields().to_vec();

        let index = draft.add_field(FieldKind::Checkbox);
        let removed = draft.remove_field(index).unwrap();

        assert_eq!(removed.kind, FieldKind::Checkbox);
        assert_eq!(draft.fields(), before.as_slice());
    }

    #[test]
    fn test_update_touches_exactly_one_field() {
        let mut draft = draft_with(&[FieldKind::String, FieldKind::Text, FieldKind::Integer]);
        let before = draft.fields().to_vec();

        assert!(draft.update_field(1, FieldUpdate::Question("Changed".into())));

        for (i, (after, before)) in draft.fields().iter().zip(&before).enumerate() {
            if i == 1 {
                assert_eq!(after.question, "Changed");
                assert_eq!(after.kind, before.kind);
                assert_eq!(after.enabled, before.enabled);
            } else {
                assert_eq!(after, before);
            }
        }
    }

    #[test]
    fn test_out_of_bounds_is_noop() {
        let mut draft = draft_with(&[FieldKind::String]);
        let before = draft.clone();

        assert!(!draft.update_field(5, FieldUpdate::Enabled(false)));
        assert!(draft.remove_field(1).is_none());
        assert_eq!(draft, before);
    }

    #[test]
    fn test_remove_shifts_left() {
        let mut draft = draft_with(&[FieldKind::String, FieldKind::Text, FieldKind::Integer]);
        draft.remove_field(0);

        let questions: Vec<_> = draft.fields().iter().map(|f| f.question.as_str()).collect();
        assert_eq!(questions, ["Q2", "Q3"]);
    }

    #[test]
    fn test_request_payload_shape() {
        let draft = draft_with(&[FieldKind::Integer]);
        let request = draft.to_request().unwrap();
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "title": "Survey",
                "description": "Quarterly survey",
                "customFields": [{ "type": "integer", "question": "Q1", "state": true }]
            })
        );
    }

    #[test]
    fn test_empty_field_list_is_valid() {
        let draft = draft_with(&[]);
        let request = draft.to_request().unwrap();
        assert!(request.custom_fields.is_empty());
    }

    #[test]
    fn test_required_inputs() {
        let mut draft = draft_with(&[FieldKind::String]);
        draft.add_field(FieldKind::Text);
        let error = draft.to_request().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);

        let mut untitled = draft_with(&[]);
        untitled.set_title("");
        assert!(untitled.to_request().is_err());
    }
}
