//! Template authoring page.

use formsmith_core::template::{CreateTemplate, CustomField, FieldKind, FieldUpdate, TemplateDraft};
use formsmith_core::{FormsService, Result};

use crate::{Route, TRACING_TARGET_BUILDER};

/// Authoring page for a new template.
///
/// Wraps a [`TemplateDraft`] and submits it once it passes validation.
/// A failed submission leaves the draft untouched.
#[derive(Debug, Clone, Default)]
pub struct TemplateBuilder {
    draft: TemplateDraft,
}

impl TemplateBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder around an existing draft.
    pub fn from_draft(draft: TemplateDraft) -> Self {
        Self { draft }
    }

    /// The draft being authored.
    pub fn draft(&self) -> &TemplateDraft {
        &self.draft
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.set_title(title);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.set_description(description);
    }

    /// Appends an enabled field with an empty question, returning its index.
    pub fn add_field(&mut self, kind: FieldKind) -> usize {
        let index = self.draft.add_field(kind);
        tracing::trace!(target: TRACING_TARGET_BUILDER, index, %kind, "Field added");
        index
    }

    /// Changes one attribute of the field at `index`.
    ///
    /// Returns `false`, changing nothing, when `index` is out of bounds.
    pub fn update_field(&mut self, index: usize, update: FieldUpdate) -> bool {
        self.draft.update_field(index, update)
    }

    /// Removes the field at `index`; later fields shift left.
    pub fn remove_field(&mut self, index: usize) -> Option<CustomField> {
        self.draft.remove_field(index)
    }

    /// Checks the required inputs and builds the creation payload.
    pub fn validate(&self) -> Result<CreateTemplate> {
        self.draft.to_request()
    }

    /// Validates and submits the draft.
    ///
    /// Returns [`Route::MyPage`] once the template is created. Any failure
    /// is logged and yields `None`; the draft is kept as it was.
    pub async fn submit(&self, service: &FormsService) -> Option<Route> {
        let request = match self.validate() {
            Ok(request) => request,
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_BUILDER,
                    error = %error,
                    "Template draft is incomplete"
                );
                return None;
            }
        };

        match service.create_template(&request).await {
            Ok(()) => {
                tracing::info!(
                    target: TRACING_TARGET_BUILDER,
                    title = %request.title,
                    fields = request.custom_fields.len(),
                    "Template created"
                );
                Some(Route::MyPage)
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_BUILDER,
                    error = %error,
                    "Error creating template"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use formsmith_core::Session;
    use formsmith_core::auth::Credentials;
    use formsmith_test::{MockFormsProvider, Operation};

    use super::*;

    async fn signed_in() -> (MockFormsProvider, FormsService) {
        let session = Session::in_memory();
        let mock = MockFormsProvider::new(session.clone()).with_user("Ann", "ann@example.com", "pw");
        let service = mock.clone().into_service();

        let response = service
            .login(&Credentials::new("ann@example.com", "pw"))
            .await
            .unwrap();
        session.set(response.token.unwrap()).unwrap();
        (mock, service)
    }

    fn survey() -> TemplateBuilder {
        let mut builder = TemplateBuilder::new();
        builder.set_title("Survey");
        builder.set_description("Quarterly");
        let first = builder.add_field(FieldKind::String);
        builder.update_field(first, FieldUpdate::Question("Name?".into()));
        let second = builder.add_field(FieldKind::Checkbox);
        builder.update_field(second, FieldUpdate::Question("Subscribe?".into()));
        builder
    }

    #[tokio::test]
    async fn test_submit_navigates_to_my_page() {
        let (mock, service) = signed_in().await;

        let route = survey().submit(&service).await;
        assert_eq!(route, Some(Route::MyPage));
        assert_eq!(mock.calls_for(Operation::CreateTemplate).len(), 1);
        assert_eq!(mock.template_titles(), vec!["Survey".to_owned()]);
    }

    #[tokio::test]
    async fn test_incomplete_draft_sends_nothing() {
        let (mock, service) = signed_in().await;
        let mut builder = survey();
        builder.add_field(FieldKind::Text);

        assert!(builder.submit(&service).await.is_none());
        assert!(mock.calls_for(Operation::CreateTemplate).is_empty());
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_draft() {
        let (mock, service) = signed_in().await;
        mock.fail(Operation::CreateTemplate);
        let builder = survey();

        assert!(builder.submit(&service).await.is_none());
        assert_eq!(builder.draft().fields().len(), 2);
        assert_eq!(builder.draft().title(), "Survey");
    }

    #[tokio::test]
    async fn test_submit_without_session_fails() {
        let session = Session::in_memory();
        let mock = MockFormsProvider::new(session);
        let service = mock.clone().into_service();

        assert!(survey().submit(&service).await.is_none());
        let calls = mock.calls_for(Operation::CreateTemplate);
        assert_eq!(calls.len(), 1);
        assert!(!calls[0].authorized);
    }

    #[test]
    fn test_remove_field_shifts_left() {
        let mut builder = survey();
        let removed = builder.remove_field(0).unwrap();

        assert_eq!(removed.question, "Name?");
        assert_eq!(builder.draft().fields()[0].question, "Subscribe?");
        assert!(builder.remove_field(5).is_none());
    }
}
