//! The current user's page.

use formsmith_core::FormsService;
use formsmith_core::listing::{FormSummary, OwnedTemplate};

use crate::TRACING_TARGET_OWNER;

/// Shown when the user has not created any template.
pub const NO_TEMPLATES_MESSAGE: &str = "No templates created yet.";

/// Shown when the user has not submitted any form.
pub const NO_FORMS_MESSAGE: &str = "No forms filled yet.";

/// Templates created and forms submitted by the signed-in user.
#[derive(Debug, Clone)]
pub struct OwnerCollection {
    service: FormsService,
    templates: Vec<OwnedTemplate>,
    forms: Vec<FormSummary>,
}

impl OwnerCollection {
    pub fn new(service: FormsService) -> Self {
        Self {
            service,
            templates: Vec::new(),
            forms: Vec::new(),
        }
    }

    /// Loads both lists concurrently. Each failure leaves its list empty.
    pub async fn load(&mut self) {
        let (templates, forms) = tokio::join!(self.service.my_templates(), self.service.my_forms());

        match templates {
            Ok(items) => self.templates = items,
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_OWNER,
                    error = %error,
                    "Error fetching my templates"
                );
            }
        }

        match forms {
            Ok(items) => self.forms = items,
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_OWNER,
                    error = %error,
                    "Error fetching my forms"
                );
            }
        }
    }

    pub fn templates(&self) -> &[OwnedTemplate] {
        &self.templates
    }

    pub fn forms(&self) -> &[FormSummary] {
        &self.forms
    }
}

#[cfg(test)]
mod tests {
    use formsmith_core::Session;
    use formsmith_core::auth::Credentials;
    use formsmith_test::{MockFormsProvider, Operation};

    use super::*;

    #[tokio::test]
    async fn test_loads_only_own_items() {
        let session = Session::in_memory();
        let mock = MockFormsProvider::new(session.clone())
            .with_user("Ann", "ann@example.com", "pw")
            .with_user("Bob", "bob@example.com", "pw");
        let mine = mock.seed_template("ann@example.com", "Mine", "", &[], 0);
        let theirs = mock.seed_template("bob@example.com", "Theirs", "Bob's", &[], 0);
        mock.seed_form("ann@example.com", &theirs);
        mock.seed_form("bob@example.com", &mine);

        let service = mock.clone().into_service();
        let token = service
            .login(&Credentials::new("ann@example.com", "pw"))
            .await
            .unwrap()
            .token
            .unwrap();
        session.set(token).unwrap();

        let mut page = OwnerCollection::new(service);
        page.load().await;

        assert_eq!(page.templates().len(), 1);
        assert_eq!(page.templates()[0].title, "Mine");
        assert_eq!(page.forms().len(), 1);
        let template = page.forms()[0].template.as_ref().unwrap();
        assert_eq!(template.title, "Theirs");
        assert_eq!(template.description, "Bob's");
    }

    #[tokio::test]
    async fn test_signed_out_lists_stay_empty() {
        let mock = MockFormsProvider::new(Session::in_memory());
        let mut page = OwnerCollection::new(mock.clone().into_service());
        page.load().await;

        assert!(page.templates().is_empty());
        assert!(page.forms().is_empty());
        assert_eq!(mock.calls_for(Operation::MyTemplates).len(), 1);
        assert_eq!(mock.calls_for(Operation::MyForms).len(), 1);
    }
}
