//! Forms service wrapper with observability.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use crate::auth::{Credentials, LoginResponse, Registration};
use crate::listing::{FormSummary, OwnedTemplate, TemplateId, TemplateSummary};
use crate::template::{CreateTemplate, TemplateRecord};
use crate::{FormsProvider, Result};

/// Tracing target for service calls.
pub const TRACING_TARGET: &str = "formsmith_core::service";

/// Forms service wrapper with observability.
///
/// This wrapper adds structured logging to any [`FormsProvider`]. The inner
/// provider is wrapped in `Arc` for cheap cloning.
#[derive(Clone)]
pub struct FormsService {
    inner: Arc<dyn FormsProvider>,
}

impl fmt::Debug for FormsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormsService").finish_non_exhaustive()
    }
}

impl FormsService {
    /// Create a new forms service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: FormsProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    async fn observe<T, F>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let started_at = Instant::now();
        tracing::debug!(target: TRACING_TARGET, operation, "Calling forms service");

        let result = call.await;
        let elapsed_ms = started_at.elapsed().as_millis();

        match &result {
            Ok(_) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    operation,
                    elapsed_ms,
                    "Forms service call succeeded"
                );
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    operation,
                    error = %error,
                    elapsed_ms,
                    "Forms service call failed"
                );
            }
        }

        result
    }

    /// Latest templates, in server order.
    pub async fn latest_templates(&self) -> Result<Vec<TemplateSummary>> {
        self.observe("latest_templates", self.inner.latest_templates())
            .await
    }

    /// Popular templates, in server order.
    pub async fn popular_templates(&self) -> Result<Vec<TemplateSummary>> {
        self.observe("popular_templates", self.inner.popular_templates())
            .await
    }

    /// Templates matching a text query.
    pub async fn search_templates(&self, query: &str) -> Result<Vec<TemplateSummary>> {
        self.observe("search_templates", self.inner.search_templates(query))
            .await
    }

    /// A single template by id.
    pub async fn template(&self, id: &TemplateId) -> Result<TemplateRecord> {
        self.observe("template", self.inner.template(id)).await
    }

    /// Templates owned by the session's user.
    pub async fn my_templates(&self) -> Result<Vec<OwnedTemplate>> {
        self.observe("my_templates", self.inner.my_templates()).await
    }

    /// Forms submitted by the session's user.
    pub async fn my_forms(&self) -> Result<Vec<FormSummary>> {
        self.observe("my_forms", self.inner.my_forms()).await
    }

    /// Creates a template.
    pub async fn create_template(&self, request: &CreateTemplate) -> Result<()> {
        self.observe("create_template", self.inner.create_template(request))
            .await
    }

    /// Exchanges credentials for a token.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        self.observe("login", self.inner.login(credentials)).await
    }

    /// Registers a new account.
    pub async fn register(&self, registration: &Registration) -> Result<()> {
        self.observe("register", self.inner.register(registration))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::listing::Author;

    fn summary() -> TemplateSummary {
        TemplateSummary {
            id: TemplateId::from(1),
            title: "Intro".to_owned(),
            description: String::new(),
            author: Author {
                name: "Ann".to_owned(),
            },
            forms: Vec::new(),
        }
    }

    struct StubProvider;

    #[async_trait::async_trait]
    impl FormsProvider for StubProvider {
        async fn latest_templates(&self) -> Result<Vec<TemplateSummary>> {
            Ok(vec![summary()])
        }

        async fn popular_templates(&self) -> Result<Vec<TemplateSummary>> {
            Err(ErrorKind::ServiceUnavailable.with_message("down"))
        }

        async fn search_templates(&self, _query: &str) -> Result<Vec<TemplateSummary>> {
            Ok(Vec::new())
        }

        async fn template(&self, id: &TemplateId) -> Result<TemplateRecord> {
            Ok(TemplateRecord::new(Some(id.clone()), "Intro", "Hello", &[]))
        }

        async fn my_templates(&self) -> Result<Vec<OwnedTemplate>> {
            Err(ErrorKind::Authentication.with_message("no token"))
        }

        async fn my_forms(&self) -> Result<Vec<FormSummary>> {
            Ok(Vec::new())
        }

        async fn create_template(&self, _request: &CreateTemplate) -> Result<()> {
            Ok(())
        }

        async fn login(&self, _credentials: &Credentials) -> Result<LoginResponse> {
            Ok(LoginResponse::default())
        }

        async fn register(&self, _registration: &Registration) -> Result<()> {
            Err(ErrorKind::InvalidInput.with_message("email taken"))
        }
    }

    #[tokio::test]
    async fn test_successful_results_pass_through() {
        let service = FormsService::new(StubProvider);

        assert_eq!(service.latest_templates().await.unwrap(), vec![summary()]);
        assert!(service.search_templates("x").await.unwrap().is_empty());

        let record = service.template(&TemplateId::from(9)).await.unwrap();
        assert_eq!(record.id, Some(TemplateId::from(9)));
        assert_eq!(record.title, "Intro");

        let response = service
            .login(&Credentials::new("ann@example.com", "pw"))
            .await
            .unwrap();
        assert!(response.token.is_none());
    }

    #[tokio::test]
    async fn test_errors_pass_through_unchanged() {
        let service = FormsService::new(StubProvider);

        let error = service.popular_templates().await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ServiceUnavailable);
        assert_eq!(error.message.as_deref(), Some("down"));

        let error = service.my_templates().await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Authentication);
        assert_eq!(error.message.as_deref(), Some("no token"));

        let error = service
            .register(&Registration::new("Ann", "ann@example.com", "pw"))
            .await
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
    }
}
