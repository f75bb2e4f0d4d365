//! The backend seam.

use crate::Result;
use crate::auth::{Credentials, LoginResponse, Registration};
use crate::listing::{FormSummary, OwnedTemplate, TemplateId, TemplateSummary};
use crate::template::{CreateTemplate, TemplateRecord};

/// Core trait for talking to the forms service.
///
/// Implementations decide how requests travel and how the session token
/// is attached; callers only see typed results. Implement this trait to
/// add a transport or a test double.
#[async_trait::async_trait]
pub trait FormsProvider: Send + Sync {
    /// `GET /templates`, newest first.
    async fn latest_templates(&self) -> Result<Vec<TemplateSummary>>;

    /// `GET /templates/popular`, most used first.
    async fn popular_templates(&self) -> Result<Vec<TemplateSummary>>;

    /// `GET /templates/search?query=...`.
    async fn search_templates(&self, query: &str) -> Result<Vec<TemplateSummary>>;

    /// `GET /templates/:id`.
    async fn template(&self, id: &TemplateId) -> Result<TemplateRecord>;

    /// `GET /templates/mine`, requires a session.
    async fn my_templates(&self) -> Result<Vec<OwnedTemplate>>;

    /// `GET /forms/mine`, requires a session.
    async fn my_forms(&self) -> Result<Vec<FormSummary>>;

    /// `POST /templates`, requires a session.
    async fn create_template(&self, request: &CreateTemplate) -> Result<()>;

    /// `POST /users/login`.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse>;

    /// `POST /users/register`.
    async fn register(&self, registration: &Registration) -> Result<()>;
}
