//! Forms API client implementation using reqwest.

use std::sync::Arc;
use std::time::Instant;

use formsmith_core::auth::{Credentials, LoginResponse, Registration};
use formsmith_core::listing::{FormSummary, OwnedTemplate, TemplateId, TemplateSummary};
use formsmith_core::template::{CreateTemplate, TemplateRecord};
use formsmith_core::{FormsProvider, FormsService, Session};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, status_kind};
use crate::{ReqwestConfig, TRACING_TARGET};

/// Longest slice of an error body copied into error messages.
const MAX_ERROR_BODY_CHARS: usize = 256;

/// Inner client that holds the HTTP client, configuration and session.
struct ReqwestClientInner {
    http: Client,
    config: ReqwestConfig,
    base_url: Url,
    session: Session,
}

/// Reqwest-based HTTP client for the forms service.
///
/// Every request carries `Authorization: Bearer <token>` while the
/// [`Session`] holds a token, and no such header once it is cleared.
///
/// # Examples
///
/// ```rust,ignore
/// use formsmith_core::Session;
/// use formsmith_reqwest::{ReqwestClient, ReqwestConfig};
///
/// let session = Session::open("/home/me/.formsmith/session")?;
/// let client = ReqwestClient::new(ReqwestConfig::default(), session)?;
/// let service = client.into_service();
/// let latest = service.latest_templates().await?;
/// ```
#[derive(Clone)]
pub struct ReqwestClient {
    inner: Arc<ReqwestClientInner>,
}

impl std::fmt::Debug for ReqwestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestClient")
            .field("config", &self.inner.config)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}

impl ReqwestClient {
    /// Creates a new client with the given configuration and session.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: ReqwestConfig, session: Session) -> formsmith_core::Result<Self> {
        config.validate()?;
        let base_url = config.base_url()?;

        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %base_url,
            timeout_secs = ?config.http_timeout,
            "Creating reqwest client"
        );

        let mut builder = Client::builder().user_agent(config.effective_user_agent());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(Error::from)?;

        let inner = ReqwestClientInner {
            http,
            config,
            base_url,
            session,
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ReqwestConfig {
        &self.inner.config
    }

    /// Gets the session whose token is attached to requests.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Converts this client into a [`FormsService`] for use with dependency injection.
    pub fn into_service(self) -> FormsService {
        FormsService::new(self)
    }

    /// Starts a request to `path` relative to the API base URL.
    pub(crate) fn request(&self, method: Method, path: &str) -> crate::Result<RequestBuilder> {
        let url = self.inner.base_url.join(path)?;
        Ok(self.request_url(method, url))
    }

    /// Builds an endpoint URL from path segments under the API base URL.
    ///
    /// Each segment is percent-encoded, so an identifier can never add a
    /// query, a fragment or another path level.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> crate::Result<Url> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Starts a request to an absolute URL.
    ///
    /// The session token is read here, once per request.
    fn request_url(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .inner
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json");

        match self.inner.session.get() {
            Some(token) => builder.header(AUTHORIZATION, token.header_value()),
            None => builder,
        }
    }

    /// Sends a request and maps non-success statuses to errors.
    async fn send(&self, builder: RequestBuilder) -> formsmith_core::Result<Response> {
        let started_at = Instant::now();
        let response = builder.send().await.map_err(Error::from)?;
        let status = response.status();

        tracing::debug!(
            target: TRACING_TARGET,
            url = %response.url(),
            status = status.as_u16(),
            elapsed_ms = started_at.elapsed().as_millis(),
            "Response received"
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let snippet: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        let mut error = status_kind(status).with_message(format!("HTTP {}", status.as_u16()));
        if !snippet.is_empty() {
            error = error.with_context(snippet);
        }

        Err(error)
    }

    async fn fetch_json<T>(&self, builder: RequestBuilder) -> formsmith_core::Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(builder).await?;
        let body = response.text().await.map_err(Error::from)?;
        let value = serde_json::from_str(&body).map_err(Error::from)?;
        Ok(value)
    }

    async fn get_json<T>(&self, path: &str) -> formsmith_core::Result<T>
    where
        T: DeserializeOwned,
    {
        let builder = self.request(Method::GET, path)?;
        self.fetch_json(builder).await
    }
}

#[async_trait::async_trait]
impl FormsProvider for ReqwestClient {
    async fn latest_templates(&self) -> formsmith_core::Result<Vec<TemplateSummary>> {
        self.get_json("templates").await
    }

    async fn popular_templates(&self) -> formsmith_core::Result<Vec<TemplateSummary>> {
        self.get_json("templates/popular").await
    }

    async fn search_templates(&self, query: &str) -> formsmith_core::Result<Vec<TemplateSummary>> {
        let builder = self
            .request(Method::GET, "templates/search")?
            .query(&[("query", query)]);
        self.fetch_json(builder).await
    }

    async fn template(&self, id: &TemplateId) -> formsmith_core::Result<TemplateRecord> {
        let url = self.endpoint(&["templates", id.as_str()])?;
        self.fetch_json(self.request_url(Method::GET, url)).await
    }

    async fn my_templates(&self) -> formsmith_core::Result<Vec<OwnedTemplate>> {
        self.get_json("templates/mine").await
    }

    async fn my_forms(&self) -> formsmith_core::Result<Vec<FormSummary>> {
        self.get_json("forms/mine").await
    }

    async fn create_template(&self, request: &CreateTemplate) -> formsmith_core::Result<()> {
        tracing::debug!(
            target: TRACING_TARGET,
            fields = request.custom_fields.len(),
            "Creating template"
        );

        let body = serde_json::to_vec(request).map_err(Error::from)?;
        let builder = self.request(Method::POST, "templates")?.body(body);
        self.send(builder).await?;
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> formsmith_core::Result<LoginResponse> {
        let body = serde_json::to_vec(credentials).map_err(Error::from)?;
        let builder = self.request(Method::POST, "users/login")?.body(body);
        self.fetch_json(builder).await
    }

    async fn register(&self, registration: &Registration) -> formsmith_core::Result<()> {
        let body = serde_json::to_vec(registration).map_err(Error::from)?;
        let builder = self.request(Method::POST, "users/register")?.body(body);
        self.send(builder).await?;
        Ok(())
    }
}
