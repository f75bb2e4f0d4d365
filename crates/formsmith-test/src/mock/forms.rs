//! Mock forms backend.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use formsmith_core::auth::{Credentials, LoginResponse, Registration};
use formsmith_core::listing::{
    Author, FormId, FormSummary, FormTemplate, OwnedTemplate, TemplateId, TemplateSummary,
};
use formsmith_core::template::{CreateTemplate, CustomField, FlatRecord, TemplateRecord};
use formsmith_core::{BearerToken, ErrorKind, FormsProvider, FormsService, Result, Session};
use jiff::Timestamp;
use serde_json::json;

use super::{Operation, RecordedCall};

#[derive(Debug, Clone)]
struct MockUser {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Clone)]
struct StoredTemplate {
    id: TemplateId,
    author_email: String,
    record: FlatRecord,
    forms: Vec<FormId>,
}

#[derive(Debug, Default)]
struct MockState {
    users: Vec<MockUser>,
    tokens: HashMap<String, String>,
    templates: Vec<StoredTemplate>,
    forms: Vec<(String, FormId, TemplateId)>,
    failing: HashSet<Operation>,
    calls: Vec<RecordedCall>,
    next_id: i64,
}

impl MockState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user_name(&self, email: &str) -> String {
        self.users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| email.to_owned())
    }

    fn summary(&self, stored: &StoredTemplate) -> TemplateSummary {
        let text = |key: &str| {
            stored
                .record
                .get(key)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_owned()
        };

        TemplateSummary {
            id: stored.id.clone(),
            title: text("title"),
            description: text("description"),
            author: Author {
                name: self.user_name(&stored.author_email),
            },
            forms: stored.forms.iter().map(|id| json!({ "id": id })).collect(),
        }
    }
}

/// In-memory forms backend.
///
/// Templates are kept as flat records, exactly the shape the real service
/// returns from `GET /templates/:id`. The session handed to the constructor
/// plays the part of the `Authorization` header.
#[derive(Clone)]
pub struct MockFormsProvider {
    state: Arc<Mutex<MockState>>,
    session: Session,
}

impl std::fmt::Debug for MockFormsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockFormsProvider")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl MockFormsProvider {
    /// Creates an empty backend reading tokens from `session`.
    pub fn new(session: Session) -> Self {
        Self {
            state: Arc::default(),
            session,
        }
    }

    /// Converts this mock into a [`FormsService`]. Clones share state, so
    /// keep one around to inspect calls.
    pub fn into_service(self) -> FormsService {
        FormsService::new(self)
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a user account.
    pub fn with_user(self, name: &str, email: &str, password: &str) -> Self {
        self.lock().users.push(MockUser {
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        });
        self
    }

    /// Stores a template authored by `author_email` with `forms` submissions.
    pub fn seed_template(
        &self,
        author_email: &str,
        title: &str,
        description: &str,
        fields: &[CustomField],
        forms: usize,
    ) -> TemplateId {
        let record = TemplateRecord::new(None, title, description, fields);
        self.seed_record(author_email, record.to_flat(), forms)
    }

    /// Stores a raw flat record, assigning it an id and a creation time.
    pub fn seed_record(&self, author_email: &str, mut record: FlatRecord, forms: usize) -> TemplateId {
        let mut state = self.lock();
        let id = TemplateId::from(state.next_id());

        record.insert("id".into(), json!(id));
        record
            .entry("createdAt")
            .or_insert_with(|| json!(Timestamp::now().to_string()));

        let form_ids = (0..forms)
            .map(|_| FormId::from(state.next_id()))
            .collect();

        state.templates.push(StoredTemplate {
            id: id.clone(),
            author_email: author_email.to_owned(),
            record,
            forms: form_ids,
        });
        id
    }

    /// Records that `email` submitted a form against `template`.
    pub fn seed_form(&self, email: &str, template: &TemplateId) -> FormId {
        let mut state = self.lock();
        let id = FormId::from(state.next_id());
        if let Some(stored) = state.templates.iter_mut().find(|t| &t.id == template) {
            stored.forms.push(id.clone());
        }
        state.forms.push((email.to_owned(), id.clone(), template.clone()));
        id
    }

    /// Makes every call to `operation` fail with a network error.
    pub fn fail(&self, operation: Operation) {
        self.lock().failing.insert(operation);
    }

    /// Undoes [`fail`](Self::fail).
    pub fn recover(&self, operation: Operation) {
        self.lock().failing.remove(&operation);
    }

    /// All calls received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Calls received for one operation.
    pub fn calls_for(&self, operation: Operation) -> Vec<RecordedCall> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.operation == operation)
            .cloned()
            .collect()
    }

    /// Titles of all stored templates, oldest first.
    pub fn template_titles(&self) -> Vec<String> {
        self.lock()
            .templates
            .iter()
            .filter_map(|t| t.record.get("title")?.as_str().map(str::to_owned))
            .collect()
    }

    /// The raw stored record of a template.
    pub fn stored_record(&self, id: &TemplateId) -> Option<FlatRecord> {
        self.lock()
            .templates
            .iter()
            .find(|t| &t.id == id)
            .map(|t| t.record.clone())
    }

    /// Records the call and applies failure injection.
    fn begin(&self, operation: Operation, query: Option<&str>) -> Result<MutexGuard<'_, MockState>> {
        let token = self.session.get();
        let mut state = self.lock();

        state.calls.push(RecordedCall {
            operation,
            authorized: token.is_some(),
            query: query.map(str::to_owned),
        });

        if state.failing.contains(&operation) {
            return Err(ErrorKind::NetworkError
                .with_message(format!("mock failure for {operation}")));
        }

        Ok(state)
    }

    /// Email of the user owning the session's token.
    fn caller(&self, state: &MockState) -> Result<String> {
        let token = self
            .session
            .get()
            .ok_or_else(|| ErrorKind::Authentication.with_message("HTTP 401"))?;

        state
            .tokens
            .get(token.expose())
            .cloned()
            .ok_or_else(|| ErrorKind::Authentication.with_message("HTTP 401"))
    }
}

#[async_trait::async_trait]
impl FormsProvider for MockFormsProvider {
    async fn latest_templates(&self) -> Result<Vec<TemplateSummary>> {
        let state = self.begin(Operation::LatestTemplates, None)?;
        Ok(state.templates.iter().rev().map(|t| state.summary(t)).collect())
    }

    async fn popular_templates(&self) -> Result<Vec<TemplateSummary>> {
        let state = self.begin(Operation::PopularTemplates, None)?;
        let mut templates: Vec<_> = state.templates.iter().collect();
        templates.sort_by(|a, b| b.forms.len().cmp(&a.forms.len()));
        Ok(templates.into_iter().map(|t| state.summary(t)).collect())
    }

    async fn search_templates(&self, query: &str) -> Result<Vec<TemplateSummary>> {
        let state = self.begin(Operation::SearchTemplates, Some(query))?;
        let needle = query.to_lowercase();

        Ok(state
            .templates
            .iter()
            .map(|t| state.summary(t))
            .filter(|s| {
                s.title.to_lowercase().contains(&needle)
                    || s.description.to_lowercase().contains(&needle)
            })
            .collect())
    }

    async fn template(&self, id: &TemplateId) -> Result<TemplateRecord> {
        let state = self.begin(Operation::Template, None)?;
        let stored = state
            .templates
            .iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| ErrorKind::NotFound.with_message("HTTP 404"))?;

        TemplateRecord::from_flat(stored.record.clone())
    }

    async fn my_templates(&self) -> Result<Vec<OwnedTemplate>> {
        let state = self.begin(Operation::MyTemplates, None)?;
        let email = self.caller(&state)?;

        Ok(state
            .templates
            .iter()
            .filter(|t| t.author_email == email)
            .map(|t| {
                let summary = state.summary(t);
                OwnedTemplate {
                    id: summary.id,
                    title: summary.title,
                    description: summary.description,
                }
            })
            .collect())
    }

    async fn my_forms(&self) -> Result<Vec<FormSummary>> {
        let state = self.begin(Operation::MyForms, None)?;
        let email = self.caller(&state)?;

        Ok(state
            .forms
            .iter()
            .filter(|(owner, _, _)| *owner == email)
            .map(|(_, id, template_id)| FormSummary {
                id: id.clone(),
                template: state.templates.iter().find(|t| &t.id == template_id).map(|t| {
                    let summary = state.summary(t);
                    FormTemplate {
                        title: summary.title,
                        description: summary.description,
                    }
                }),
            })
            .collect())
    }

    async fn create_template(&self, request: &CreateTemplate) -> Result<()> {
        let email = {
            let state = self.begin(Operation::CreateTemplate, None)?;
            self.caller(&state)?
        };

        self.seed_template(
            &email,
            &request.title,
            &request.description,
            &request.custom_fields,
            0,
        );
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        let mut state = self.begin(Operation::Login, None)?;

        let known = state
            .users
            .iter()
            .any(|u| u.email == credentials.email && u.password == credentials.password);
        if !known {
            return Err(ErrorKind::Authentication.with_message("HTTP 401"));
        }

        let raw = format!("mock-token-{}", state.next_id());
        state.tokens.insert(raw.clone(), credentials.email.clone());

        Ok(LoginResponse {
            token: Some(BearerToken::new(raw)?),
        })
    }

    async fn register(&self, registration: &Registration) -> Result<()> {
        let mut state = self.begin(Operation::Register, None)?;

        if state.users.iter().any(|u| u.email == registration.email) {
            return Err(ErrorKind::InvalidInput.with_message("HTTP 400"));
        }

        state.users.push(MockUser {
            name: registration.name.clone(),
            email: registration.email.clone(),
            password: registration.password.clone(),
        });
        Ok(())
    }
}
