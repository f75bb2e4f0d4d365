//! Subcommands and their execution.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Subcommand};
use formsmith_core::auth::Credentials;
use formsmith_core::listing::TemplateId;
use formsmith_core::template::{CreateTemplate, CustomField, FieldKind, FieldUpdate};
use formsmith_core::{FormsService, Session};
use formsmith_pages::{
    LoginPage, OwnerCollection, RegisterPage, TemplateBrowser, TemplateBuilder, TemplateViewer,
    logout,
};

use crate::TRACING_TARGET_COMMAND;
use crate::render;

/// What to do.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create an account.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "FORMSMITH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log in and remember the session token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FORMSMITH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the session token.
    Logout,
    /// Show the latest and most popular templates.
    Home,
    /// Search templates by text.
    Search {
        /// Text to look for.
        query: String,
    },
    /// Show one template and its questions.
    Template {
        /// Template identifier.
        id: TemplateId,
    },
    /// Show your templates and the forms you filled.
    Mine,
    /// Create a new template.
    Create(CreateArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::Home => "home",
            Self::Search { .. } => "search",
            Self::Template { .. } => "template",
            Self::Mine => "mine",
            Self::Create(_) => "create",
        }
    }

    /// Runs the command, writing its page to `out`.
    pub async fn execute<W: Write>(self, context: &CommandContext, out: &mut W) -> anyhow::Result<()> {
        tracing::debug!(target: TRACING_TARGET_COMMAND, command = self.name(), "Executing command");
        let service = &context.service;

        match self {
            Self::Register {
                name,
                email,
                password,
            } => {
                let mut page = RegisterPage::new();
                page.name = name;
                page.email = email;
                page.password = password;

                let route = page.submit(service).await;
                if let Some(notice) = page.notice()
                    && !notice.is_success
                {
                    bail!(notice.text);
                }
                if let Some(notice) = page.notice() {
                    writeln!(out, "{}", notice.text)?;
                }
                if let Some(route) = route {
                    writeln!(out, "Next: {route}")?;
                }
            }
            Self::Login { email, password } => {
                let mut page = LoginPage::new(context.session.clone());
                let credentials = Credentials::new(email, password);

                match page.submit(service, &credentials).await {
                    Some(route) => writeln!(out, "Logged in. Next: {route}")?,
                    None => match page.notice() {
                        Some(notice) => bail!(notice.text),
                        None => writeln!(out, "No token received; still logged out.")?,
                    },
                }
            }
            Self::Logout => {
                let route = logout(&context.session);
                writeln!(out, "Logged out. Next: {route}")?;
            }
            Self::Home => {
                let mut browser = TemplateBrowser::new(service.clone());
                browser.mount().await;
                render::write_browser(out, &browser)?;
            }
            Self::Search { query } => {
                let mut browser = TemplateBrowser::new(service.clone());
                if !browser.search(&query).await {
                    bail!("search query must not be blank");
                }
                render::write_search(out, browser.search_state())?;
            }
            Self::Template { id } => {
                let mut viewer = TemplateViewer::new(id.clone());
                viewer.load(service).await;
                let Some(record) = viewer.record() else {
                    bail!("template {id} could not be loaded");
                };
                render::write_template(out, record)?;
            }
            Self::Mine => {
                if !context.session.is_authenticated() {
                    tracing::warn!(
                        target: TRACING_TARGET_COMMAND,
                        "Not logged in; the service will reject this request"
                    );
                }
                let mut page = OwnerCollection::new(service.clone());
                page.load().await;
                render::write_owner(out, &page)?;
            }
            Self::Create(args) => {
                let builder = args.into_builder()?;
                let request = builder.validate().context("template is incomplete")?;
                tracing::debug!(
                    target: TRACING_TARGET_COMMAND,
                    title = %request.title,
                    fields = request.custom_fields.len(),
                    "Submitting template"
                );

                let Some(route) = builder.submit(service).await else {
                    bail!("failed to create template");
                };
                writeln!(out, "Template created. Next: {route}")?;
            }
        }

        Ok(())
    }
}

/// Template contents for `create`, from flags or a JSON file.
#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    /// Template title.
    #[arg(long, required_unless_present = "from_file")]
    pub title: Option<String>,

    /// Template description.
    #[arg(long, required_unless_present = "from_file")]
    pub description: Option<String>,

    /// A question as `kind:text`, where kind is string, text, integer or checkbox.
    /// Repeat to add more; order is kept.
    #[arg(long = "field", value_parser = parse_field)]
    pub fields: Vec<CustomField>,

    /// JSON file holding `{ "title", "description", "customFields" }`.
    #[arg(long, conflicts_with_all = ["title", "description", "fields"])]
    pub from_file: Option<PathBuf>,
}

impl CreateArgs {
    /// Fills a builder the same way the authoring page would.
    pub fn into_builder(self) -> anyhow::Result<TemplateBuilder> {
        let template = match self.from_file {
            Some(path) => {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str::<CreateTemplate>(&contents)
                    .with_context(|| format!("invalid template file {}", path.display()))?
            }
            None => CreateTemplate {
                title: self.title.unwrap_or_default(),
                description: self.description.unwrap_or_default(),
                custom_fields: self.fields,
            },
        };

        let mut builder = TemplateBuilder::new();
        builder.set_title(template.title);
        builder.set_description(template.description);
        for field in template.custom_fields {
            let index = builder.add_field(field.kind);
            builder.update_field(index, FieldUpdate::Question(field.question));
            builder.update_field(index, FieldUpdate::Enabled(field.enabled));
        }

        Ok(builder)
    }
}

/// Parses `kind:question`.
fn parse_field(value: &str) -> Result<CustomField, String> {
    let (kind, question) = value
        .split_once(':')
        .ok_or_else(|| format!("expected kind:question, got '{value}'"))?;

    let kind: FieldKind = kind
        .trim()
        .to_lowercase()
        .parse()
        .map_err(|_| format!("unknown field kind '{kind}'"))?;

    Ok(CustomField::new(kind).with_question(question.trim()))
}

/// Shared handles commands run against.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub service: FormsService,
    pub session: Session,
}

impl CommandContext {
    pub fn new(service: FormsService, session: Session) -> Self {
        Self { service, session }
    }
}
