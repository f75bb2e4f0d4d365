#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod auth;
mod browser;
mod builder;
mod owner;
mod route;
mod search;
mod viewer;

pub use auth::{
    INVALID_EMAIL_MESSAGE, LOGIN_FAILED_MESSAGE, LoginPage, Notice, REGISTERED_MESSAGE,
    REGISTRATION_FAILED_MESSAGE, RegisterPage, logout,
};
pub use browser::{LATEST_LIMIT, POPULAR_LIMIT, TemplateBrowser};
pub use builder::TemplateBuilder;
pub use owner::{NO_FORMS_MESSAGE, NO_TEMPLATES_MESSAGE, OwnerCollection};
pub use route::Route;
pub use search::{
    NO_RESULTS_MESSAGE, PendingSearch, SEARCH_FAILED_MESSAGE, SearchOutcome, SearchState,
    SearchStatus, SearchTicket,
};
pub use viewer::{NO_QUESTIONS_MESSAGE, TemplateViewer, ViewerState};

// Tracing target constants
pub const TRACING_TARGET_AUTH: &str = "formsmith_pages::auth";
pub const TRACING_TARGET_BROWSER: &str = "formsmith_pages::browser";
pub const TRACING_TARGET_BUILDER: &str = "formsmith_pages::builder";
pub const TRACING_TARGET_OWNER: &str = "formsmith_pages::owner";
pub const TRACING_TARGET_SEARCH: &str = "formsmith_pages::search";
pub const TRACING_TARGET_VIEWER: &str = "formsmith_pages::viewer";
