//! Navigation targets.

use std::fmt;

use formsmith_core::listing::{FormId, TemplateId};

/// A page of the client.
///
/// The edit and delete targets, and the form page, have no controller of
/// their own; they are only ever linked to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    Dashboard,
    MyPage,
    TemplateBuilder,
    Template(TemplateId),
    EditTemplate(TemplateId),
    DeleteTemplate(TemplateId),
    Form(FormId),
    EditForm(FormId),
    DeleteForm(FormId),
}

impl Route {
    /// URL path of this route.
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::Login => "/login".to_owned(),
            Self::Register => "/register".to_owned(),
            Self::Dashboard => "/dashboard".to_owned(),
            Self::MyPage => "/mypage".to_owned(),
            Self::TemplateBuilder => "/templatebuilder".to_owned(),
            Self::Template(id) => format!("/templates/{id}"),
            Self::EditTemplate(id) => format!("/edit-template/{id}"),
            Self::DeleteTemplate(id) => format!("/delete-template/{id}"),
            Self::Form(id) => format!("/forms/{id}"),
            Self::EditForm(id) => format!("/edit-form/{id}"),
            Self::DeleteForm(id) => format!("/delete-form/{id}"),
        }
    }

    /// Whether the page needs a session token to show anything.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Dashboard | Self::MyPage | Self::TemplateBuilder)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
