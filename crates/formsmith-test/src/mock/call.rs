//! Call recording.

use strum::{AsRefStr, Display, EnumIter};

/// Operations exposed by the forms service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    LatestTemplates,
    PopularTemplates,
    SearchTemplates,
    Template,
    MyTemplates,
    MyForms,
    CreateTemplate,
    Login,
    Register,
}

/// One call received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub operation: Operation,
    /// Whether a bearer token was attached.
    pub authorized: bool,
    /// Search text, for search calls.
    pub query: Option<String>,
}
