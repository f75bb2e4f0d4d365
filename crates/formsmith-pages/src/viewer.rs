//! Single template page.

use formsmith_core::FormsService;
use formsmith_core::listing::TemplateId;
use formsmith_core::template::{QuestionBlock, TemplateRecord};

use crate::TRACING_TARGET_VIEWER;

/// Shown in place of the question list when no question is active.
pub const NO_QUESTIONS_MESSAGE: &str = "No custom questions available.";

/// Loading state of a [`TemplateViewer`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewerState {
    #[default]
    Loading,
    Loaded(Box<TemplateRecord>),
}

/// Displays one template.
///
/// The viewer stays in [`ViewerState::Loading`] until a fetch succeeds.
/// A failed fetch is logged and not retried.
#[derive(Debug, Clone)]
pub struct TemplateViewer {
    id: TemplateId,
    state: ViewerState,
}

impl TemplateViewer {
    pub fn new(id: TemplateId) -> Self {
        Self {
            id,
            state: ViewerState::Loading,
        }
    }

    pub fn id(&self) -> &TemplateId {
        &self.id
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewerState::Loading)
    }

    /// The loaded template, if any.
    pub fn record(&self) -> Option<&TemplateRecord> {
        match &self.state {
            ViewerState::Loading => None,
            ViewerState::Loaded(record) => Some(record),
        }
    }

    /// Fetches the template once. Returns whether it is now loaded.
    pub async fn load(&mut self, service: &FormsService) -> bool {
        match service.template(&self.id).await {
            Ok(record) => {
                tracing::debug!(
                    target: TRACING_TARGET_VIEWER,
                    template_id = %self.id,
                    slots = record.slots.len(),
                    "Template loaded"
                );
                self.state = ViewerState::Loaded(Box::new(record));
                true
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_VIEWER,
                    template_id = %self.id,
                    error = %error,
                    "Error fetching template"
                );
                false
            }
        }
    }

    /// Active questions in slot order; empty while loading.
    pub fn question_blocks(&self) -> Vec<QuestionBlock> {
        self.record()
            .map(TemplateRecord::question_blocks)
            .unwrap_or_default()
    }
}
