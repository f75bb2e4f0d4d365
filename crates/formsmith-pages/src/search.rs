//! Template search with stale-response protection.
//!
//! Every accepted search gets a [`SearchTicket`] with a higher sequence
//! number than the one before it. Only the completion carrying the latest
//! ticket is applied; anything older is dropped, so a slow response can
//! never overwrite the results of a newer query.

use formsmith_core::listing::TemplateSummary;
use formsmith_core::{FormsService, Result};

use crate::TRACING_TARGET_SEARCH;

/// Shown when a search succeeds with nothing to list.
pub const NO_RESULTS_MESSAGE: &str = "No results found for your query.";

/// Shown when a search request fails.
pub const SEARCH_FAILED_MESSAGE: &str = "An error occurred while searching. Please try again.";

/// Sequence number of an accepted search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchTicket(u64);

impl SearchTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

/// Outcome of the most recent search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchStatus {
    /// No search has been submitted.
    #[default]
    Idle,
    /// A search is in flight.
    Searching,
    /// The last search returned at least one template.
    Found,
    /// The last search succeeded but matched nothing.
    NoResults,
    /// The last search failed.
    Failed,
}

impl SearchStatus {
    /// Message to show under the search bar, if any.
    pub fn message(self) -> Option<&'static str> {
        match self {
            Self::NoResults => Some(NO_RESULTS_MESSAGE),
            Self::Failed => Some(SEARCH_FAILED_MESSAGE),
            Self::Idle | Self::Searching | Self::Found => None,
        }
    }
}

/// A search request that has been accepted but not yet sent.
#[derive(Debug, Clone)]
pub struct PendingSearch {
    ticket: SearchTicket,
    query: String,
    service: FormsService,
}

impl PendingSearch {
    pub(crate) fn new(ticket: SearchTicket, query: &str, service: FormsService) -> Self {
        Self {
            ticket,
            query: query.to_owned(),
            service,
        }
    }

    pub fn ticket(&self) -> SearchTicket {
        self.ticket
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Sends the request.
    pub async fn run(self) -> SearchOutcome {
        let result = self.service.search_templates(&self.query).await;
        SearchOutcome {
            ticket: self.ticket,
            result,
        }
    }
}

/// A finished search request, ready to be applied to a [`SearchState`].
#[derive(Debug)]
pub struct SearchOutcome {
    pub ticket: SearchTicket,
    pub result: Result<Vec<TemplateSummary>>,
}

/// Results and status of the search bar.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    issued: u64,
    pending: Option<SearchTicket>,
    status: SearchStatus,
    results: Vec<TemplateSummary>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts a query, or returns `None` for a blank one.
    ///
    /// A rejected query leaves the state exactly as it was.
    pub fn begin(&mut self, query: &str) -> Option<SearchTicket> {
        if query.trim().is_empty() {
            return None;
        }

        self.issued += 1;
        let ticket = SearchTicket(self.issued);
        self.pending = Some(ticket);
        self.status = SearchStatus::Searching;
        Some(ticket)
    }

    /// Applies a finished search. Returns `false` when it was superseded.
    pub fn complete(&mut self, outcome: SearchOutcome) -> bool {
        if self.pending != Some(outcome.ticket) {
            tracing::debug!(
                target: TRACING_TARGET_SEARCH,
                ticket = outcome.ticket.sequence(),
                latest = self.issued,
                "Discarding stale search response"
            );
            return false;
        }

        self.pending = None;
        match outcome.result {
            Ok(results) => {
                tracing::debug!(
                    target: TRACING_TARGET_SEARCH,
                    count = results.len(),
                    "Search completed"
                );
                self.status = if results.is_empty() {
                    SearchStatus::NoResults
                } else {
                    SearchStatus::Found
                };
                self.results = results;
            }
            Err(error) => {
                tracing::error!(target: TRACING_TARGET_SEARCH, error = %error, "Search error");
                self.status = SearchStatus::Failed;
            }
        }

        true
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn results(&self) -> &[TemplateSummary] {
        &self.results
    }

    /// Whether submission should be disabled.
    pub fn is_searching(&self) -> bool {
        self.pending.is_some()
    }

    pub fn message(&self) -> Option<&'static str> {
        self.status.message()
    }
}

#[cfg(test)]
mod tests {
    use formsmith_core::ErrorKind;
    use formsmith_core::listing::{Author, TemplateId};

    use super::*;

    fn summary(title: &str) -> TemplateSummary {
        TemplateSummary {
            id: TemplateId::from(1),
            title: title.to_owned(),
            description: String::new(),
            author: Author {
                name: "Ann".to_owned(),
            },
            forms: Vec::new(),
        }
    }

    fn found(ticket: SearchTicket, titles: &[&str]) -> SearchOutcome {
        SearchOutcome {
            ticket,
            result: Ok(titles.iter().map(|t| summary(t)).collect()),
        }
    }

    #[test]
    fn test_blank_query_is_rejected() {
        let mut state = SearchState::new();
        assert!(state.begin("").is_none());
        assert!(state.begin("   \t").is_none());
        assert_eq!(state.status(), SearchStatus::Idle);
        assert!(!state.is_searching());
    }

    #[test]
    fn test_tickets_increase() {
        let mut state = SearchState::new();
        let first = state.begin("a").unwrap();
        let second = state.begin("b").unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut state = SearchState::new();
        let slow = state.begin("old").unwrap();
        let fast = state.begin("new").unwrap();

        assert!(state.complete(found(fast, &["new result"])));
        assert!(!state.complete(found(slow, &["old result"])));

        assert_eq!(state.results().len(), 1);
        assert_eq!(state.results()[0].title, "new result");
        assert_eq!(state.status(), SearchStatus::Found);
    }

    #[test]
    fn test_older_completion_ignored_while_newer_pending() {
        let mut state = SearchState::new();
        let slow = state.begin("old").unwrap();
        state.begin("new").unwrap();

        assert!(!state.complete(found(slow, &["old result"])));
        assert!(state.is_searching());
        assert!(state.results().is_empty());
    }

    #[test]
    fn test_empty_result_differs_from_idle() {
        let mut state = SearchState::new();
        assert_eq!(state.message(), None);

        let ticket = state.begin("nothing").unwrap();
        state.complete(found(ticket, &[]));

        assert_eq!(state.status(), SearchStatus::NoResults);
        assert_eq!(state.message(), Some(NO_RESULTS_MESSAGE));
    }

    #[test]
    fn test_failure_keeps_previous_results() {
        let mut state = SearchState::new();
        let ticket = state.begin("forms").unwrap();
        state.complete(found(ticket, &["one"]));

        let ticket = state.begin("forms again").unwrap();
        state.complete(SearchOutcome {
            ticket,
            result: Err(ErrorKind::NetworkError.with_message("offline")),
        });

        assert_eq!(state.status(), SearchStatus::Failed);
        assert_eq!(state.message(), Some(SEARCH_FAILED_MESSAGE));
        assert_eq!(state.results().len(), 1);
        assert!(!state.is_searching());
    }
}
