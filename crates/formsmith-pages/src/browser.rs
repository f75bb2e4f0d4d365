//! Landing and dashboard pages: latest, popular and search.

use formsmith_core::FormsService;
use formsmith_core::listing::{Ranked, TemplateSummary, rank_first, take_first};

use crate::search::{PendingSearch, SearchOutcome, SearchState};
use crate::TRACING_TARGET_BROWSER;

/// Number of latest templates shown.
pub const LATEST_LIMIT: usize = 6;

/// Number of popular templates ranked.
pub const POPULAR_LIMIT: usize = 5;

/// Template browser shared by the home page and the dashboard.
#[derive(Debug, Clone)]
pub struct TemplateBrowser {
    service: FormsService,
    latest: Vec<TemplateSummary>,
    popular: Vec<Ranked<TemplateSummary>>,
    search: SearchState,
}

impl TemplateBrowser {
    pub fn new(service: FormsService) -> Self {
        Self {
            service,
            latest: Vec::new(),
            popular: Vec::new(),
            search: SearchState::new(),
        }
    }

    /// Loads latest and popular templates concurrently.
    ///
    /// The two requests fail independently; a failed list stays empty.
    pub async fn mount(&mut self) {
        let (latest, popular) = tokio::join!(
            self.service.latest_templates(),
            self.service.popular_templates()
        );

        match latest {
            Ok(items) => self.latest = take_first(items, LATEST_LIMIT),
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_BROWSER,
                    error = %error,
                    "Error fetching latest templates"
                );
            }
        }

        match popular {
            Ok(items) => self.popular = rank_first(items, POPULAR_LIMIT),
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_BROWSER,
                    error = %error,
                    "Error fetching popular templates"
                );
            }
        }

        tracing::debug!(
            target: TRACING_TARGET_BROWSER,
            latest = self.latest.len(),
            popular = self.popular.len(),
            "Browser mounted"
        );
    }

    pub fn latest(&self) -> &[TemplateSummary] {
        &self.latest
    }

    pub fn popular(&self) -> &[Ranked<TemplateSummary>] {
        &self.popular
    }

    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    /// Accepts a query and returns the request to run, or `None` for a
    /// blank query. Use with [`finish_search`](Self::finish_search) when
    /// searches may overlap.
    pub fn begin_search(&mut self, query: &str) -> Option<PendingSearch> {
        let ticket = self.search.begin(query)?;
        Some(PendingSearch::new(ticket, query, self.service.clone()))
    }

    /// Applies a finished search; superseded ones are dropped.
    pub fn finish_search(&mut self, outcome: SearchOutcome) -> bool {
        self.search.complete(outcome)
    }

    /// Runs one search to completion. Returns `false` for a blank query.
    pub async fn search(&mut self, query: &str) -> bool {
        let Some(pending) = self.begin_search(query) else {
            return false;
        };

        let outcome = pending.run().await;
        self.finish_search(outcome)
    }
}

#[cfg(test)]
mod tests {
    use formsmith_core::Session;
    use formsmith_test::{MockFormsProvider, Operation};

    use super::*;
    use crate::search::{NO_RESULTS_MESSAGE, SearchStatus};

    fn seeded(count: usize) -> MockFormsProvider {
        let mock = MockFormsProvider::new(Session::in_memory()).with_user("Ann", "ann@example.com", "pw");
        for i in 0..count {
            mock.seed_template("ann@example.com", &format!("Template {i}"), "about forms", &[], i);
        }
        mock
    }

    #[tokio::test]
    async fn test_mount_truncates_lists() {
        let mock = seeded(8);
        let mut browser = TemplateBrowser::new(mock.clone().into_service());
        browser.mount().await;

        assert_eq!(browser.latest().len(), LATEST_LIMIT);
        assert_eq!(browser.latest()[0].title, "Template 7");

        let ranks: Vec<_> = browser.popular().iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
        assert_eq!(browser.popular()[0].item.form_count(), 7);
    }

    #[tokio::test]
    async fn test_mount_failures_are_independent() {
        let mock = seeded(2);
        mock.fail(Operation::PopularTemplates);

        let mut browser = TemplateBrowser::new(mock.clone().into_service());
        browser.mount().await;

        assert_eq!(browser.latest().len(), 2);
        assert!(browser.popular().is_empty());
    }

    #[tokio::test]
    async fn test_blank_search_sends_nothing() {
        let mock = seeded(1);
        let mut browser = TemplateBrowser::new(mock.clone().into_service());

        assert!(browser.search("Template").await);
        assert!(!browser.search("  ").await);

        assert_eq!(mock.calls_for(Operation::SearchTemplates).len(), 1);
        assert_eq!(browser.search_state().results().len(), 1);
        assert_eq!(browser.search_state().status(), SearchStatus::Found);
    }

    #[tokio::test]
    async fn test_search_without_matches() {
        let mock = seeded(1);
        let mut browser = TemplateBrowser::new(mock.clone().into_service());

        assert_eq!(browser.search_state().message(), None);
        browser.search("nothing like this").await;

        assert_eq!(browser.search_state().status(), SearchStatus::NoResults);
        assert_eq!(browser.search_state().message(), Some(NO_RESULTS_MESSAGE));
    }

    #[tokio::test]
    async fn test_overlapping_searches_keep_latest() {
        let mock = seeded(3);
        let mut browser = TemplateBrowser::new(mock.clone().into_service());

        let first = browser.begin_search("Template 1").unwrap();
        let second = browser.begin_search("Template 2").unwrap();
        assert!(browser.search_state().is_searching());

        let (first, second) = tokio::join!(first.run(), second.run());
        assert!(browser.finish_search(second));
        assert!(!browser.finish_search(first));

        let results = browser.search_state().results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Template 2");
        assert!(!browser.search_state().is_searching());
    }

    #[tokio::test]
    async fn test_search_query_is_sent_verbatim() {
        let mock = seeded(0);
        let mut browser = TemplateBrowser::new(mock.clone().into_service());
        browser.search(" a b&c ").await;

        let calls = mock.calls_for(Operation::SearchTemplates);
        assert_eq!(calls[0].query.as_deref(), Some(" a b&c "));
    }
}
