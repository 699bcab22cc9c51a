//! Typeahead search relay
//!
//! Each dispatch takes a sequence number. A response is only trusted if the
//! sequence has not moved on by the time it arrives: a later dispatch or an
//! explicit [`SearchBridge::invalidate`] makes it stale, and stale responses
//! are dropped without touching the widget or notifying the user.

use crate::error::WorkflowError;
use crate::host::{ComponentContext, LookupWidget};
use crate::types::{SearchRequest, SearchResult};
use std::sync::atomic::{AtomicU64, Ordering};

/// Result of one search dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Latest dispatch; results were forwarded to the widget
    Delivered(Vec<SearchResult>),
    /// Superseded by a later dispatch or invalidated; discarded
    Stale,
}

/// Relays search requests to the backend
#[derive(Debug, Default)]
pub struct SearchBridge {
    latest: AtomicU64,
    dispatched: AtomicU64,
}

impl SearchBridge {
    /// Create bridge
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the sequence number for a new dispatch
    ///
    /// Every earlier dispatch becomes stale.
    #[inline]
    pub fn begin(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::SeqCst);
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Make every dispatch in flight stale without starting a new one
    pub fn invalidate(&self) {
        let sequence = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(sequence, "in-flight searches invalidated");
    }

    /// Dispatch `request` and relay its results to `lookup`
    ///
    /// # Errors
    /// - `WorkflowError::SearchFailed` for a failed latest dispatch, already
    ///   reported; the widget keeps its prior results
    pub async fn search(
        &self,
        ctx: &ComponentContext,
        lookup: Option<&dyn LookupWidget>,
        request: SearchRequest,
    ) -> Result<SearchOutcome, WorkflowError> {
        let ticket = self.begin();
        self.relay(ticket, ctx, lookup, request).await
    }

    /// Dispatch `request` under a sequence number taken with [`Self::begin`]
    ///
    /// # Errors
    /// - `WorkflowError::SearchFailed` for a failed latest dispatch, already
    ///   reported; the widget keeps its prior results
    pub async fn relay(
        &self,
        ticket: u64,
        ctx: &ComponentContext,
        lookup: Option<&dyn LookupWidget>,
        request: SearchRequest,
    ) -> Result<SearchOutcome, WorkflowError> {
        let response = ctx.service.search(&request).await;

        if self.latest.load(Ordering::SeqCst) != ticket {
            match &response {
                Ok(results) => tracing::debug!(
                    ticket,
                    term = %request.search_term,
                    count = results.len(),
                    "dropping stale search response"
                ),
                Err(e) => tracing::warn!(
                    ticket,
                    term = %request.search_term,
                    error = %e,
                    "dropping stale failed search response"
                ),
            }
            return Ok(SearchOutcome::Stale);
        }

        match response {
            Ok(results) => {
                tracing::debug!(ticket, count = results.len(), "search results delivered");
                if let Some(lookup) = lookup {
                    lookup.set_search_results(results.clone());
                }
                Ok(SearchOutcome::Delivered(results))
            }
            Err(e) => {
                let error = WorkflowError::SearchFailed(e);
                ctx.report(&error);
                Err(error)
            }
        }
    }

    /// Number of dispatches so far
    #[inline]
    #[must_use]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CreatorConfig;
    use crate::error::BackendError;
    use crate::host::{MockLookupWidget, MockNotifier, MockProductTeamService};
    use std::sync::Arc;

    fn context(service: MockProductTeamService, notifier: MockNotifier) -> ComponentContext {
        ComponentContext::new(Arc::new(service), Arc::new(notifier), CreatorConfig::default())
    }

    fn request(term: &str) -> SearchRequest {
        SearchRequest {
            search_term: term.to_string(),
            selected_ids: vec!["M1".to_string()],
            product_team_member_type_name: Some("T1".to_string()),
        }
    }

    #[tokio::test]
    async fn results_are_forwarded_to_widget() {
        let mut service = MockProductTeamService::new();
        service
            .expect_search()
            .withf(|r| {
                r.search_term == "Ann"
                    && r.selected_ids == ["M1"]
                    && r.product_team_member_type_name.as_deref() == Some("T1")
            })
            .returning(|_| Ok(vec![SearchResult::new("M9", "Account", "Ann")]));
        let mut lookup = MockLookupWidget::new();
        lookup
            .expect_set_search_results()
            .withf(|results| results.len() == 1 && results[0].id == "M9")
            .times(1)
            .return_const(());

        let bridge = SearchBridge::new();
        let outcome = bridge
            .search(&context(service, MockNotifier::new()), Some(&lookup), request("Ann"))
            .await
            .unwrap();

        assert!(matches!(outcome, SearchOutcome::Delivered(ref r) if r.len() == 1));
        assert_eq!(bridge.dispatched(), 1);
    }

    #[tokio::test]
    async fn failure_reports_and_leaves_widget_alone() {
        let expected = CreatorConfig::default().labels.search_team_member_failed;
        let mut service = MockProductTeamService::new();
        service
            .expect_search()
            .returning(|_| Err(BackendError::Unavailable("down".to_string())));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(move |t| t.message == expected)
            .times(1)
            .return_const(());
        let mut lookup = MockLookupWidget::new();
        lookup.expect_set_search_results().never();

        let bridge = SearchBridge::new();
        let result = bridge
            .search(&context(service, notifier), Some(&lookup), request("Ann"))
            .await;

        assert!(matches!(result, Err(WorkflowError::SearchFailed(_))));
    }

    #[tokio::test]
    async fn results_without_widget_are_returned() {
        let mut service = MockProductTeamService::new();
        service.expect_search().returning(|_| Ok(Vec::new()));

        let bridge = SearchBridge::new();
        let outcome = bridge
            .search(&context(service, MockNotifier::new()), None, request("zz"))
            .await
            .unwrap();

        assert_eq!(outcome, SearchOutcome::Delivered(Vec::new()));
    }

    #[tokio::test]
    async fn invalidated_dispatch_is_stale() {
        let mut service = MockProductTeamService::new();
        service
            .expect_search()
            .returning(|_| Ok(vec![SearchResult::new("M9", "Account", "Ann")]));
        let mut lookup = MockLookupWidget::new();
        lookup.expect_set_search_results().never();

        let bridge = SearchBridge::new();
        let ticket = bridge.begin();
        bridge.invalidate();
        let outcome = bridge
            .relay(ticket, &context(service, MockNotifier::new()), Some(&lookup), request("Ann"))
            .await
            .unwrap();

        assert_eq!(outcome, SearchOutcome::Stale);
        assert_eq!(bridge.dispatched(), 1);
    }

    #[tokio::test]
    async fn invalidated_failure_is_not_reported() {
        let mut service = MockProductTeamService::new();
        service
            .expect_search()
            .returning(|_| Err(BackendError::Unavailable("down".to_string())));
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();

        let bridge = SearchBridge::new();
        let ticket = bridge.begin();
        bridge.invalidate();
        let outcome = bridge
            .relay(ticket, &context(service, notifier), None, request("Ann"))
            .await
            .unwrap();

        assert_eq!(outcome, SearchOutcome::Stale);
    }
}
