use tracing::{debug, warn};

use crate::{
    error::FetchError,
    fetch::{Commit, FetchStatus, FetchTicket, GenerationCounter},
    query::SearchQuery,
    results::{apply_results, RawResults, ResultSet},
};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchSnapshot {
    pub query: Option<SearchQuery>,
    pub status: FetchStatus,
    pub results: ResultSet,
}

/// State of the search results view. A failed fetch only changes `status`;
/// `results` keeps whatever was last committed.
#[derive(Debug, Default)]
pub struct SearchView {
    query: Option<SearchQuery>,
    generations: GenerationCounter,
    status: FetchStatus,
    results: ResultSet,
}

impl SearchView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a search for `query`, superseding any fetch still in flight.
    pub fn submit(&mut self, query: SearchQuery) -> FetchTicket {
        let ticket = self.generations.advance();
        self.results = ResultSet::empty_for(&query);
        self.query = Some(query);
        self.status = FetchStatus::Loading;
        ticket
    }

    /// Re-issues the current query. Results stay visible until the new fetch
    /// commits.
    pub fn retry(&mut self) -> Option<(SearchQuery, FetchTicket)> {
        let query = self.query.clone()?;
        let ticket = self.generations.advance();
        self.status = FetchStatus::Loading;
        Some((query, ticket))
    }

    pub fn resolve(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<RawResults, FetchError>,
    ) -> Commit {
        if !self.generations.is_current(ticket) || !self.status.is_loading() {
            debug!(
                generation = ticket.generation().value(),
                "discarding superseded search response"
            );
            return Commit::Superseded;
        }

        match outcome {
            Ok(raw) => {
                self.results = apply_results(raw);
                self.status = FetchStatus::Ready;
            }
            Err(err) => {
                warn!(query = ?self.query, error = %err, "search failed");
                self.status = FetchStatus::Error(err);
            }
        }
        Commit::Applied
    }

    /// Leaves the view; late responses for it are ignored from now on.
    pub fn discard(&mut self) {
        self.generations.invalidate();
        self.query = None;
        self.status = FetchStatus::Idle;
        self.results = ResultSet::default();
    }

    pub fn query(&self) -> Option<&SearchQuery> {
        self.query.as_ref()
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            query: self.query.clone(),
            status: self.status.clone(),
            results: self.results.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_search_replaces_results() {
        let mut view = SearchView::new();
        let ticket = view.submit(SearchQuery::global("bar"));
        assert!(view.status().is_loading());

        let commit = view.resolve(
            ticket,
            Ok(RawResults::Procedures(vec!["bar1".into(), "bar2".into()])),
        );

        assert_eq!(commit, Commit::Applied);
        assert_eq!(view.status(), &FetchStatus::Ready);
        assert_eq!(
            view.results(),
            &ResultSet::Procedures(vec!["bar1".into(), "bar2".into()])
        );
    }

    #[test]
    fn failed_search_keeps_results_and_reports_error() {
        let mut view = SearchView::new();
        let ticket = view.submit(SearchQuery::global("bar"));
        view.resolve(ticket, Ok(RawResults::Procedures(vec!["bar1".into()])));

        let (_, retry) = view.retry().expect("retry");
        let err = FetchError::Transport("connection refused".into());
        assert_eq!(view.resolve(retry, Err(err.clone())), Commit::Applied);

        assert_eq!(view.status().error(), Some(&err));
        assert_eq!(view.results(), &ResultSet::Procedures(vec!["bar1".into()]));
    }

    #[test]
    fn ready_with_no_matches_differs_from_error() {
        let mut ok = SearchView::new();
        let ticket = ok.submit(SearchQuery::global("zzz"));
        ok.resolve(ticket, Ok(RawResults::Procedures(Vec::new())));

        let mut failed = SearchView::new();
        let ticket = failed.submit(SearchQuery::global("zzz"));
        failed.resolve(ticket, Err(FetchError::Malformed("eof".into())));

        assert!(ok.results().is_empty() && failed.results().is_empty());
        assert_ne!(ok.status(), failed.status());
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut view = SearchView::new();
        let first = view.submit(SearchQuery::global("old"));
        let second = view.submit(SearchQuery::global("new"));

        assert_eq!(
            view.resolve(first, Ok(RawResults::Procedures(vec!["old.p".into()]))),
            Commit::Superseded
        );
        assert!(view.status().is_loading());
        assert!(view.results().is_empty());

        view.resolve(second, Ok(RawResults::Procedures(vec!["new.p".into()])));
        assert_eq!(view.results(), &ResultSet::Procedures(vec!["new.p".into()]));
    }

    #[test]
    fn discarded_view_ignores_late_responses() {
        let mut view = SearchView::new();
        let ticket = view.submit(SearchQuery::global("bar"));
        view.discard();

        assert_eq!(
            view.resolve(ticket, Ok(RawResults::Procedures(vec!["bar1".into()]))),
            Commit::Superseded
        );
        assert_eq!(view.status(), &FetchStatus::Idle);
    }
}
