use shared::protocol::ProcedureResponse;
use tracing::{debug, warn};

use crate::{
    error::{FetchError, ViewError},
    fetch::{Commit, FetchTicket},
    program_view::{ProgramIdentity, ProgramSnapshot, ProgramView},
    query::{build_query, QueryInput, SearchQuery},
    results::RawResults,
    route::{History, Route},
    search_view::{SearchSnapshot, SearchView},
    sections::SectionId,
    transport::ProcedureService,
};

/// What the user last typed into the search forms. Survives failed fetches
/// so a retry does not require retyping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryDraft {
    pub text: String,
    pub file_name: String,
    pub inner_name: String,
}

/// A fetch the caller must run and report back through
/// [`NavigationController::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingFetch {
    Search {
        ticket: FetchTicket,
        query: SearchQuery,
    },
    Program {
        ticket: FetchTicket,
        identity: ProgramIdentity,
    },
}

impl PendingFetch {
    pub async fn execute(self, service: &dyn ProcedureService) -> FetchOutcome {
        match self {
            PendingFetch::Search { ticket, query } => FetchOutcome::Search {
                ticket,
                result: service.search(&query).await,
            },
            PendingFetch::Program { ticket, identity } => FetchOutcome::Program {
                ticket,
                result: service.fetch_program(&identity).await,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Search {
        ticket: FetchTicket,
        result: Result<RawResults, FetchError>,
    },
    Program {
        ticket: FetchTicket,
        result: Result<ProcedureResponse, FetchError>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewSnapshot {
    Home { draft: QueryDraft },
    Search { draft: QueryDraft, view: SearchSnapshot },
    Program(ProgramSnapshot),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub location: Route,
    pub snapshot: ViewSnapshot,
    pub fetch: Option<PendingFetch>,
}

/// Owns the location, the history and the two views. Entering one view
/// discards the other, so a late response for the view being left can never
/// commit.
#[derive(Debug, Default)]
pub struct NavigationController {
    history: History,
    draft: QueryDraft,
    search: SearchView,
    program: ProgramView,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(&self) -> &Route {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn draft(&self) -> &QueryDraft {
        &self.draft
    }

    pub fn search_view(&self) -> &SearchView {
        &self.search
    }

    pub fn program_view(&self) -> &ProgramView {
        &self.program
    }

    pub fn submit_global_search(&mut self, text: &str) -> Transition {
        self.draft.text = text.to_string();
        let query = SearchQuery::global(text);
        self.history.push(query.route());
        self.enter_search(query)
    }

    /// An incomplete pair navigates nowhere: the returned transition carries
    /// the unchanged view and no fetch.
    pub fn submit_scoped_search(&mut self, file_name: &str, inner_name: &str) -> Transition {
        self.draft.file_name = file_name.to_string();
        self.draft.inner_name = inner_name.to_string();

        let input = QueryInput::Pair {
            file_name: Some(file_name.to_string()),
            inner_name: Some(inner_name.to_string()),
        };
        match build_query(input) {
            Some(query) => {
                self.history.push(query.route());
                self.enter_search(query)
            }
            None => {
                debug!("scoped search needs both a file name and an inner procedure name");
                self.stay()
            }
        }
    }

    pub fn open_program(&mut self, name: &str) -> Transition {
        let identity = ProgramIdentity::new(name);
        self.history.push(Route::Program {
            name: identity.name().to_string(),
        });
        self.enter_program(identity)
    }

    /// Direct entry by route, e.g. from a bookmark.
    pub fn navigate(&mut self, route: Route) -> Transition {
        let route = route.normalize();
        self.history.push(route.clone());
        self.enter(route)
    }

    pub fn back(&mut self) -> Option<Transition> {
        let route = self.history.back()?.clone();
        Some(self.enter(route))
    }

    pub fn forward(&mut self) -> Option<Transition> {
        let route = self.history.forward()?.clone();
        Some(self.enter(route))
    }

    /// Re-issues the fetch behind the current view, if it has one.
    pub fn retry(&mut self) -> Option<Transition> {
        let location = self.location().clone();
        let fetch = match location {
            Route::Home => return None,
            Route::Search { .. } | Route::SearchInnerProcedure { .. } => {
                let (query, ticket) = self.search.retry()?;
                PendingFetch::Search { ticket, query }
            }
            Route::Program { .. } => {
                let (identity, ticket) = self.program.retry()?;
                PendingFetch::Program { ticket, identity }
            }
        };
        Some(Transition {
            location,
            snapshot: self.snapshot(),
            fetch: Some(fetch),
        })
    }

    pub fn toggle_section(&mut self, id: SectionId) -> Result<ViewSnapshot, ViewError> {
        if !matches!(self.location(), Route::Program { .. }) {
            return Err(ViewError::NoActiveProgram);
        }
        if let Err(err) = self.program.toggle(id) {
            warn!(error = %err, "rejected section toggle");
            return Err(err);
        }
        Ok(self.snapshot())
    }

    /// Applies a resolved fetch. Responses that no longer match the current
    /// request are dropped.
    pub fn complete(&mut self, outcome: FetchOutcome) -> Commit {
        match outcome {
            FetchOutcome::Search { ticket, result } => self.search.resolve(ticket, result),
            FetchOutcome::Program { ticket, result } => self.program.resolve(ticket, result),
        }
    }

    /// True while the visible view waits for its fetch.
    pub fn is_loading(&self) -> bool {
        match self.location() {
            Route::Home => false,
            Route::Search { .. } | Route::SearchInnerProcedure { .. } => {
                self.search.status().is_loading()
            }
            Route::Program { .. } => self.program.status().is_loading(),
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        match self.location() {
            Route::Home => ViewSnapshot::Home {
                draft: self.draft.clone(),
            },
            Route::Search { .. } | Route::SearchInnerProcedure { .. } => ViewSnapshot::Search {
                draft: self.draft.clone(),
                view: self.search.snapshot(),
            },
            Route::Program { .. } => ViewSnapshot::Program(self.program.snapshot()),
        }
    }

    fn enter(&mut self, route: Route) -> Transition {
        match route {
            Route::Home => {
                self.search.discard();
                self.program.discard();
                self.stay()
            }
            Route::Search { contents } => self.enter_search(SearchQuery::global(contents)),
            Route::SearchInnerProcedure {
                file_name,
                inner_name,
            } => match SearchQuery::scoped(file_name, inner_name) {
                Some(query) => self.enter_search(query),
                None => self.stay(),
            },
            Route::Program { name } => self.enter_program(ProgramIdentity::new(name)),
        }
    }

    fn enter_search(&mut self, query: SearchQuery) -> Transition {
        self.program.discard();
        match &query {
            SearchQuery::Global { text } => self.draft.text = text.clone(),
            SearchQuery::Scoped {
                file_name,
                inner_name,
            } => {
                self.draft.file_name = file_name.clone();
                self.draft.inner_name = inner_name.clone();
            }
        }

        let ticket = self.search.submit(query.clone());
        debug!(?query, generation = ticket.generation().value(), "search started");
        Transition {
            location: self.location().clone(),
            snapshot: self.snapshot(),
            fetch: Some(PendingFetch::Search { ticket, query }),
        }
    }

    fn enter_program(&mut self, identity: ProgramIdentity) -> Transition {
        self.search.discard();
        let ticket = self.program.open(identity.clone());
        debug!(
            program = identity.name(),
            generation = ticket.generation().value(),
            "program fetch started"
        );
        Transition {
            location: self.location().clone(),
            snapshot: self.snapshot(),
            fetch: Some(PendingFetch::Program { ticket, identity }),
        }
    }

    fn stay(&self) -> Transition {
        Transition {
            location: self.location().clone(),
            snapshot: self.snapshot(),
            fetch: None,
        }
    }
}

#[cfg(test)]
#[path = "tests/navigation_tests.rs"]
mod tests;
