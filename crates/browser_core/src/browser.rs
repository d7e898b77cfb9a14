//! Async driver around [`NavigationController`]: runs each pending fetch on
//! the tokio runtime and commits outcomes as they arrive.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error};

use crate::{
    error::ViewError,
    fetch::Commit,
    navigation::{FetchOutcome, NavigationController, Transition, ViewSnapshot},
    route::Route,
    sections::SectionId,
    transport::ProcedureService,
};

/// Everything a user can ask the browser to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    GlobalSearch(String),
    ScopedSearch { file_name: String, inner_name: String },
    OpenProgram(String),
    ToggleSection(SectionId),
    Navigate(Route),
    Back,
    Forward,
    Retry,
}

pub struct Browser {
    controller: NavigationController,
    service: Arc<dyn ProcedureService>,
    fetches: JoinSet<FetchOutcome>,
}

impl Browser {
    pub fn new(service: Arc<dyn ProcedureService>) -> Self {
        Self {
            controller: NavigationController::new(),
            service,
            fetches: JoinSet::new(),
        }
    }

    pub fn controller(&self) -> &NavigationController {
        &self.controller
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.controller.snapshot()
    }

    /// Fetches started but not yet committed or discarded.
    pub fn in_flight(&self) -> usize {
        self.fetches.len()
    }

    /// Applies `intent` and returns the view right after it. Any fetch it
    /// needs runs in the background; use [`Browser::next_completion`] or
    /// [`Browser::settle`] to apply results. Must be called inside a tokio
    /// runtime.
    pub fn dispatch(&mut self, intent: Intent) -> Result<ViewSnapshot, ViewError> {
        debug!(?intent, "dispatch");
        let transition = match intent {
            Intent::GlobalSearch(text) => self.controller.submit_global_search(&text),
            Intent::ScopedSearch {
                file_name,
                inner_name,
            } => self.controller.submit_scoped_search(&file_name, &inner_name),
            Intent::OpenProgram(name) => self.controller.open_program(&name),
            Intent::Navigate(route) => self.controller.navigate(route),
            Intent::ToggleSection(id) => return self.controller.toggle_section(id),
            Intent::Back => match self.controller.back() {
                Some(transition) => transition,
                None => return Ok(self.controller.snapshot()),
            },
            Intent::Forward => match self.controller.forward() {
                Some(transition) => transition,
                None => return Ok(self.controller.snapshot()),
            },
            Intent::Retry => match self.controller.retry() {
                Some(transition) => transition,
                None => return Ok(self.controller.snapshot()),
            },
        };
        Ok(self.start(transition))
    }

    /// Waits for the next fetch to finish and hands it to the controller.
    /// Returns `None` once nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Commit> {
        while let Some(joined) = self.fetches.join_next().await {
            match joined {
                Ok(outcome) => return Some(self.controller.complete(outcome)),
                Err(err) => error!(error = %err, "fetch task failed"),
            }
        }
        None
    }

    /// Drains every in-flight fetch and returns the resulting view.
    pub async fn settle(&mut self) -> ViewSnapshot {
        while self.next_completion().await.is_some() {}
        self.controller.snapshot()
    }

    fn start(&mut self, transition: Transition) -> ViewSnapshot {
        if let Some(fetch) = transition.fetch {
            let service = Arc::clone(&self.service);
            self.fetches
                .spawn(async move { fetch.execute(service.as_ref()).await });
        }
        transition.snapshot
    }
}

#[cfg(test)]
#[path = "tests/browser_tests.rs"]
mod tests;
