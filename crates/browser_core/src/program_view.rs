use shared::protocol::ProcedureResponse;
use tracing::{debug, warn};

use crate::{
    error::{FetchError, ViewError},
    fetch::{Commit, FetchStatus, FetchTicket, GenerationCounter},
    sections::{Section, SectionId, SectionSnapshot, SectionTree},
};

/// Routing key of a program view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProgramIdentity {
    name: String,
}

impl ProgramIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Service path segments for this program, unencoded.
    pub fn api_segments(&self) -> Vec<&str> {
        vec!["api", "procedure", self.name.as_str()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramSnapshot {
    pub identity: Option<ProgramIdentity>,
    pub status: FetchStatus,
    pub file_references: Vec<String>,
    pub sections: Vec<SectionSnapshot>,
    pub primary_section: Option<SectionId>,
}

/// One program visit: `Idle -> Loading -> Ready | Error`. Opening a program
/// (even the same one again) discards the previous tree entirely.
#[derive(Debug, Default)]
pub struct ProgramView {
    identity: Option<ProgramIdentity>,
    generations: GenerationCounter,
    status: FetchStatus,
    file_references: Vec<String>,
    tree: SectionTree,
}

impl ProgramView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, identity: ProgramIdentity) -> FetchTicket {
        let ticket = self.generations.advance();
        self.identity = Some(identity);
        self.status = FetchStatus::Loading;
        self.file_references.clear();
        self.tree = SectionTree::empty();
        ticket
    }

    pub fn retry(&mut self) -> Option<(ProgramIdentity, FetchTicket)> {
        let identity = self.identity.clone()?;
        let ticket = self.open(identity.clone());
        Some((identity, ticket))
    }

    pub fn resolve(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<ProcedureResponse, FetchError>,
    ) -> Commit {
        if !self.generations.is_current(ticket) || !self.status.is_loading() {
            debug!(
                generation = ticket.generation().value(),
                "discarding superseded program response"
            );
            return Commit::Superseded;
        }

        match outcome {
            Ok(response) => {
                self.file_references = response.file_references;
                self.tree = SectionTree::build(response.sections);
                self.status = FetchStatus::Ready;
                debug!(
                    program = ?self.identity,
                    sections = self.tree.len(),
                    has_primary = self.tree.primary_section().is_some(),
                    "program view ready"
                );
            }
            Err(err) => {
                warn!(program = ?self.identity, error = %err, "program fetch failed");
                self.file_references.clear();
                self.tree = SectionTree::empty();
                self.status = FetchStatus::Error(err);
            }
        }
        Commit::Applied
    }

    pub fn discard(&mut self) {
        self.generations.invalidate();
        self.identity = None;
        self.status = FetchStatus::Idle;
        self.file_references.clear();
        self.tree = SectionTree::empty();
    }

    pub fn toggle(&mut self, id: SectionId) -> Result<bool, ViewError> {
        self.tree.toggle(id)
    }

    pub fn identity(&self) -> Option<&ProgramIdentity> {
        self.identity.as_ref()
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn file_references(&self) -> &[String] {
        &self.file_references
    }

    pub fn tree(&self) -> &SectionTree {
        &self.tree
    }

    pub fn sections(&self) -> &[Section] {
        self.tree.sections()
    }

    pub fn primary_section(&self) -> Option<&Section> {
        self.tree.primary_section()
    }

    pub fn snapshot(&self) -> ProgramSnapshot {
        ProgramSnapshot {
            identity: self.identity.clone(),
            status: self.status.clone(),
            file_references: self.file_references.clone(),
            sections: self.tree.snapshot(),
            primary_section: self.tree.primary_section_id(),
        }
    }
}

#[cfg(test)]
#[path = "tests/program_view_tests.rs"]
mod tests;
