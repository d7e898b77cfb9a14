//! Request generations: only the newest fetch for a target may commit.

use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Handed out when a fetch starts; presented again when it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    generation: Generation,
}

impl FetchTicket {
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

#[derive(Debug, Default)]
pub(crate) struct GenerationCounter {
    current: Generation,
}

impl GenerationCounter {
    pub(crate) fn advance(&mut self) -> FetchTicket {
        self.current = self.current.next();
        FetchTicket {
            generation: self.current,
        }
    }

    /// Makes every outstanding ticket stale without issuing a new one.
    pub(crate) fn invalidate(&mut self) {
        self.current = self.current.next();
    }

    pub(crate) fn is_current(&self, ticket: FetchTicket) -> bool {
        ticket.generation == self.current
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error(FetchError),
}

impl FetchStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchStatus::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, FetchStatus::Ready)
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchStatus::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// What happened to a resolved fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Applied,
    Superseded,
}
