use std::time::Duration;

use thiserror::Error;

use crate::sections::SectionId;

/// Why a search or program fetch did not produce data. Stored in the view
/// status, never in the results or sections themselves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("could not reach the server: {0}")]
    Transport(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("server answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("{0} does not belong to the current program view")]
    InvalidToggleTarget(SectionId),
    #[error("no program view is active")]
    NoActiveProgram,
}
