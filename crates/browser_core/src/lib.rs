//! Navigation and view state for browsing an analyzed Progress codebase.
//!
//! [`NavigationController`] is a synchronous state machine: every user intent
//! yields a [`Transition`] carrying the new snapshot and, when data is needed,
//! a [`PendingFetch`]. The caller runs the fetch against a
//! [`ProcedureService`] and feeds the [`FetchOutcome`] back. [`Browser`] wires
//! that loop onto tokio.

pub mod browser;
pub mod error;
pub mod fetch;
pub mod navigation;
pub mod program_view;
pub mod query;
pub mod results;
pub mod route;
pub mod search_view;
pub mod sections;
pub mod transport;

pub use browser::{Browser, Intent};
pub use error::{FetchError, ViewError};
pub use fetch::{Commit, FetchStatus, FetchTicket, Generation};
pub use navigation::{
    FetchOutcome, NavigationController, PendingFetch, QueryDraft, Transition, ViewSnapshot,
};
pub use program_view::{ProgramIdentity, ProgramSnapshot, ProgramView};
pub use query::{build_query, QueryInput, SearchQuery};
pub use results::{apply_results, InnerProcedureMatch, RawResults, ResultSet, SearchResult};
pub use route::{History, Route};
pub use search_view::{SearchSnapshot, SearchView};
pub use sections::{Section, SectionId, SectionSnapshot, SectionTree};
pub use transport::{HttpProcedureService, ProcedureService};
