use shared::protocol::{InnerProcedureSearchResponse, ProcedureSearchResponse};

use crate::query::SearchQuery;

/// A scoped-search hit: the containing file and the inner procedure in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerProcedureMatch {
    pub procedure: String,
    pub inner_procedure: String,
}

/// Results as delivered by the search service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawResults {
    Procedures(Vec<String>),
    InnerProcedures(Vec<(String, String)>),
}

impl From<ProcedureSearchResponse> for RawResults {
    fn from(value: ProcedureSearchResponse) -> Self {
        RawResults::Procedures(value.results)
    }
}

impl From<InnerProcedureSearchResponse> for RawResults {
    fn from(value: InnerProcedureSearchResponse) -> Self {
        RawResults::InnerProcedures(value.results)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultSet {
    Procedures(Vec<String>),
    InnerProcedures(Vec<InnerProcedureMatch>),
}

impl Default for ResultSet {
    fn default() -> Self {
        ResultSet::Procedures(Vec::new())
    }
}

/// Borrowed view of one entry in a [`ResultSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResult<'a> {
    Procedure(&'a str),
    InnerProcedure(&'a InnerProcedureMatch),
}

impl<'a> SearchResult<'a> {
    /// The program a result opens.
    pub fn program_name(&self) -> &'a str {
        match *self {
            SearchResult::Procedure(name) => name,
            SearchResult::InnerProcedure(found) => &found.procedure,
        }
    }
}

/// Maps service results into a fresh result set. Pair order and duplicates
/// are preserved.
pub fn apply_results(raw: RawResults) -> ResultSet {
    match raw {
        RawResults::Procedures(names) => ResultSet::Procedures(names),
        RawResults::InnerProcedures(pairs) => ResultSet::InnerProcedures(
            pairs
                .into_iter()
                .map(|(procedure, inner_procedure)| InnerProcedureMatch {
                    procedure,
                    inner_procedure,
                })
                .collect(),
        ),
    }
}

impl ResultSet {
    pub fn empty_for(query: &SearchQuery) -> Self {
        if query.is_scoped() {
            ResultSet::InnerProcedures(Vec::new())
        } else {
            ResultSet::Procedures(Vec::new())
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ResultSet::Procedures(names) => names.len(),
            ResultSet::InnerProcedures(matches) => matches.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = SearchResult<'_>> + '_> {
        match self {
            ResultSet::Procedures(names) => {
                Box::new(names.iter().map(|name| SearchResult::Procedure(name)))
            }
            ResultSet::InnerProcedures(matches) => {
                Box::new(matches.iter().map(SearchResult::InnerProcedure))
            }
        }
    }
}
