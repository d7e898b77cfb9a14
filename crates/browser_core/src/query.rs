use crate::route::Route;

/// A search request. Text and names are opaque identifiers: they are never
/// parsed here, and each travels as exactly one path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SearchQuery {
    Global { text: String },
    Scoped { file_name: String, inner_name: String },
}

/// Raw user input for [`build_query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryInput {
    Text(String),
    Pair {
        file_name: Option<String>,
        inner_name: Option<String>,
    },
}

/// Builds the canonical query for `input`. A scoped pair with a missing or
/// empty half yields `None`; an empty global text is a valid query.
pub fn build_query(input: QueryInput) -> Option<SearchQuery> {
    match input {
        QueryInput::Text(text) => Some(SearchQuery::Global { text }),
        QueryInput::Pair {
            file_name,
            inner_name,
        } => SearchQuery::scoped(file_name?, inner_name?),
    }
}

impl SearchQuery {
    pub fn global(text: impl Into<String>) -> Self {
        SearchQuery::Global { text: text.into() }
    }

    pub fn scoped(file_name: impl Into<String>, inner_name: impl Into<String>) -> Option<Self> {
        let file_name = file_name.into();
        let inner_name = inner_name.into();
        if file_name.is_empty() || inner_name.is_empty() {
            return None;
        }
        Some(SearchQuery::Scoped {
            file_name,
            inner_name,
        })
    }

    pub fn is_scoped(&self) -> bool {
        matches!(self, SearchQuery::Scoped { .. })
    }

    pub fn route(&self) -> Route {
        match self {
            SearchQuery::Global { text } => Route::Search {
                contents: text.clone(),
            },
            SearchQuery::Scoped {
                file_name,
                inner_name,
            } => Route::SearchInnerProcedure {
                file_name: file_name.clone(),
                inner_name: inner_name.clone(),
            },
        }
    }

    /// Service path segments for this query, unencoded.
    pub fn api_segments(&self) -> Vec<&str> {
        match self {
            SearchQuery::Global { text } => vec!["api", "search", "procedure", text.as_str()],
            SearchQuery::Scoped {
                file_name,
                inner_name,
            } => vec![
                "api",
                "search",
                "procedure",
                file_name.as_str(),
                inner_name.as_str(),
            ],
        }
    }
}
