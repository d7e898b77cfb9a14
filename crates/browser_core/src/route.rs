//! Addressable locations and the back/forward stack.

use std::{borrow::Cow, fmt};

use crate::query::SearchQuery;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Home,
    Search {
        contents: String,
    },
    SearchInnerProcedure {
        file_name: String,
        inner_name: String,
    },
    Program {
        name: String,
    },
}

impl Route {
    pub fn to_path(&self) -> String {
        match self {
            Route::Home => "/home".to_string(),
            Route::Search { contents } => format!("/search/{}", encode_segment(contents)),
            Route::SearchInnerProcedure {
                file_name,
                inner_name,
            } => format!(
                "/search-inner/{}/{}",
                encode_segment(file_name),
                encode_segment(inner_name)
            ),
            Route::Program { name } => format!("/program/{}", encode_segment(name)),
        }
    }

    /// Resolves a path (optionally `#`-prefixed) to a route. Anything that does
    /// not name a valid view lands on `Home`.
    pub fn parse(path: &str) -> Route {
        let path = path.trim_start_matches('#').trim_start_matches('/');
        let Some(segments) = path
            .split('/')
            .map(|segment| urlencoding::decode(segment).map(|s| s.into_owned()))
            .collect::<Result<Vec<String>, _>>()
            .ok()
        else {
            return Route::Home;
        };

        match segments.as_slice() {
            [view, contents] if view == "search" => Route::Search {
                contents: contents.clone(),
            },
            [view, file_name, inner_name] if view == "search-inner" => Route::SearchInnerProcedure {
                file_name: file_name.clone(),
                inner_name: inner_name.clone(),
            }
            .normalize(),
            [view, name] if view == "program" && !name.is_empty() => Route::Program {
                name: name.clone(),
            },
            _ => Route::Home,
        }
    }

    /// Routes that cannot produce a view collapse to `Home`.
    pub fn normalize(self) -> Route {
        match self {
            Route::SearchInnerProcedure {
                ref file_name,
                ref inner_name,
            } if SearchQuery::scoped(file_name.as_str(), inner_name.as_str()).is_none() => {
                Route::Home
            }
            Route::Program { ref name } if name.is_empty() => Route::Home,
            route => route,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

/// Percent-encodes one route segment. `.` and `..` are escaped too so a
/// route path never carries a bare dot-segment.
fn encode_segment(segment: &str) -> Cow<'_, str> {
    match segment {
        "." => Cow::Borrowed("%2E"),
        ".." => Cow::Borrowed("%2E%2E"),
        other => urlencoding::encode(other),
    }
}

/// Linear browsing history. Starts at `Home`.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Route>,
    cursor: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self {
            entries: vec![Route::Home],
            cursor: 0,
        }
    }

    pub fn current(&self) -> &Route {
        &self.entries[self.cursor]
    }

    /// Records `route` as the new current entry, dropping any forward entries.
    /// Pushing the current route again changes nothing.
    pub fn push(&mut self, route: Route) {
        if *self.current() == route {
            return;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(route);
        self.cursor += 1;
    }

    pub fn back(&mut self) -> Option<&Route> {
        if !self.can_go_back() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    pub fn forward(&mut self) -> Option<&Route> {
        if !self.can_go_forward() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/route_tests.rs"]
mod tests;
