use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// URLs cannot carry `.` or `..` as a path segment, so those travel with a
/// leading `~`. A segment that would read the same after unescaping gets one
/// more `~`, which keeps the mapping reversible.
pub fn escape_path_segment(segment: &str) -> Cow<'_, str> {
    if is_dot_segment(segment.trim_start_matches('~')) {
        Cow::Owned(format!("~{segment}"))
    } else {
        Cow::Borrowed(segment)
    }
}

pub fn unescape_path_segment(segment: &str) -> &str {
    match segment.strip_prefix('~') {
        Some(rest) if is_dot_segment(rest.trim_start_matches('~')) => rest,
        _ => segment,
    }
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

/// A section as it travels over the wire: a `type` tag plus an opaque body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSection {
    #[serde(rename = "type")]
    pub section_type: String,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl RawSection {
    pub fn new(section_type: impl Into<String>) -> Self {
        Self {
            section_type: section_type.into(),
            body: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }
}

/// Response of `GET /api/procedure/{name}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedureResponse<S = RawSection> {
    pub sections: Vec<S>,
    #[serde(default)]
    pub file_references: Vec<String>,
}

/// Response of `GET /api/search/procedure/{text}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcedureSearchResponse {
    pub results: Vec<String>,
}

/// Response of `GET /api/search/procedure/{file}/{inner}`. Each result is an
/// ordered `[procedure, innerProcedure]` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InnerProcedureSearchResponse {
    pub results: Vec<(String, String)>,
}

/// Response of `GET /api/analysis_sections/{name}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSectionsResponse<S = RawSection> {
    pub sections: Vec<S>,
}
