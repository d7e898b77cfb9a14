//! Structural analysis of Progress 4GL sources produced by the AppBuilder.
//!
//! A source file is tokenized into preprocessor nodes, then split into the
//! regions delimited by `&ANALYZE-SUSPEND` / `&ANALYZE-RESUME` pairs.

use thiserror::Error;

pub mod preprocessor;
pub mod references;
pub mod sections;

pub use preprocessor::{tokenize, PreprocessorNode, Token};
pub use references::file_references;
pub use sections::{AnalysisSection, CodeBlockType, SuspendHeader};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("line {line}: '&ANALYZE-SUSPEND' while the section opened on line {open_line} is still open")]
    NestedSuspend { line: usize, open_line: usize },
    #[error("line {line}: '&ANALYZE-RESUME' without a matching '&ANALYZE-SUSPEND'")]
    UnmatchedResume { line: usize },
    #[error("section opened on line {open_line} is never resumed")]
    UnterminatedSection { open_line: usize },
}

/// Tokenizes `source` and splits it into analysis sections.
pub fn analyze(source: &str) -> Result<Vec<AnalysisSection>, AnalysisError> {
    AnalysisSection::from_tokens(tokenize(source))
}

/// Names of the `_PROCEDURE` code blocks whose name contains `needle`, in
/// section order.
pub fn matching_inner_procedures<'a>(
    sections: &'a [AnalysisSection],
    needle: &str,
) -> Vec<&'a str> {
    sections
        .iter()
        .filter_map(AnalysisSection::procedure_name)
        .filter(|name| name.contains(needle))
        .collect()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
