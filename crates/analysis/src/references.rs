use std::sync::OnceLock;

use regex::Regex;

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[-\w/\\]+\.[pwi]\b").expect("file reference pattern is valid")
    })
}

/// Program files mentioned in `source` (`*.p`, `*.w`, `*.i`), with
/// backslashes normalized to `/`. First occurrence order, no duplicates.
pub fn file_references(source: &str) -> Vec<String> {
    let mut references: Vec<String> = Vec::new();
    for found in reference_pattern().find_iter(source) {
        let reference = found.as_str().replace('\\', "/");
        if !references.contains(&reference) {
            references.push(reference);
        }
    }
    references
}
