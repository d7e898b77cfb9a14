//! Plain-text rendering of a view snapshot.

use browser_core::{
    FetchStatus, ProgramSnapshot, QueryDraft, ResultSet, SearchQuery, SearchResult,
    SearchSnapshot, SectionSnapshot, ViewSnapshot,
};
use serde_json::Value;

pub fn render(snapshot: &ViewSnapshot) -> String {
    let mut lines = Vec::new();
    match snapshot {
        ViewSnapshot::Home { draft } => render_home(draft, &mut lines),
        ViewSnapshot::Search { draft, view } => render_search(draft, view, &mut lines),
        ViewSnapshot::Program(program) => render_program(program, &mut lines),
    }
    lines.join("\n")
}

/// True when the snapshot ended in a failed fetch.
pub fn is_failure(snapshot: &ViewSnapshot) -> bool {
    match snapshot {
        ViewSnapshot::Home { .. } => false,
        ViewSnapshot::Search { view, .. } => view.status.error().is_some(),
        ViewSnapshot::Program(program) => program.status.error().is_some(),
    }
}

fn render_home(draft: &QueryDraft, lines: &mut Vec<String>) {
    lines.push("home".to_string());
    if !draft.text.is_empty() {
        lines.push(format!("  search: {}", draft.text));
    }
    if !draft.file_name.is_empty() || !draft.inner_name.is_empty() {
        lines.push(format!(
            "  inner procedure search: {} / {}",
            draft.file_name, draft.inner_name
        ));
    }
}

fn render_search(draft: &QueryDraft, view: &SearchSnapshot, lines: &mut Vec<String>) {
    match &view.query {
        Some(SearchQuery::Global { text }) => lines.push(format!("procedures matching '{text}'")),
        Some(SearchQuery::Scoped {
            file_name,
            inner_name,
        }) => lines.push(format!(
            "inner procedures matching '{inner_name}' in files matching '{file_name}'"
        )),
        None => lines.push("search".to_string()),
    }

    match &view.status {
        FetchStatus::Idle => {}
        FetchStatus::Loading => lines.push("  loading...".to_string()),
        FetchStatus::Error(err) => {
            lines.push(format!("  could not fetch: {err}"));
            lines.push(format!(
                "  kept input: text='{}' file='{}' inner='{}'",
                draft.text, draft.file_name, draft.inner_name
            ));
        }
        FetchStatus::Ready => render_results(&view.results, lines),
    }
}

fn render_results(results: &ResultSet, lines: &mut Vec<String>) {
    if results.is_empty() {
        lines.push("  no results".to_string());
        return;
    }
    for result in results.iter() {
        match result {
            SearchResult::Procedure(name) => lines.push(format!("  {name}")),
            SearchResult::InnerProcedure(found) => lines.push(format!(
                "  {} :: {}",
                found.procedure, found.inner_procedure
            )),
        }
    }
}

fn render_program(program: &ProgramSnapshot, lines: &mut Vec<String>) {
    let name = program
        .identity
        .as_ref()
        .map(|identity| identity.name())
        .unwrap_or("?");
    lines.push(format!("program {name}"));

    match &program.status {
        FetchStatus::Idle => {}
        FetchStatus::Loading => lines.push("  loading...".to_string()),
        FetchStatus::Error(err) => lines.push(format!("  could not fetch: {err}")),
        FetchStatus::Ready => {
            if !program.file_references.is_empty() {
                lines.push("  references:".to_string());
                for reference in &program.file_references {
                    lines.push(format!("    {reference}"));
                }
            }
            if program.sections.is_empty() {
                lines.push("  no sections".to_string());
            }
            for section in &program.sections {
                render_section(section, lines);
            }
        }
    }
}

fn render_section(section: &SectionSnapshot, lines: &mut Vec<String>) {
    let marker = if section.open { "[-]" } else { "[+]" };
    let primary = if section.primary { " (primary)" } else { "" };
    lines.push(format!(
        "  {marker} {} {}{primary}",
        section.id.index(),
        section.section_type
    ));
    if !section.open {
        return;
    }

    match section.body.get("contents") {
        Some(Value::String(contents)) => {
            lines.extend(contents.lines().map(|line| format!("      {line}")));
        }
        _ if section.body.is_empty() => {}
        _ => lines.push(format!("      {}", Value::Object(section.body.clone()))),
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
