use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use shared::protocol::{ProcedureResponse, RawSection};

use super::*;
use crate::{
    error::FetchError,
    fetch::FetchStatus,
    program_view::ProgramIdentity,
    query::SearchQuery,
    results::{RawResults, ResultSet},
};

/// Answers from a fixed table after a per-entry delay.
#[derive(Default)]
struct ScriptedService {
    programs: HashMap<String, (Duration, Result<Vec<&'static str>, FetchError>)>,
    searches: HashMap<SearchQuery, Result<RawResults, FetchError>>,
    calls: AtomicUsize,
}

impl ScriptedService {
    fn program(mut self, name: &str, delay_ms: u64, types: &[&'static str]) -> Self {
        self.programs.insert(
            name.to_string(),
            (Duration::from_millis(delay_ms), Ok(types.to_vec())),
        );
        self
    }

    fn failing_program(mut self, name: &str, err: FetchError) -> Self {
        self.programs
            .insert(name.to_string(), (Duration::ZERO, Err(err)));
        self
    }

    fn search(mut self, query: SearchQuery, result: Result<RawResults, FetchError>) -> Self {
        self.searches.insert(query, result);
        self
    }
}

#[async_trait]
impl ProcedureService for ScriptedService {
    async fn search(&self, query: &SearchQuery) -> Result<RawResults, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.searches
            .get(query)
            .cloned()
            .unwrap_or_else(|| Ok(RawResults::Procedures(Vec::new())))
    }

    async fn fetch_program(
        &self,
        identity: &ProgramIdentity,
    ) -> Result<ProcedureResponse, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let Some((delay, result)) = self.programs.get(identity.name()) else {
            return Err(FetchError::Status {
                status: 404,
                message: "not found".into(),
            });
        };
        tokio::time::sleep(*delay).await;
        result.clone().map(|types| ProcedureResponse {
            sections: types.into_iter().map(RawSection::new).collect(),
            file_references: Vec::new(),
        })
    }
}

fn program(snapshot: ViewSnapshot) -> crate::program_view::ProgramSnapshot {
    match snapshot {
        ViewSnapshot::Program(program) => program,
        other => panic!("expected program view, got {other:?}"),
    }
}

#[tokio::test]
async fn open_program_settles_with_primary_section() {
    let service = Arc::new(ScriptedService::default().program("foo", 0, &["Block", "CreateWindow"]));
    let mut browser = Browser::new(service);

    let loading = program(browser.dispatch(Intent::OpenProgram("foo".into())).expect("dispatch"));
    assert_eq!(loading.status, FetchStatus::Loading);
    assert_eq!(browser.in_flight(), 1);

    let ready = program(browser.settle().await);
    assert_eq!(ready.status, FetchStatus::Ready);
    assert_eq!(ready.sections.len(), 2);
    assert_eq!(ready.primary_section, Some(ready.sections[1].id));
    assert_eq!(browser.in_flight(), 0);
}

#[tokio::test]
async fn slower_earlier_program_is_superseded() {
    let service = Arc::new(
        ScriptedService::default()
            .program("X", 200, &["CreateWindow"])
            .program("Y", 10, &["Block", "Block"]),
    );
    let mut browser = Browser::new(service);

    browser.dispatch(Intent::OpenProgram("X".into())).expect("X");
    browser.dispatch(Intent::OpenProgram("Y".into())).expect("Y");

    assert_eq!(browser.next_completion().await, Some(Commit::Applied));
    assert_eq!(browser.next_completion().await, Some(Commit::Superseded));
    assert_eq!(browser.next_completion().await, None);

    let view = program(browser.snapshot());
    assert_eq!(view.identity, Some(ProgramIdentity::new("Y")));
    assert_eq!(view.sections.len(), 2);
    assert_eq!(view.primary_section, None);
}

#[tokio::test]
async fn failed_scoped_search_keeps_draft_and_results() {
    let query = SearchQuery::scoped("f.p", "inner").expect("scoped");
    let service = Arc::new(
        ScriptedService::default().search(query, Err(FetchError::Transport("refused".into()))),
    );
    let mut browser = Browser::new(service);

    browser
        .dispatch(Intent::ScopedSearch {
            file_name: "f.p".into(),
            inner_name: "inner".into(),
        })
        .expect("dispatch");

    match browser.settle().await {
        ViewSnapshot::Search { draft, view } => {
            assert!(view.status.error().is_some());
            assert_eq!(view.results, ResultSet::InnerProcedures(Vec::new()));
            assert_eq!((draft.file_name.as_str(), draft.inner_name.as_str()), ("f.p", "inner"));
        }
        other => panic!("expected search view, got {other:?}"),
    }
}

#[tokio::test]
async fn incomplete_scoped_search_starts_no_fetch() {
    let service = Arc::new(ScriptedService::default());
    let mut browser = Browser::new(service.clone());

    let view = browser
        .dispatch(Intent::ScopedSearch {
            file_name: String::new(),
            inner_name: "inner".into(),
        })
        .expect("dispatch");

    assert!(matches!(view, ViewSnapshot::Home { .. }));
    assert_eq!(browser.in_flight(), 0);
    assert_eq!(service.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn toggle_goes_through_dispatch() {
    let service = Arc::new(ScriptedService::default().program("foo", 0, &["Block", "CreateWindow"]));
    let mut browser = Browser::new(service);
    browser.dispatch(Intent::OpenProgram("foo".into())).expect("open");
    let id = program(browser.settle().await).sections[0].id;

    let view = program(browser.dispatch(Intent::ToggleSection(id)).expect("toggle"));
    assert!(view.sections[0].open);
    assert!(!view.sections[1].open);
    assert_eq!(browser.in_flight(), 0);
}

#[tokio::test]
async fn back_refetches_previous_view() {
    let service = Arc::new(
        ScriptedService::default()
            .search(
                SearchQuery::global("bar"),
                Ok(RawResults::Procedures(vec!["bar1".into(), "bar2".into()])),
            )
            .program("bar1", 0, &["CreateWindow"]),
    );
    let mut browser = Browser::new(service.clone());

    browser.dispatch(Intent::GlobalSearch("bar".into())).expect("search");
    browser.settle().await;
    browser.dispatch(Intent::OpenProgram("bar1".into())).expect("open");
    browser.settle().await;

    browser.dispatch(Intent::Back).expect("back");
    match browser.settle().await {
        ViewSnapshot::Search { view, .. } => assert_eq!(view.results.len(), 2),
        other => panic!("expected search view, got {other:?}"),
    }
    assert_eq!(service.calls.load(Ordering::SeqCst), 3);

    browser.dispatch(Intent::Forward).expect("forward");
    assert!(program(browser.settle().await).primary_section.is_some());
}

#[tokio::test]
async fn retry_after_failure_refetches() {
    let service = Arc::new(
        ScriptedService::default().failing_program("foo", FetchError::Timeout(Duration::from_secs(10))),
    );
    let mut browser = Browser::new(service.clone());

    browser.dispatch(Intent::OpenProgram("foo".into())).expect("open");
    let failed = program(browser.settle().await);
    assert_eq!(
        failed.status.error(),
        Some(&FetchError::Timeout(Duration::from_secs(10)))
    );

    let retrying = program(browser.dispatch(Intent::Retry).expect("retry"));
    assert!(retrying.status.is_loading());
    browser.settle().await;
    assert_eq!(service.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn back_at_start_is_a_no_op() {
    let mut browser = Browser::new(Arc::new(ScriptedService::default()));
    let view = browser.dispatch(Intent::Back).expect("back");
    assert!(matches!(view, ViewSnapshot::Home { .. }));
    assert_eq!(browser.next_completion().await, None);
}
