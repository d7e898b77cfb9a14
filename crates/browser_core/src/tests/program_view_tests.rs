use super::*;
use shared::protocol::RawSection;

fn response(file_references: &[&str], types: &[&str]) -> ProcedureResponse {
    ProcedureResponse {
        sections: types.iter().map(|t| RawSection::new(*t)).collect(),
        file_references: file_references.iter().map(|r| r.to_string()).collect(),
    }
}

#[test]
fn opening_enters_loading_with_empty_state() {
    let mut view = ProgramView::new();
    assert_eq!(view.status(), &FetchStatus::Idle);

    view.open(ProgramIdentity::new("foo"));

    assert!(view.status().is_loading());
    assert!(view.sections().is_empty());
    assert!(view.file_references().is_empty());
    assert_eq!(view.identity().map(ProgramIdentity::name), Some("foo"));
}

#[test]
fn resolved_program_exposes_sections_and_primary() {
    let mut view = ProgramView::new();
    let ticket = view.open(ProgramIdentity::new("foo"));

    let commit = view.resolve(ticket, Ok(response(&["a.p"], &["Block", "CreateWindow"])));

    assert_eq!(commit, Commit::Applied);
    assert!(view.status().is_ready());
    assert_eq!(view.file_references(), ["a.p".to_string()]);
    assert_eq!(view.sections().len(), 2);
    assert!(!view.sections()[1].is_open());
    assert!(std::ptr::eq(
        view.primary_section().expect("primary"),
        &view.sections()[1]
    ));
}

#[test]
fn failure_is_an_error_status_not_empty_ready() {
    let mut failed = ProgramView::new();
    let ticket = failed.open(ProgramIdentity::new("foo"));
    let err = FetchError::Status {
        status: 404,
        message: "'foo' does not exist on the file server".into(),
    };
    failed.resolve(ticket, Err(err.clone()));

    let mut empty = ProgramView::new();
    let ticket = empty.open(ProgramIdentity::new("foo"));
    empty.resolve(ticket, Ok(response(&[], &[])));

    assert_eq!(failed.status().error(), Some(&err));
    assert!(failed.sections().is_empty());
    assert!(empty.status().is_ready());
    assert!(empty.sections().is_empty());
}

#[test]
fn later_open_supersedes_earlier_fetch() {
    let mut view = ProgramView::new();
    let x = view.open(ProgramIdentity::new("X"));
    let y = view.open(ProgramIdentity::new("Y"));

    assert_eq!(
        view.resolve(x, Ok(response(&["x.i"], &["CreateWindow"]))),
        Commit::Superseded
    );
    assert_eq!(view.identity().map(ProgramIdentity::name), Some("Y"));
    assert!(view.status().is_loading());
    assert!(view.sections().is_empty());

    assert_eq!(
        view.resolve(y, Err(FetchError::Transport("reset".into()))),
        Commit::Applied
    );
    assert!(view.status().error().is_some());
    assert!(view.file_references().is_empty());
}

#[test]
fn late_failure_of_superseded_fetch_is_ignored() {
    let mut view = ProgramView::new();
    let x = view.open(ProgramIdentity::new("X"));
    let y = view.open(ProgramIdentity::new("Y"));
    view.resolve(y, Ok(response(&[], &["Block"])));

    assert_eq!(
        view.resolve(x, Err(FetchError::Timeout(std::time::Duration::from_secs(10)))),
        Commit::Superseded
    );
    assert!(view.status().is_ready());
    assert_eq!(view.sections().len(), 1);
}

#[test]
fn toggling_changes_one_section_and_rejects_stale_ids() {
    let mut view = ProgramView::new();
    let ticket = view.open(ProgramIdentity::new("foo"));
    view.resolve(ticket, Ok(response(&[], &["Block", "CreateWindow", "Block"])));

    let primary = view.tree().primary_section_id().expect("primary");
    assert_eq!(view.toggle(primary), Ok(true));
    let flags: Vec<bool> = view.sections().iter().map(Section::is_open).collect();
    assert_eq!(flags, vec![false, true, false]);

    let (_, retry) = view.retry().expect("retry");
    view.resolve(retry, Ok(response(&[], &["Block", "CreateWindow", "Block"])));

    assert_eq!(view.toggle(primary), Err(ViewError::InvalidToggleTarget(primary)));
    assert!(view.sections().iter().all(|section| !section.is_open()));
}

#[test]
fn snapshot_reflects_current_state() {
    let mut view = ProgramView::new();
    let ticket = view.open(ProgramIdentity::new("foo"));
    view.resolve(ticket, Ok(response(&["a.p"], &["Block", "CreateWindow"])));

    let snapshot = view.snapshot();
    assert_eq!(snapshot.identity, Some(ProgramIdentity::new("foo")));
    assert_eq!(snapshot.status, FetchStatus::Ready);
    assert_eq!(snapshot.file_references, vec!["a.p".to_string()]);
    assert_eq!(snapshot.sections.len(), 2);
    assert_eq!(snapshot.primary_section, Some(snapshot.sections[1].id));
}

#[test]
fn program_name_is_a_single_api_segment() {
    assert_eq!(
        ProgramIdentity::new("src/order entry.w").api_segments(),
        vec!["api", "procedure", "src/order entry.w"]
    );
}
