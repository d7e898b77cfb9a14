use super::*;

fn raw(types: &[&str]) -> Vec<RawSection> {
    types
        .iter()
        .map(|section_type| RawSection::new(*section_type).with_field("contents", "..."))
        .collect()
}

fn open_flags(tree: &SectionTree) -> Vec<bool> {
    tree.sections().iter().map(Section::is_open).collect()
}

#[test]
fn single_create_window_becomes_primary() {
    let tree = SectionTree::build(raw(&["Block", "CreateWindow", "CodeBlock"]));

    let primary = tree.primary_section_id().expect("primary");
    assert_eq!(primary.index(), 1);
    assert_eq!(
        tree.primary_section().map(Section::section_type),
        Some("CreateWindow")
    );
}

#[test]
fn no_create_window_means_no_primary() {
    let tree = SectionTree::build(raw(&["Block", "CodeBlock"]));
    assert!(tree.primary_section().is_none());
    assert!(tree.primary_section_id().is_none());

    let empty = SectionTree::build(Vec::new());
    assert!(empty.is_empty());
    assert!(empty.primary_section().is_none());
}

#[test]
fn first_of_several_create_windows_wins() {
    let tree = SectionTree::build(raw(&["CreateWindow", "Block", "CreateWindow"]));
    assert_eq!(tree.primary_section_id().map(|id| id.index()), Some(0));
}

#[test]
fn sections_start_closed_in_fetch_order() {
    let tree = SectionTree::build(raw(&["VersionNumber", "Block", "CreateWindow"]));
    let types: Vec<&str> = tree.sections().iter().map(Section::section_type).collect();
    assert_eq!(types, vec!["VersionNumber", "Block", "CreateWindow"]);
    assert_eq!(open_flags(&tree), vec![false, false, false]);
    assert_eq!(tree.sections()[0].body()["contents"], "...");
}

#[test]
fn toggle_flips_only_the_target() {
    let mut tree = SectionTree::build(raw(&["Block", "CreateWindow", "CodeBlock"]));
    let target = tree.id_at(2).expect("id");

    assert_eq!(tree.toggle(target), Ok(true));
    assert_eq!(open_flags(&tree), vec![false, false, true]);

    assert_eq!(tree.toggle(target), Ok(false));
    assert_eq!(open_flags(&tree), vec![false, false, false]);
}

#[test]
fn primary_handle_and_list_share_one_flag() {
    let mut tree = SectionTree::build(raw(&["Block", "CreateWindow"]));
    let primary = tree.primary_section_id().expect("primary");

    tree.toggle(primary).expect("toggle via primary");
    assert!(tree.sections()[1].is_open());

    let listed = tree.id_at(1).expect("id");
    tree.toggle(listed).expect("toggle via list");
    assert_eq!(tree.primary_section().map(Section::is_open), Some(false));
}

#[test]
fn foreign_section_ids_are_rejected() {
    let first = SectionTree::build(raw(&["Block", "CreateWindow"]));
    let stale = first.id_at(0).expect("id");
    let mut second = SectionTree::build(raw(&["Block", "CreateWindow"]));

    assert_eq!(second.toggle(stale), Err(ViewError::InvalidToggleTarget(stale)));
    assert_eq!(open_flags(&second), vec![false, false]);
    assert!(second.get(stale).is_none());
}

#[test]
fn snapshot_marks_primary_section() {
    let mut tree = SectionTree::build(raw(&["Block", "CreateWindow"]));
    let primary = tree.primary_section_id().expect("primary");
    tree.toggle(primary).expect("toggle");

    let snapshot = tree.snapshot();
    assert_eq!(snapshot.len(), 2);
    assert!(!snapshot[0].primary);
    assert!(snapshot[1].primary);
    assert!(snapshot[1].open);
    assert_eq!(snapshot[1].id, primary);
}
