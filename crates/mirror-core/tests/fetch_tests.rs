//! Tests for the TreeFetcher

mod common;

use common::{NOTES, ROOT, course_session, root_ref};
use mirror_core::{Error, FolderRef, MirrorConfig, Node, RawEntry, TreeFetcher};
use mirror_test_utils::FakeSession;
use pretty_assertions::assert_eq;

#[test]
fn test_fetch_builds_nested_tree() {
    let session = course_session();

    let tree = TreeFetcher::new(&session).fetch(&root_ref()).unwrap();

    assert!(tree.is_root());
    assert_eq!(tree.len(), 2);
    let notes = tree.get("Notes").and_then(Node::as_folder).unwrap();
    assert_eq!(notes.len(), 1);
    let week1 = notes.get("week1.pdf").and_then(Node::as_document).unwrap();
    assert_eq!(week1.location(), "/files/week1.pdf");
    assert_eq!(tree.document_count(), 2);
    assert_eq!(tree.folder_count(), 1);
}

#[test]
fn test_fetch_lists_each_folder_once_and_downloads_nothing() {
    let session = course_session();

    TreeFetcher::new(&session).fetch(&root_ref()).unwrap();

    assert_eq!(
        session.listed(),
        vec![FolderRef::Path(ROOT.into()), FolderRef::Path(NOTES.into())]
    );
    assert_eq!(session.fetch_count(), 0);
}

#[test]
fn test_fetch_named_root_uses_name() {
    let session = course_session();

    let tree = TreeFetcher::new(&session)
        .fetch_named("ALGO101", &root_ref())
        .unwrap();

    assert_eq!(tree.name(), "ALGO101");
    assert!(!tree.is_root());
}

#[test]
fn test_empty_folder_is_a_valid_tree() {
    let session = FakeSession::new().with_listing(root_ref(), vec![]);

    let tree = TreeFetcher::new(&session).fetch(&root_ref()).unwrap();

    assert!(tree.is_empty());
}

#[test]
fn test_nested_listing_failure_fails_whole_fetch() {
    let session = course_session().failing_listing(FolderRef::Path(NOTES.into()));

    let err = TreeFetcher::new(&session).fetch(&root_ref()).unwrap_err();

    match &err {
        Error::Fetch { reference, source } => {
            assert_eq!(reference, ROOT);
            assert!(matches!(
                source.as_ref(),
                Error::Fetch { reference, .. } if reference == NOTES
            ));
        }
        other => panic!("expected Fetch, got {:?}", other),
    }
    assert!(matches!(err.root_cause(), Error::Transport { .. }));
}

#[test]
fn test_missing_root_listing_is_fetch_error() {
    let session = FakeSession::new();

    let err = TreeFetcher::new(&session).fetch(&root_ref()).unwrap_err();

    assert!(matches!(err, Error::Fetch { .. }));
}

#[test]
fn test_malformed_date_fails_enclosing_folder() {
    let session = FakeSession::new().with_listing(
        root_ref(),
        vec![
            RawEntry::document("good.pdf", "/files/good.pdf", "01.01.2020"),
            RawEntry::document("bad.pdf", "/files/bad.pdf", "sometime in 2020"),
        ],
    );

    let err = TreeFetcher::new(&session).fetch(&root_ref()).unwrap_err();

    assert!(matches!(err, Error::Fetch { .. }));
    assert!(matches!(
        err.root_cause(),
        Error::MalformedDate { value, .. } if value == "sometime in 2020"
    ));
}

#[test]
fn test_duplicate_entries_are_rejected() {
    let session = FakeSession::new().with_listing(
        root_ref(),
        vec![
            RawEntry::document("a.pdf", "/files/a1.pdf", "01.01.2020"),
            RawEntry::document("a.pdf", "/files/a2.pdf", "02.01.2020"),
        ],
    );

    let err = TreeFetcher::new(&session).fetch(&root_ref()).unwrap_err();

    assert!(matches!(err.root_cause(), Error::DuplicateChild { name, .. } if name == "a.pdf"));
}

#[test]
fn test_unsafe_entry_name_is_rejected() {
    let session = FakeSession::new().with_listing(
        root_ref(),
        vec![RawEntry::document("../escape.pdf", "/files/x.pdf", "01.01.2020")],
    );

    let err = TreeFetcher::new(&session).fetch(&root_ref()).unwrap_err();

    assert!(matches!(err.root_cause(), Error::InvalidName { .. }));
}

#[test]
fn test_depth_bound_from_config() {
    let config = MirrorConfig {
        max_depth: 0,
        ..MirrorConfig::default()
    };
    let session = course_session();

    let err = TreeFetcher::from_config(&session, &config)
        .fetch(&root_ref())
        .unwrap_err();

    assert!(matches!(err.root_cause(), Error::DepthExceeded { max_depth: 0, .. }));
    assert_eq!(session.listed().len(), 1);
}

#[test]
fn test_course_reference_lists_course_document_page() {
    let course = FolderRef::Course("M2T3STAGES".into());
    let session = FakeSession::new().with_listing(course.clone(), vec![]);

    TreeFetcher::new(&session).fetch(&course).unwrap();

    assert_eq!(session.listed(), vec![course]);
}
