//! Tests for course-level mirroring

use mirror_core::{
    CancelToken, DateZone, Error, FolderRef, MirrorConfig, RawEntry, RemoteDate, mirror_course,
    mirror_course_with_cancel,
};
use mirror_test_utils::{FakeSession, TestDir};
use pretty_assertions::assert_eq;

const CODE: &str = "M2T3STAGES";
const TD_FOLDER: &str = "/claroline/document/document.php?cmd=exChDir&file=L1RE";
const PLANNING: &str = "/claroline/backends/download.php?url=cGxhbm5pbmc";

fn portal() -> FakeSession {
    FakeSession::new()
        .with_listing(
            FolderRef::Course(CODE.into()),
            vec![
                RawEntry::folder("TD", TD_FOLDER),
                RawEntry::document("planning.pdf", PLANNING, "12.09.2019"),
            ],
        )
        .with_listing(
            FolderRef::Path(TD_FOLDER.into()),
            vec![RawEntry::document(
                "td1.pdf",
                "/claroline/backends/download.php?url=dGQx",
                "20.09.2019",
            )],
        )
        .with_file(PLANNING, b"planning")
        .with_file("/claroline/backends/download.php?url=dGQx", b"td1")
}

#[test]
fn mirrors_course_under_its_code() {
    let session = portal();
    let base = TestDir::new();
    let config = MirrorConfig {
        date_zone: DateZone::Utc,
        ..MirrorConfig::default()
    };

    let report = mirror_course(&session, CODE, base.root(), &config).unwrap();

    assert!(report.is_success(), "{}", report);
    base.assert_file("M2T3STAGES/planning.pdf", b"planning");
    base.assert_file("M2T3STAGES/TD/td1.pdf", b"td1");
    assert_eq!(
        base.mtime("M2T3STAGES/TD/td1.pdf"),
        RemoteDate::parse_in("20.09.2019", DateZone::Utc).unwrap().to_file_time()
    );

    let again = mirror_course(&session, CODE, base.root(), &config).unwrap();
    assert!(again.downloaded.is_empty());
    assert_eq!(again.skipped.len(), 2);
}

#[test]
fn missing_base_fails_before_any_request() {
    let session = portal();
    let base = TestDir::new();

    let err = mirror_course(&session, CODE, &base.path("absent"), &MirrorConfig::default())
        .unwrap_err();

    assert!(matches!(err, Error::InvalidLocalPath { .. }));
    assert!(session.listed().is_empty());
}

#[test]
fn dry_run_from_config() {
    let session = portal();
    let base = TestDir::new();
    let config = MirrorConfig {
        dry_run: true,
        ..MirrorConfig::default()
    };

    let report = mirror_course(&session, CODE, base.root(), &config).unwrap();

    assert_eq!(report.planned.len(), 2);
    assert!(base.entries().is_empty());
}

#[test]
fn cancelled_course_fetch_returns_cancelled() {
    let session = portal();
    let base = TestDir::new();
    let cancel = CancelToken::new();
    cancel.cancel();

    let config = MirrorConfig::default();
    let err = mirror_course_with_cancel(&session, CODE, base.root(), &config, cancel).unwrap_err();

    assert!(matches!(err, Error::Cancelled));
}
