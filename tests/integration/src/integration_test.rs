//! End-to-end integration tests
//!
//! These exercise the complete flow: config loading -> tree fetch -> sync,
//! across repeated runs against a changing fake portal.

use mirror_core::{
    FolderRef, MirrorConfig, RawEntry, RemoteDate, Synchronizer, TreeFetcher, logging,
    mirror_course,
};
use mirror_test_utils::{FakeSession, TestDir};
use pretty_assertions::assert_eq;
use std::fs;

fn two_courses() -> FakeSession {
    FakeSession::new()
        .with_listing(
            FolderRef::Course("ALGO".into()),
            vec![
                RawEntry::folder("Cours", "/algo/cours"),
                RawEntry::document("syllabus.pdf", "/algo/syllabus.pdf", "01.09.2020"),
            ],
        )
        .with_listing(
            FolderRef::Path("/algo/cours".into()),
            vec![
                RawEntry::folder("Chapitre 1", "/algo/cours/ch1"),
                RawEntry::folder("Chapitre 2", "/algo/cours/ch2"),
            ],
        )
        .with_listing(
            FolderRef::Path("/algo/cours/ch1".into()),
            vec![RawEntry::document("tri.pdf", "/algo/tri.pdf", "10.09.2020")],
        )
        .with_listing(FolderRef::Path("/algo/cours/ch2".into()), vec![])
        .with_listing(
            FolderRef::Course("SYS".into()),
            vec![RawEntry::document("syllabus.pdf", "/sys/syllabus.pdf", "02.09.2020")],
        )
        .with_file("/algo/syllabus.pdf", b"algo syllabus")
        .with_file("/algo/tri.pdf", b"tri fusion")
        .with_file("/sys/syllabus.pdf", b"sys syllabus")
}

fn load_config(dir: &TestDir) -> MirrorConfig {
    let path = dir.path("mirror.toml");
    fs::write(&path, "max_depth = 8\ndate_zone = \"utc\"\nfsync = false\n").unwrap();
    MirrorConfig::load(&path).unwrap()
}

#[test]
fn test_two_courses_share_one_base() {
    let _ = logging::init();
    let session = two_courses();
    let base = TestDir::new();
    let config = load_config(&base);

    let algo = mirror_course(&session, "ALGO", base.root(), &config).unwrap();
    let sys = mirror_course(&session, "SYS", base.root(), &config).unwrap();

    assert!(algo.is_success(), "{}", algo);
    assert!(sys.is_success(), "{}", sys);
    base.assert_file("ALGO/syllabus.pdf", b"algo syllabus");
    base.assert_file("SYS/syllabus.pdf", b"sys syllabus");
    base.assert_file("ALGO/Cours/Chapitre 1/tri.pdf", b"tri fusion");
    base.assert_dir("ALGO/Cours/Chapitre 2");
    assert_eq!(
        base.mtime("ALGO/Cours/Chapitre 1/tri.pdf"),
        RemoteDate::parse_in("10.09.2020", config.date_zone)
            .unwrap()
            .to_file_time()
    );
}

#[test]
fn test_rerun_after_remote_changes_only_fetches_changes() {
    let base = TestDir::new();
    let config = load_config(&base);
    let session = two_courses();
    mirror_course(&session, "ALGO", base.root(), &config).unwrap();

    let updated = two_courses()
        .with_listing(
            FolderRef::Path("/algo/cours/ch2".into()),
            vec![RawEntry::document("graphes.pdf", "/algo/graphes.pdf", "20.09.2020")],
        )
        .with_listing(
            FolderRef::Path("/algo/cours/ch1".into()),
            vec![RawEntry::document("tri.pdf", "/algo/tri.pdf", "21.09.2020")],
        )
        .with_file("/algo/graphes.pdf", b"graphes")
        .with_file("/algo/tri.pdf", b"tri rapide");

    let report = mirror_course(&updated, "ALGO", base.root(), &config).unwrap();

    let mut downloaded: Vec<_> = report.downloaded.iter().map(|p| p.as_str()).collect();
    downloaded.sort();
    assert_eq!(
        downloaded,
        vec!["ALGO/Cours/Chapitre 1/tri.pdf", "ALGO/Cours/Chapitre 2/graphes.pdf"]
    );
    assert_eq!(report.skipped.len(), 1);
    base.assert_file("ALGO/Cours/Chapitre 1/tri.pdf", b"tri rapide");
    assert_eq!(updated.fetch_count(), 2);
}

#[test]
fn test_local_files_outside_the_tree_are_left_alone() {
    let session = two_courses();
    let base = TestDir::new();
    let config = load_config(&base);
    fs::create_dir(base.path("SYS")).unwrap();
    fs::write(base.path("SYS/my-notes.txt"), "mine").unwrap();

    mirror_course(&session, "SYS", base.root(), &config).unwrap();

    base.assert_file("SYS/my-notes.txt", b"mine");
    base.assert_file("SYS/syllabus.pdf", b"sys syllabus");
}

#[test]
fn test_listing_failure_leaves_filesystem_untouched() {
    let session = two_courses().failing_listing(FolderRef::Path("/algo/cours/ch2".into()));
    let base = TestDir::new();
    let config = load_config(&base);

    let err = TreeFetcher::from_config(&session, &config)
        .fetch_named("ALGO", &FolderRef::Course("ALGO".into()))
        .unwrap_err();

    assert!(err.to_string().contains("Failed to fetch folder"));
    assert_eq!(base.entries(), vec!["mirror.toml"]);
    assert_eq!(session.fetch_count(), 0);
}

#[test]
fn test_synchronizer_from_config_honors_dry_run() {
    let session = two_courses();
    let base = TestDir::new();
    let mut config = load_config(&base);
    config.dry_run = true;
    let tree = TreeFetcher::from_config(&session, &config)
        .fetch(&FolderRef::Course("SYS".into()))
        .unwrap();

    let report = Synchronizer::from_config(&session, &config)
        .synchronize(&tree, base.root())
        .unwrap();

    assert_eq!(report.summary(), "1 to download, 0 skipped, 0 failed (dry run)");
    base.assert_absent("syllabus.pdf");
}
