//! Fixtures shared by the mirror-core integration tests.

#![allow(dead_code)]

use mirror_core::{FolderRef, RawEntry};
use mirror_test_utils::FakeSession;

pub const ROOT: &str = "/docs";
pub const NOTES: &str = "/docs/notes";

pub fn root_ref() -> FolderRef {
    FolderRef::Path(ROOT.into())
}

/// root{ Notes{ week1.pdf 01.01.2020 }, readme.txt 01.01.2021 }
pub fn course_session() -> FakeSession {
    FakeSession::new()
        .with_listing(
            root_ref(),
            vec![
                RawEntry::folder("Notes", NOTES),
                RawEntry::document("readme.txt", "/files/readme.txt", "01.01.2021"),
            ],
        )
        .with_listing(
            FolderRef::Path(NOTES.into()),
            vec![RawEntry::document("week1.pdf", "/files/week1.pdf", "01.01.2020")],
        )
        .with_file("/files/readme.txt", b"read me")
        .with_file("/files/week1.pdf", b"%PDF-week1")
}
