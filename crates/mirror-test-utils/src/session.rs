//! In-memory [`Session`] for tests.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use mirror_core::{Error, FolderRef, RawEntry, Result, Session};

/// A fake portal: folder listings and file contents held in maps.
///
/// Every call is recorded so tests can assert how many listings and
/// downloads a run performed.
///
/// ```rust,no_run
/// use mirror_core::{FolderRef, RawEntry};
/// use mirror_test_utils::FakeSession;
///
/// let session = FakeSession::new()
///     .with_listing(FolderRef::Path("/root".into()), vec![
///         RawEntry::document("readme.txt", "/files/readme.txt", "01.01.2021"),
///     ])
///     .with_file("/files/readme.txt", b"hello");
/// ```
#[derive(Debug, Default)]
pub struct FakeSession {
    listings: HashMap<FolderRef, Vec<RawEntry>>,
    files: RefCell<HashMap<String, Vec<u8>>>,
    failing_listings: HashSet<FolderRef>,
    failing_fetches: HashSet<String>,
    listed: RefCell<Vec<FolderRef>>,
    fetched: RefCell<Vec<String>>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, reference: FolderRef, entries: Vec<RawEntry>) -> Self {
        self.listings.insert(reference, entries);
        self
    }

    pub fn with_file(self, location: &str, content: &[u8]) -> Self {
        self.files
            .borrow_mut()
            .insert(location.to_string(), content.to_vec());
        self
    }

    /// Make listing `reference` fail with a transport error.
    pub fn failing_listing(mut self, reference: FolderRef) -> Self {
        self.failing_listings.insert(reference);
        self
    }

    /// Make fetching `location` fail with a transport error.
    pub fn failing_fetch(mut self, location: &str) -> Self {
        self.failing_fetches.insert(location.to_string());
        self
    }

    /// Replace a file's content, e.g. to simulate a remote update between runs.
    pub fn update_file(&self, location: &str, content: &[u8]) {
        self.files
            .borrow_mut()
            .insert(location.to_string(), content.to_vec());
    }

    pub fn listed(&self) -> Vec<FolderRef> {
        self.listed.borrow().clone()
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetched.borrow().len()
    }

    pub fn reset_counters(&self) {
        self.listed.borrow_mut().clear();
        self.fetched.borrow_mut().clear();
    }
}

impl Session for FakeSession {
    fn list_folder(&self, reference: &FolderRef) -> Result<Vec<RawEntry>> {
        self.listed.borrow_mut().push(reference.clone());
        if self.failing_listings.contains(reference) {
            return Err(Error::transport(reference.to_string(), "listing refused"));
        }
        self.listings
            .get(reference)
            .cloned()
            .ok_or_else(|| Error::transport(reference.to_string(), "no such folder"))
    }

    fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        self.fetched.borrow_mut().push(location.to_string());
        if self.failing_fetches.contains(location) {
            return Err(Error::transport(location, "connection reset"));
        }
        self.files
            .borrow()
            .get(location)
            .cloned()
            .ok_or_else(|| Error::transport(location, "404 not found"))
    }
}
