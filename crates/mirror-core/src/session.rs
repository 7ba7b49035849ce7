//! Interface to the portal transport
//!
//! Authentication, HTTP and HTML scraping live outside this crate. A
//! [`Session`] hands back already-parsed listing rows and raw file bytes; the
//! fetcher and downloader receive it explicitly instead of reaching for a
//! global connection.

use crate::Result;

/// Request path of a course's document listing.
pub const COURSE_DOCUMENTS_PATH: &str = "/claroline/document/document.php";

/// Reference to a remote folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FolderRef {
    /// Top-level document area of a course, by course code
    Course(String),
    /// A listing path as found in a parent folder's entry
    Path(String),
}

impl FolderRef {
    /// Strings starting with `/` are listing paths, anything else is a course code.
    pub fn parse(reference: &str) -> Self {
        if reference.starts_with('/') {
            FolderRef::Path(reference.to_string())
        } else {
            FolderRef::Course(reference.to_string())
        }
    }

    /// Request path the session should list.
    pub fn url_path(&self) -> String {
        match self {
            FolderRef::Course(code) => {
                format!("{}?cidReset=true&cidReq={}", COURSE_DOCUMENTS_PATH, code)
            }
            FolderRef::Path(path) => path.clone(),
        }
    }
}

impl std::fmt::Display for FolderRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url_path())
    }
}

/// One parsed row of a folder listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub name: String,
    pub is_folder: bool,
    /// Listing path for folders, file reference for documents
    pub location: String,
    /// Last-modified date as displayed, `day.month.year`
    pub date: String,
}

impl RawEntry {
    pub fn document(
        name: impl Into<String>,
        location: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            is_folder: false,
            location: location.into(),
            date: date.into(),
        }
    }

    pub fn folder(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_folder: true,
            location: location.into(),
            date: String::new(),
        }
    }
}

/// Transport used by the fetcher and the downloader.
///
/// Implementations report failures as [`crate::Error::Transport`]. Nothing
/// here requires `Sync`; callers use a session from one thread.
pub trait Session {
    /// List the entries of one remote folder.
    fn list_folder(&self, reference: &FolderRef) -> Result<Vec<RawEntry>>;

    /// Retrieve the full content of a document.
    fn fetch(&self, location: &str) -> Result<Vec<u8>>;
}

impl<S: Session + ?Sized> Session for &S {
    fn list_folder(&self, reference: &FolderRef) -> Result<Vec<RawEntry>> {
        (**self).list_folder(reference)
    }

    fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        (**self).fetch(location)
    }
}
