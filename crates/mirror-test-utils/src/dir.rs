//! [`TestDir`], a temporary sync base.

use std::fs;
use std::path::{Path, PathBuf};

use mirror_fs::{FileTime, io};
use tempfile::TempDir;

/// A temporary directory used as the sync base, with assertion helpers.
///
/// Relative paths use `/` separators, e.g. `"Notes/week1.pdf"`.
pub struct TestDir {
    temp_dir: TempDir,
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDir {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        rel.split('/')
            .filter(|s| !s.is_empty())
            .fold(self.root().to_path_buf(), |acc, seg| acc.join(seg))
    }

    /// Write a file (creating parents) and set its mtime.
    pub fn write_with_mtime(&self, rel: &str, content: &[u8], mtime: FileTime) {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        io::set_modified_time(&path, mtime).unwrap();
    }

    pub fn mtime(&self, rel: &str) -> FileTime {
        io::modified_time(self.path(rel))
            .unwrap()
            .unwrap_or_else(|| panic!("{} does not exist", rel))
    }

    pub fn read(&self, rel: &str) -> Vec<u8> {
        fs::read(self.path(rel)).unwrap_or_else(|e| panic!("cannot read {}: {}", rel, e))
    }

    pub fn assert_file(&self, rel: &str, content: &[u8]) {
        assert_eq!(self.read(rel), content, "unexpected content in {}", rel);
    }

    pub fn assert_dir(&self, rel: &str) {
        assert!(self.path(rel).is_dir(), "expected directory: {}", rel);
    }

    pub fn assert_absent(&self, rel: &str) {
        assert!(!self.path(rel).exists(), "expected nothing at: {}", rel);
    }

    /// All entries below the root as sorted relative paths. Symbolic links
    /// are listed but not followed.
    pub fn entries(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect(self.root(), "", &mut out);
        out.sort();
        out
    }
}

fn collect(dir: &Path, prefix: &str, out: &mut Vec<String>) {
    for entry in fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        let name = entry.file_name().to_string_lossy().into_owned();
        let rel = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix, name)
        };
        if entry.file_type().unwrap().is_dir() {
            collect(&entry.path(), &rel, out);
        }
        out.push(rel);
    }
}
