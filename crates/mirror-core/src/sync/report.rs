//! Outcome of a synchronization run

use std::error::Error as StdError;

use mirror_fs::NormalizedPath;
use serde::{Deserialize, Serialize};

use crate::Error;

/// What could not be mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// A document could not be retrieved or written; siblings went on
    Download,
    /// A folder could not be created; its whole subtree was skipped
    Directory,
}

/// A single isolated failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// Path relative to the sync base
    pub path: NormalizedPath,
    pub kind: FailureKind,
    /// The error chain, outermost first
    pub reason: String,
}

impl Failure {
    pub fn new(path: NormalizedPath, kind: FailureKind, error: &Error) -> Self {
        let mut reason = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            reason.push_str(": ");
            reason.push_str(&cause.to_string());
            source = cause.source();
        }
        Self { path, kind, reason }
    }
}

/// Report from a synchronize run. All paths are relative to the sync base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Documents fetched and written
    pub downloaded: Vec<NormalizedPath>,
    /// Documents already up to date
    pub skipped: Vec<NormalizedPath>,
    /// Documents a dry run would have downloaded
    pub planned: Vec<NormalizedPath>,
    /// Directories created by this run
    pub created_dirs: Vec<NormalizedPath>,
    pub failed: Vec<Failure>,
    pub dry_run: bool,
    /// The walk stopped early on request
    pub cancelled: bool,
}

impl SyncReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    pub(crate) fn fail(&mut self, path: NormalizedPath, kind: FailureKind, error: &Error) {
        self.failed.push(Failure::new(path, kind, error));
    }

    /// True when every node was handled and the walk ran to completion.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && !self.cancelled
    }

    /// Failures of one kind.
    pub fn failures(&self, kind: FailureKind) -> impl Iterator<Item = &Failure> {
        self.failed.iter().filter(move |f| f.kind == kind)
    }

    /// One-line human summary, e.g. `3 downloaded, 5 skipped, 1 failed`.
    pub fn summary(&self) -> String {
        let mut summary = if self.dry_run {
            format!(
                "{} to download, {} skipped, {} failed (dry run)",
                self.planned.len(),
                self.skipped.len(),
                self.failed.len()
            )
        } else {
            format!(
                "{} downloaded, {} skipped, {} failed",
                self.downloaded.len(),
                self.skipped.len(),
                self.failed.len()
            )
        };
        if self.cancelled {
            summary.push_str(", cancelled");
        }
        summary
    }
}

impl std::fmt::Display for SyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.summary())?;
        for failure in &self.failed {
            writeln!(f, "  {:?} {}: {}", failure.kind, failure.path, failure.reason)?;
        }
        Ok(())
    }
}
