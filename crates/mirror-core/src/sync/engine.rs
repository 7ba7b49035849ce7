//! Synchronizer implementation
//!
//! Walks a remote [`Folder`] against a local directory. Folders become
//! directories (created when absent), documents are downloaded when missing
//! locally or when the remote date is strictly newer than the local mtime.

use std::path::{Path, PathBuf};

use mirror_fs::io::{self, EntryKind};
use mirror_fs::{NormalizedPath, RobustnessConfig};
use tracing::{debug, error, info, warn};

use super::download::Downloader;
use super::report::{FailureKind, SyncReport};
use crate::cancel::CancelToken;
use crate::config::MirrorConfig;
use crate::date::RemoteDate;
use crate::session::Session;
use crate::tree::{Document, Folder, Node};
use crate::{Error, Result};

/// Options for synchronize runs
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Decide and report, but leave the filesystem untouched.
    pub dry_run: bool,
}

/// Local state of one document relative to its remote date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// No local file
    Missing,
    /// Local mtime older than the remote date
    Stale,
    /// Local mtime equal to or newer than the remote date
    Current,
}

impl Freshness {
    /// Compare the file at `local` with `remote`.
    ///
    /// # Errors
    ///
    /// `InvalidLocalPath` when anything but a regular file occupies the
    /// document's place (a symbolic link included), or an I/O error when its
    /// metadata cannot be read.
    pub fn assess(local: &Path, remote: &RemoteDate) -> Result<Self> {
        match io::entry_kind(local)? {
            None => return Ok(Freshness::Missing),
            Some(EntryKind::File) => {}
            Some(kind) => {
                return Err(Error::InvalidLocalPath {
                    path: local.to_path_buf(),
                    reason: format!("a {kind} occupies the document's place"),
                });
            }
        }
        let Some(local_mtime) = io::modified_time(local)? else {
            return Ok(Freshness::Missing);
        };
        if remote.is_newer_than(local_mtime) {
            Ok(Freshness::Stale)
        } else {
            Ok(Freshness::Current)
        }
    }

    pub fn needs_download(self) -> bool {
        !matches!(self, Freshness::Current)
    }
}

/// Mirrors remote trees onto the local filesystem.
pub struct Synchronizer<'s, S: Session + ?Sized> {
    downloader: Downloader<'s, S>,
    options: SyncOptions,
    cancel: CancelToken,
}

impl<'s, S: Session + ?Sized> Synchronizer<'s, S> {
    pub fn new(session: &'s S) -> Self {
        Self {
            downloader: Downloader::new(session),
            options: SyncOptions::default(),
            cancel: CancelToken::new(),
        }
    }

    pub fn from_config(session: &'s S, config: &MirrorConfig) -> Self {
        Self::new(session)
            .with_options(SyncOptions {
                dry_run: config.dry_run,
            })
            .with_robustness(config.robustness())
    }

    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_robustness(mut self, robustness: RobustnessConfig) -> Self {
        self.downloader = self.downloader.with_robustness(robustness);
        self
    }

    /// Mirror `root` under `base`.
    ///
    /// An unnamed root maps onto `base` itself, a named root onto
    /// `base/<name>`. Per-node failures are collected in the report; the walk
    /// keeps going past them.
    ///
    /// # Errors
    ///
    /// `InvalidLocalPath` when `base` is missing or not a directory.
    pub fn synchronize(&self, root: &Folder, base: &Path) -> Result<SyncReport> {
        let base = validate_base(base)?;
        let mut report = SyncReport::new(self.options.dry_run);

        let (dir, rel) = if root.is_root() {
            (base.clone(), NormalizedPath::root())
        } else {
            (base.join(root.name()), NormalizedPath::root().join(root.name()))
        };

        info!(base = %base.display(), dry_run = self.options.dry_run, "synchronizing");
        self.sync_folder(root, &base, &dir, &rel, &mut report);

        if report.is_success() {
            info!(summary = %report.summary(), "synchronize finished");
        } else {
            warn!(summary = %report.summary(), "synchronize finished with problems");
        }
        Ok(report)
    }

    fn stop_requested(&self, report: &mut SyncReport) -> bool {
        if self.cancel.is_cancelled() {
            if !report.cancelled {
                info!("synchronize cancelled");
            }
            report.cancelled = true;
        }
        report.cancelled
    }

    fn sync_folder(
        &self,
        folder: &Folder,
        base: &Path,
        dir: &Path,
        rel: &NormalizedPath,
        report: &mut SyncReport,
    ) {
        if self.stop_requested(report) {
            return;
        }

        if let Err(e) = self.prepare_dir(base, dir, rel, report) {
            error!(path = %rel, error = %e, "cannot use directory, skipping subtree");
            report.fail(rel.clone(), FailureKind::Directory, &e);
            return;
        }

        for child in folder.children() {
            if self.stop_requested(report) {
                return;
            }
            let child_rel = rel.join(child.name());
            match child {
                Node::Folder(sub) => {
                    self.sync_folder(sub, base, &dir.join(sub.name()), &child_rel, report)
                }
                Node::Document(doc) => self.sync_document(doc, dir, child_rel, report),
            }
        }
    }

    /// Make `dir` an existing real directory under `base`, or say why not.
    ///
    /// Symbolic links are refused outright, even when they point back inside
    /// the base. A dry run performs the same checks but creates nothing.
    fn prepare_dir(
        &self,
        base: &Path,
        dir: &Path,
        rel: &NormalizedPath,
        report: &mut SyncReport,
    ) -> Result<()> {
        match io::entry_kind(dir)? {
            Some(EntryKind::Directory) => {}
            Some(kind) => {
                return Err(Error::InvalidLocalPath {
                    path: dir.to_path_buf(),
                    reason: format!("a {kind} occupies the folder's place"),
                });
            }
            None if self.options.dry_run => {
                debug!(path = %rel, "[dry-run] would create directory");
                return Ok(());
            }
            None => {
                if io::ensure_dir(dir)? {
                    debug!(path = %rel, "created directory");
                    report.created_dirs.push(rel.clone());
                }
            }
        }
        ensure_confined(base, dir)
    }

    fn sync_document(
        &self,
        doc: &Document,
        dir: &Path,
        rel: NormalizedPath,
        report: &mut SyncReport,
    ) {
        let local = dir.join(doc.name());
        let freshness = match Freshness::assess(&local, doc.last_modified()) {
            Ok(freshness) => freshness,
            Err(e) => {
                warn!(path = %rel, error = %e, "cannot inspect local file");
                report.fail(rel, FailureKind::Download, &e);
                return;
            }
        };

        if !freshness.needs_download() {
            debug!(path = %rel, "up to date");
            report.skipped.push(rel);
            return;
        }

        if self.options.dry_run {
            debug!(path = %rel, ?freshness, "[dry-run] would download");
            report.planned.push(rel);
            return;
        }

        match self.downloader.download(doc, dir) {
            Ok(_) => report.downloaded.push(rel),
            Err(e) => {
                warn!(path = %rel, error = %e, "download failed, continuing");
                report.fail(rel, FailureKind::Download, &e);
            }
        }
    }
}

fn validate_base(base: &Path) -> Result<PathBuf> {
    let invalid = |reason: String| Error::InvalidLocalPath {
        path: base.to_path_buf(),
        reason,
    };
    if !base.exists() {
        return Err(invalid("does not exist".into()));
    }
    if !base.is_dir() {
        return Err(invalid("is not a directory".into()));
    }
    dunce::canonicalize(base).map_err(|e| invalid(e.to_string()))
}

/// `dir` must resolve to `base` itself or somewhere beneath it.
fn ensure_confined(base: &Path, dir: &Path) -> Result<()> {
    let resolved = dunce::canonicalize(dir).map_err(|e| Error::InvalidLocalPath {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;
    if resolved.starts_with(base) {
        Ok(())
    } else {
        Err(Error::InvalidLocalPath {
            path: dir.to_path_buf(),
            reason: format!("resolves outside the sync base {}", base.display()),
        })
    }
}
