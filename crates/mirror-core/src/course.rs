//! Mirroring a course's document area
//!
//! A course's documents are mirrored into a directory named after the course
//! code, so several courses can share one base directory.

use std::path::Path;

use tracing::info;

use crate::config::MirrorConfig;
use crate::fetch::TreeFetcher;
use crate::session::{FolderRef, Session};
use crate::sync::{SyncReport, Synchronizer};
use crate::{CancelToken, Error, Result};

/// Fetch and mirror one course's documents into `<base>/<code>`.
///
/// `base` must already exist; it is checked before any network traffic.
///
/// # Errors
///
/// `InvalidLocalPath` for a bad base, `Fetch` when the tree cannot be built.
/// Per-file problems are reported in the returned [`SyncReport`].
pub fn mirror_course<S: Session + ?Sized>(
    session: &S,
    code: &str,
    base: &Path,
    config: &MirrorConfig,
) -> Result<SyncReport> {
    mirror_course_with_cancel(session, code, base, config, CancelToken::new())
}

/// [`mirror_course`] with a cancellation handle shared by fetch and sync.
pub fn mirror_course_with_cancel<S: Session + ?Sized>(
    session: &S,
    code: &str,
    base: &Path,
    config: &MirrorConfig,
    cancel: CancelToken,
) -> Result<SyncReport> {
    if !base.is_dir() {
        return Err(Error::InvalidLocalPath {
            path: base.to_path_buf(),
            reason: "does not exist or is not a directory".into(),
        });
    }

    info!(course = code, base = %base.display(), "mirroring course documents");
    let tree = TreeFetcher::from_config(session, config)
        .with_cancel(cancel.clone())
        .fetch_named(code, &FolderRef::Course(code.to_string()))?;

    Synchronizer::from_config(session, config)
        .with_cancel(cancel)
        .synchronize(&tree, base)
}
