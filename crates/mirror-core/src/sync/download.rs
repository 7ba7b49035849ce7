//! Single-document download

use std::path::{Path, PathBuf};

use mirror_fs::RobustnessConfig;
use mirror_fs::io::{self, EntryKind};
use tracing::info;

use crate::session::Session;
use crate::tree::Document;
use crate::{Error, Result};

/// Materializes documents into local directories.
pub struct Downloader<'s, S: Session + ?Sized> {
    session: &'s S,
    robustness: RobustnessConfig,
}

impl<'s, S: Session + ?Sized> Downloader<'s, S> {
    pub fn new(session: &'s S) -> Self {
        Self {
            session,
            robustness: RobustnessConfig::default(),
        }
    }

    pub fn with_robustness(mut self, robustness: RobustnessConfig) -> Self {
        self.robustness = robustness;
        self
    }

    /// Fetch `doc` and store it as `<dest_dir>/<name>` with the remote date as mtime.
    ///
    /// The content is written to a temp file, stamped, then renamed into
    /// place, so `<dest_dir>/<name>` never holds new bytes without the
    /// matching timestamp. `dest_dir` must already exist.
    ///
    /// # Errors
    ///
    /// `Download` naming the document, wrapping the transport or storage error.
    /// A directory or symbolic link at the destination is refused before any
    /// bytes are fetched.
    pub fn download(&self, doc: &Document, dest_dir: &Path) -> Result<PathBuf> {
        let path = dest_dir.join(doc.name());
        let failed = |source: Error| Error::Download {
            document: doc.name().to_string(),
            path: path.clone(),
            source: Box::new(source),
        };

        if let Some(kind) = io::entry_kind(&path).map_err(|e| failed(e.into()))?
            && kind != EntryKind::File
        {
            return Err(failed(Error::InvalidLocalPath {
                path: path.clone(),
                reason: format!("a {kind} occupies the document's place"),
            }));
        }

        let content = self.session.fetch(doc.location()).map_err(failed)?;
        io::write_atomic_with_mtime(
            &path,
            &content,
            doc.last_modified().to_file_time(),
            self.robustness,
        )
        .map_err(|e| failed(e.into()))?;

        info!(
            path = %path.display(),
            bytes = content.len(),
            remote_date = %doc.last_modified(),
            "downloaded"
        );
        Ok(path)
    }
}
