//! Tree fetcher
//!
//! Builds a complete [`Folder`] from a remote reference by listing it through
//! the [`Session`] and descending depth-first into every sub-folder. The
//! result is all-or-nothing: any failure below a folder fails that folder.

use tracing::{debug, info};

use crate::cancel::CancelToken;
use crate::config::{DEFAULT_MAX_DEPTH, MirrorConfig};
use crate::date::{DateZone, RemoteDate};
use crate::session::{FolderRef, RawEntry, Session};
use crate::tree::{Document, Folder, Node};
use crate::{Error, Result};

/// Builds remote trees from a session.
pub struct TreeFetcher<'s, S: Session + ?Sized> {
    session: &'s S,
    max_depth: usize,
    date_zone: DateZone,
    cancel: CancelToken,
}

impl<'s, S: Session + ?Sized> TreeFetcher<'s, S> {
    pub fn new(session: &'s S) -> Self {
        Self {
            session,
            max_depth: DEFAULT_MAX_DEPTH,
            date_zone: DateZone::Local,
            cancel: CancelToken::new(),
        }
    }

    pub fn from_config(session: &'s S, config: &MirrorConfig) -> Self {
        Self::new(session)
            .with_max_depth(config.max_depth)
            .with_date_zone(config.date_zone)
    }

    /// Maximum folder nesting below the starting folder.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_date_zone(mut self, zone: DateZone) -> Self {
        self.date_zone = zone;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Fetch a folder as the synthetic (unnamed) root.
    ///
    /// # Errors
    ///
    /// `Fetch` wrapping the first failure found anywhere in the tree, or
    /// `Cancelled`.
    pub fn fetch(&self, reference: &FolderRef) -> Result<Folder> {
        self.fetch_root(Folder::root(), reference)
    }

    /// Fetch a folder as a root named `name`, so it mirrors into `<base>/<name>`.
    pub fn fetch_named(&self, name: &str, reference: &FolderRef) -> Result<Folder> {
        let root = Folder::new(name).map_err(|e| Error::fetch(reference.to_string(), e))?;
        self.fetch_root(root, reference)
    }

    fn fetch_root(&self, root: Folder, reference: &FolderRef) -> Result<Folder> {
        let folder = self.populate(root, reference, 0)?;
        info!(
            reference = %reference,
            documents = folder.document_count(),
            folders = folder.folder_count(),
            "fetched remote tree"
        );
        Ok(folder)
    }

    fn populate(&self, mut folder: Folder, reference: &FolderRef, depth: usize) -> Result<Folder> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if depth > self.max_depth {
            return Err(Error::fetch(
                reference.to_string(),
                Error::DepthExceeded {
                    reference: reference.to_string(),
                    max_depth: self.max_depth,
                },
            ));
        }

        let entries = self
            .session
            .list_folder(reference)
            .map_err(|e| Error::fetch(reference.to_string(), e))?;
        debug!(reference = %reference, entries = entries.len(), depth, "listed folder");

        for entry in entries {
            let child = self.build_child(entry, depth);
            let inserted = child.and_then(|node| folder.insert(node));
            match inserted {
                Ok(()) => {}
                Err(Error::Cancelled) => return Err(Error::Cancelled),
                Err(e) => return Err(Error::fetch(reference.to_string(), e)),
            }
        }

        Ok(folder)
    }

    fn build_child(&self, entry: RawEntry, depth: usize) -> Result<Node> {
        if entry.is_folder {
            let sub_ref = FolderRef::Path(entry.location);
            let sub = self.populate(Folder::new(entry.name)?, &sub_ref, depth + 1)?;
            Ok(sub.into())
        } else {
            let date = RemoteDate::parse_in(&entry.date, self.date_zone)?;
            Ok(Document::with_date(entry.name, entry.location, date)?.into())
        }
    }
}
