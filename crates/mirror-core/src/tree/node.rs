//! Remote tree nodes
//!
//! A [`Node`] is either a [`Document`] leaf or a [`Folder`] that exclusively
//! owns its children, so the structure is a tree by construction.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::date::RemoteDate;
use crate::{Error, Result};

fn check_name(name: &str) -> Result<()> {
    mirror_fs::validate_segment(name).map_err(|e| match e {
        mirror_fs::Error::InvalidSegment { segment, reason } => Error::InvalidName {
            name: segment,
            reason,
        },
        other => Error::Fs(other),
    })
}

/// A remote file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    location: String,
    last_modified: RemoteDate,
}

impl Document {
    /// Build a document, parsing `date` as local midnight.
    ///
    /// # Errors
    ///
    /// `InvalidName` when `name` is not a single path segment,
    /// `MalformedDate` when `date` is not `day.month.year`.
    pub fn new(name: impl Into<String>, location: impl Into<String>, date: &str) -> Result<Self> {
        Self::with_date(name, location, RemoteDate::parse(date)?)
    }

    pub fn with_date(
        name: impl Into<String>,
        location: impl Into<String>,
        last_modified: RemoteDate,
    ) -> Result<Self> {
        let name = name.into();
        check_name(&name)?;
        Ok(Self {
            name,
            location: location.into(),
            last_modified,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Opaque reference handed back to the session to fetch the bytes.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn last_modified(&self) -> &RemoteDate {
        &self.last_modified
    }
}

/// A remote folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Folder {
    name: String,
    children: BTreeMap<String, Node>,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        check_name(&name)?;
        Ok(Self {
            name,
            children: BTreeMap::new(),
        })
    }

    /// The synthetic, unnamed root. It mirrors onto the sync base itself.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_root(&self) -> bool {
        self.name.is_empty()
    }

    /// Add a child, refusing a name that is already taken.
    pub fn insert(&mut self, node: impl Into<Node>) -> Result<()> {
        let node = node.into();
        match self.children.entry(node.name().to_string()) {
            Entry::Occupied(slot) => Err(Error::DuplicateChild {
                folder: self.name.clone(),
                name: slot.key().clone(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(node);
                Ok(())
            }
        }
    }

    /// Builder-style [`Folder::insert`].
    pub fn with_child(mut self, node: impl Into<Node>) -> Result<Self> {
        self.insert(node)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.values()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Documents anywhere below this folder.
    pub fn document_count(&self) -> usize {
        self.children()
            .map(|child| match child {
                Node::Document(_) => 1,
                Node::Folder(folder) => folder.document_count(),
            })
            .sum()
    }

    /// Folders anywhere below this folder, not counting itself.
    pub fn folder_count(&self) -> usize {
        self.children()
            .map(|child| match child {
                Node::Document(_) => 0,
                Node::Folder(folder) => 1 + folder.folder_count(),
            })
            .sum()
    }
}

/// Either kind of remote node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Document(Document),
    Folder(Folder),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Document(doc) => doc.name(),
            Node::Folder(folder) => folder.name(),
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Node::Document(doc) => Some(doc),
            Node::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Node::Folder(folder) => Some(folder),
            Node::Document(_) => None,
        }
    }
}

impl From<Document> for Node {
    fn from(doc: Document) -> Self {
        Node::Document(doc)
    }
}

impl From<Folder> for Node {
    fn from(folder: Folder) -> Self {
        Node::Folder(folder)
    }
}
