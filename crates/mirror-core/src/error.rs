//! Error types for mirror-core

use std::path::PathBuf;

/// Result type for mirror-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching or mirroring a remote tree
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Remote date could not be parsed as `day.month.year`
    #[error("Malformed remote date '{value}': {reason}")]
    MalformedDate { value: String, reason: String },

    /// Node name cannot be used as a local path segment
    #[error("Invalid node name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Two children of one folder share a name
    #[error("Folder '{folder}' already has a child named '{name}'")]
    DuplicateChild { folder: String, name: String },

    /// Session collaborator failed to list or fetch
    #[error("Transport failure for {target}: {message}")]
    Transport { target: String, message: String },

    /// Listing a remote folder (or anything beneath it) failed
    #[error("Failed to fetch folder {reference}")]
    Fetch {
        reference: String,
        #[source]
        source: Box<Error>,
    },

    /// Folder nesting deeper than the configured bound
    #[error("Folder {reference} exceeds maximum depth {max_depth}")]
    DepthExceeded { reference: String, max_depth: usize },

    /// A local path cannot serve as a mirror target
    #[error("Invalid local path {path}: {reason}")]
    InvalidLocalPath { path: PathBuf, reason: String },

    /// Retrieving or storing one document failed
    #[error("Failed to download '{document}' to {path}")]
    Download {
        document: String,
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    /// The operation was cancelled between node visits
    #[error("Operation cancelled")]
    Cancelled,

    /// Filesystem error from mirror-fs
    #[error(transparent)]
    Fs(#[from] mirror_fs::Error),
}

impl Error {
    pub fn transport(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            target: target.into(),
            message: message.into(),
        }
    }

    pub(crate) fn fetch(reference: impl Into<String>, source: Error) -> Self {
        Self::Fetch {
            reference: reference.into(),
            source: Box::new(source),
        }
    }

    /// The innermost error of a `Fetch` / `Download` chain.
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::Fetch { source, .. } | Self::Download { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
