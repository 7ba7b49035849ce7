//! Remote document tree mirroring
//!
//! This crate mirrors a course portal's folder/document hierarchy onto a local
//! directory, downloading only files that are new or updated remotely:
//!
//! - **tree**: the remote hierarchy as a `Document | Folder` tagged variant
//! - **fetch**: builds a complete tree through a [`Session`]
//! - **sync**: walks a tree against the filesystem and downloads stale files
//! - **course**: fetch + sync for one course's document area
//!
//! # Architecture
//!
//! ```text
//!            course
//!              |
//!      +-------+--------+
//!      |                |
//!    fetch            sync (engine, download)
//!      |                |
//!   session          mirror-fs
//!      |
//!  tree / date
//! ```
//!
//! # Example
//!
//! ```ignore
//! use mirror_core::{FolderRef, Synchronizer, TreeFetcher};
//!
//! let tree = TreeFetcher::new(&session).fetch(&FolderRef::parse("M2T3STAGES"))?;
//! let report = Synchronizer::new(&session).synchronize(&tree, base)?;
//! println!("{}", report.summary());
//! ```

pub mod cancel;
pub mod config;
pub mod course;
pub mod date;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod session;
pub mod sync;
pub mod tree;

pub use cancel::CancelToken;
pub use config::MirrorConfig;
pub use course::{mirror_course, mirror_course_with_cancel};
pub use date::{DateZone, RemoteDate};
pub use error::{Error, Result};
pub use fetch::TreeFetcher;
pub use session::{FolderRef, RawEntry, Session};
pub use sync::{
    Downloader, Failure, FailureKind, Freshness, SyncOptions, SyncReport, Synchronizer,
};
pub use tree::{Document, Folder, Node};
