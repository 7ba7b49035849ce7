//! Mirroring a remote tree onto a local directory
//!
//! This module provides:
//! - **engine**: the [`Synchronizer`] walk and the per-file [`Freshness`] decision
//! - **download**: the [`Downloader`] that materializes one document
//! - **report**: the [`SyncReport`] summarizing a run

mod download;
mod engine;
mod report;

pub use download::Downloader;
pub use engine::{Freshness, SyncOptions, Synchronizer};
pub use report::{Failure, FailureKind, SyncReport};
