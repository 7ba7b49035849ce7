//! Shared test utilities for the mirror workspace.
//!
//! This crate is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`session`]: [`FakeSession`], an in-memory portal with failure injection
//! - [`dir`]: [`TestDir`], a temporary sync base with assertion helpers

pub mod dir;
pub mod session;

pub use dir::TestDir;
pub use session::FakeSession;
