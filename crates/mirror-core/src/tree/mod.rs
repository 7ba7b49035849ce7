//! In-memory model of the remote folder/document hierarchy

mod node;

pub use node::{Document, Folder, Node};
