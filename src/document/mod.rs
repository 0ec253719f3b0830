//! In-memory document tree: named folders and text files addressable by
//! slash-delimited paths.
//!
//! The node model is a tagged union of files and folders; the manager layers
//! path resolution and the mutation operations on top of it.

mod manager;
mod node;

pub use manager::{DocumentError, DocumentManager};
pub use node::{ChildNotFoundError, Folder, Node, TextFile};
