use snafu::prelude::*;
use tracing::debug;

use super::node::{ChildNotFoundError, Folder, Node};

/// Stateful façade over a single document tree.
///
/// Every operation addresses nodes through slash-delimited paths resolved
/// against the root folder. The root's own name is never part of a path;
/// paths are relative to the root's children, and both the empty path and
/// "/" denote the root itself.
#[derive(Debug, Clone)]
pub struct DocumentManager {
    root: Node,
}

impl Default for DocumentManager {
    fn default() -> Self {
        DocumentManager::new(Folder::new("root"))
    }
}

impl DocumentManager {
    pub fn new(root: Folder) -> Self {
        DocumentManager {
            root: Node::Folder(root),
        }
    }

    /// Resolves a path to a node reference.
    ///
    /// Intermediate segments must name existing folders; the final segment
    /// must name an existing child of the folder reached so far.
    pub fn get_child(&self, path: &str) -> Result<&Node, DocumentError> {
        let segments = path_segments(path);
        let Some((last, intermediate)) = segments.split_last() else {
            return Ok(&self.root);
        };

        let mut current = &self.root;
        for &segment in intermediate {
            let child = match current {
                Node::Folder(folder) => folder.child_by_name(segment),
                Node::File(_) => None,
            };
            current = match child {
                Some(child @ Node::Folder(_)) => child,
                _ => return PathInvalidSnafu { path }.fail(),
            };
        }

        match current {
            Node::Folder(folder) => folder
                .child_by_name(last)
                .context(FileNotFoundSnafu { path }),
            Node::File(_) => PathInvalidSnafu { path }.fail(),
        }
    }

    fn get_child_mut(&mut self, path: &str) -> Result<&mut Node, DocumentError> {
        let segments = path_segments(path);
        let Some((last, intermediate)) = segments.split_last() else {
            return Ok(&mut self.root);
        };

        let mut current = &mut self.root;
        for &segment in intermediate {
            let child = match current {
                Node::Folder(folder) => folder.child_by_name_mut(segment),
                Node::File(_) => None,
            };
            current = match child {
                Some(child @ Node::Folder(_)) => child,
                _ => return PathInvalidSnafu { path }.fail(),
            };
        }

        match current {
            Node::Folder(folder) => folder
                .child_by_name_mut(last)
                .context(FileNotFoundSnafu { path }),
            Node::File(_) => PathInvalidSnafu { path }.fail(),
        }
    }

    /// Appends a node under the folder at `path` and returns the full path
    /// of the new node.
    pub fn add_child(&mut self, path: &str, node: impl Into<Node>) -> Result<String, DocumentError> {
        let node = node.into();
        let folder = match self.get_child_mut(path)? {
            Node::Folder(folder) => folder,
            Node::File(_) => return NotAFolderSnafu { path }.fail(),
        };
        let new_path = join_path(path, node.name());
        debug!("Adding '{}' under '{}'", node.name(), path);
        folder.add_child(node);
        Ok(new_path)
    }

    /// Removes the node at `path` from its parent folder.
    pub fn delete(&mut self, path: &str) -> Result<(), DocumentError> {
        let (parent_path, name) = split_last_segment(path);
        match self.get_child_mut(parent_path)? {
            Node::Folder(folder) => {
                folder.delete_child(name).context(ChildNotFoundSnafu)?;
                debug!("Deleted '{}' from '{}'", name, parent_path);
                Ok(())
            }
            Node::File(_) => PathInvalidSnafu { path }.fail(),
        }
    }

    /// Appends a sibling copy of the node at `path`, named "<name>-copie".
    ///
    /// There is no uniqueness check against an existing copy: repeated
    /// duplication appends another sibling with the same derived name, and
    /// later lookups by that name resolve the first one.
    pub fn duplicate(&mut self, path: &str) -> Result<(), DocumentError> {
        let copy = self.get_child(path)?.duplicate();
        let (parent_path, _) = split_last_segment(path);
        match self.get_child_mut(parent_path)? {
            Node::Folder(folder) => {
                debug!("Duplicating '{}' as '{}'", path, copy.name());
                folder.add_child(copy);
                Ok(())
            }
            Node::File(_) => PathInvalidSnafu { path }.fail(),
        }
    }

    /// Moves the node at `source` into the folder at `destination`.
    ///
    /// The destination is validated before the source is detached. If the
    /// destination can no longer be resolved afterwards (it lived inside the
    /// moved subtree), the node is reattached to its original parent and the
    /// operation fails without losing it.
    pub fn move_node(&mut self, source: &str, destination: &str) -> Result<(), DocumentError> {
        match self.get_child(destination)? {
            Node::Folder(_) => {}
            Node::File(_) => {
                return NotAFolderSnafu { path: destination }.fail();
            }
        }

        let (parent_path, name) = split_last_segment(source);
        let node = match self.get_child_mut(parent_path)? {
            Node::Folder(folder) => folder.delete_child(name).context(ChildNotFoundSnafu)?,
            Node::File(_) => return PathInvalidSnafu { path: source }.fail(),
        };

        match self.get_child_mut(destination) {
            Ok(Node::Folder(folder)) => {
                folder.add_child(node);
                debug!("Moved '{}' into '{}'", source, destination);
                Ok(())
            }
            _ => {
                // The destination disappeared together with the detached
                // subtree. Reattach the node where it came from.
                if let Ok(Node::Folder(parent)) = self.get_child_mut(parent_path) {
                    parent.add_child(node);
                }
                PathInvalidSnafu { path: destination }.fail()
            }
        }
    }

    /// Renders the node at `path` as a string.
    ///
    /// Files render as their bare name. Folders render the path string
    /// itself, followed by one line per descendant in pre-order, indented by
    /// one tab per depth level. A descendant folder literally named "root"
    /// renders as "/".
    pub fn render(&self, path: &str) -> Result<String, DocumentError> {
        match self.get_child(path)? {
            Node::File(file) => Ok(file.name().to_string()),
            Node::Folder(folder) => {
                let mut rendered = String::from(path);
                render_descendants(folder, 1, &mut rendered);
                Ok(rendered)
            }
        }
    }
}

/// Splits a path into its segment names. The empty path and "/" yield no
/// segments and denote the root itself. A single leading "/" is stripped;
/// splitting is otherwise literal, so "." and ".." have no special meaning.
fn path_segments(path: &str) -> Vec<&str> {
    if path.is_empty() || path == "/" {
        return Vec::new();
    }
    path.strip_prefix('/').unwrap_or(path).split('/').collect()
}

/// Splits a path into the parent path and the final segment name.
fn split_last_segment(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(index) => (&path[..index], &path[index + 1..]),
        None => ("", path),
    }
}

fn join_path(path: &str, name: &str) -> String {
    if path.is_empty() || path == "/" {
        format!("/{name}")
    } else {
        format!("{path}/{name}")
    }
}

fn render_descendants(folder: &Folder, depth: usize, out: &mut String) {
    for child in folder.children() {
        out.push('\n');
        out.push_str(&"\t".repeat(depth));
        match child {
            Node::File(file) => out.push_str(file.name()),
            Node::Folder(sub) => {
                out.push_str(if sub.name() == "root" { "/" } else { sub.name() });
                render_descendants(sub, depth + 1, out);
            }
        }
    }
}

#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[snafu(display("Path '{}' is not valid", path))]
    PathInvalid { path: String },
    #[snafu(display("File not found: '{}'", path))]
    FileNotFound { path: String },
    #[snafu(display("'{}' is not a folder", path))]
    NotAFolder { path: String },
    #[snafu(display("No matching child to remove"))]
    ChildNotFound { source: ChildNotFoundError },
}
