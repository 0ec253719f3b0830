use derive_more::From;
use snafu::prelude::*;

/// Name suffix carried by nodes created through duplication.
const COPY_SUFFIX: &str = "-copie";

/// Leaf node holding a name and text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFile {
    name: String,
    content: String,
}

impl TextFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_content(name, String::new())
    }

    pub fn with_content(name: impl Into<String>, content: impl Into<String>) -> Self {
        TextFile {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Container node owning an ordered sequence of children.
///
/// Children keep their insertion order. Sibling names are expected to be
/// unique, but appending never checks for collisions; a duplicate name makes
/// later lookups by that name resolve the first match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    name: String,
    children: Vec<Node>,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_children(name, Vec::new())
    }

    pub fn with_children(name: impl Into<String>, children: Vec<Node>) -> Self {
        Folder {
            name: name.into(),
            children,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a child without any uniqueness check.
    pub fn add_child(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Returns the first child carrying the given name.
    pub fn child_by_name(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name() == name)
    }

    pub fn child_by_name_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|child| child.name() == name)
    }

    /// Removes the first child carrying the given name and returns it,
    /// preserving the relative order of the remaining children.
    pub fn delete_child(&mut self, name: &str) -> Result<Node, ChildNotFoundError> {
        let index = self
            .children
            .iter()
            .position(|child| child.name() == name)
            .context(ChildNotFoundSnafu { name })?;
        Ok(self.children.remove(index))
    }
}

/// A node of the document tree: either a text file or a folder.
#[derive(Debug, Clone, From, PartialEq, Eq)]
pub enum Node {
    File(TextFile),
    Folder(Folder),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::File(file) => file.name(),
            Node::Folder(folder) => folder.name(),
        }
    }

    /// Builds a copy of this node under the derived "<name>-copie" name.
    ///
    /// Folder children are cloned recursively, so the copy never shares
    /// state with the original.
    pub fn duplicate(&self) -> Node {
        match self {
            Node::File(file) => {
                TextFile::with_content(format!("{}{}", file.name(), COPY_SUFFIX), file.content())
                    .into()
            }
            Node::Folder(folder) => Folder::with_children(
                format!("{}{}", folder.name(), COPY_SUFFIX),
                folder.children().to_vec(),
            )
            .into(),
        }
    }
}

#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
#[snafu(display("Child '{}' not found", name))]
pub struct ChildNotFoundError {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_file_defaults_to_empty_content() {
        let file = TextFile::new("notes");
        assert_eq!(file.name(), "notes");
        assert_eq!(file.content(), "");
    }

    #[test]
    fn folder_preserves_insertion_order() {
        let mut folder = Folder::new("root");
        folder.add_child(TextFile::new("b"));
        folder.add_child(Folder::new("a"));
        folder.add_child(TextFile::new("c"));

        let names: Vec<&str> = folder.children().iter().map(Node::name).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn child_by_name_returns_first_match() {
        let mut folder = Folder::new("root");
        folder.add_child(TextFile::with_content("twin", "first"));
        folder.add_child(TextFile::with_content("twin", "second"));

        match folder.child_by_name("twin") {
            Some(Node::File(file)) => assert_eq!(file.content(), "first"),
            other => panic!("Expected the first 'twin' file, got {:?}", other),
        }
    }

    #[test]
    fn child_by_name_signals_absence_with_none() {
        let folder = Folder::new("root");
        assert!(folder.child_by_name("missing").is_none());
    }

    #[test]
    fn delete_child_keeps_remaining_order() {
        let mut folder = Folder::new("root");
        folder.add_child(TextFile::new("a"));
        folder.add_child(TextFile::new("b"));
        folder.add_child(TextFile::new("c"));

        let removed = folder.delete_child("b").expect("Failed to delete child");
        assert_eq!(removed.name(), "b");

        let names: Vec<&str> = folder.children().iter().map(Node::name).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn delete_child_fails_when_absent() {
        let mut folder = Folder::new("root");
        let result = folder.delete_child("missing");
        assert!(matches!(result, Err(ChildNotFoundError { .. })));
    }

    #[test]
    fn duplicate_file_derives_name_and_copies_content() {
        let node = Node::from(TextFile::with_content("report", "body"));
        match node.duplicate() {
            Node::File(copy) => {
                assert_eq!(copy.name(), "report-copie");
                assert_eq!(copy.content(), "body");
            }
            other => panic!("Expected a file copy, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_folder_is_a_deep_copy() {
        let mut folder = Folder::new("docs");
        folder.add_child(TextFile::new("inner"));
        let mut original = Node::from(folder);

        let copy = original.duplicate();

        // Mutating the original after duplication must not show up in the copy.
        if let Node::Folder(folder) = &mut original {
            folder.add_child(TextFile::new("later"));
        }
        match copy {
            Node::Folder(copy) => {
                assert_eq!(copy.name(), "docs-copie");
                let names: Vec<&str> = copy.children().iter().map(Node::name).collect();
                assert_eq!(names, vec!["inner"]);
            }
            other => panic!("Expected a folder copy, got {:?}", other),
        }
    }
}
