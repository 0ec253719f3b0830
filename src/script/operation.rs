use std::borrow::Cow;

use colored::Colorize;
use hashlink::LinkedHashMap;
use saphyr::{Scalar, Yaml};
use tracing::{debug, warn};

use crate::document::{DocumentError, DocumentManager, Folder, Node, TextFile};

/// One step of a document script, applied against the manager in order.
#[derive(Debug, Clone)]
pub enum Operation {
    Get { path: String },
    Add { path: String, node: Node },
    Delete { path: String },
    Duplicate { path: String },
    Move { from: String, to: String },
    Print { path: String },
}

impl Operation {
    /// Parses one entry of the `operations` sequence. Entries that are not
    /// mappings, lack required fields, or name an unknown operation are
    /// skipped.
    pub fn from_yaml(entry: &Yaml) -> Option<Self> {
        let Some(mapping) = entry.as_mapping() else {
            warn!("Skipping operation entry that is not a mapping: {:?}", entry);
            return None;
        };

        let kind = get_str(mapping, "op")?;
        debug!("Parsing operation of kind '{}'", kind);
        match kind {
            "get" => Some(Operation::Get {
                path: get_str(mapping, "path")?.to_string(),
            }),
            "add" => Self::parse_add(mapping),
            "delete" => Some(Operation::Delete {
                path: get_str(mapping, "path")?.to_string(),
            }),
            "duplicate" => Some(Operation::Duplicate {
                path: get_str(mapping, "path")?.to_string(),
            }),
            "move" => Some(Operation::Move {
                from: get_str(mapping, "from")?.to_string(),
                to: get_str(mapping, "to")?.to_string(),
            }),
            "print" => Some(Operation::Print {
                path: get_str(mapping, "path")?.to_string(),
            }),
            other => {
                warn!("Unknown operation kind '{}'. Skipping.", other);
                None
            }
        }
    }

    fn parse_add(mapping: &LinkedHashMap<Yaml, Yaml>) -> Option<Operation> {
        let path = get_str(mapping, "path")?.to_string();
        let node = if let Some(name) = get_str(mapping, "file") {
            let content = get_str(mapping, "content").unwrap_or_default();
            Node::from(TextFile::with_content(name, content))
        } else if let Some(name) = get_str(mapping, "folder") {
            Node::from(Folder::new(name))
        } else {
            warn!("Add operation needs a 'file' or 'folder' name. Skipping.");
            return None;
        };
        Some(Operation::Add { path, node })
    }

    /// Applies the operation and returns its printable output, if any.
    pub fn apply(&self, manager: &mut DocumentManager) -> Result<Option<String>, DocumentError> {
        match self {
            Operation::Get { path } => {
                let node = manager.get_child(path)?;
                Ok(Some(node.name().to_string()))
            }
            Operation::Add { path, node } => {
                let new_path = manager.add_child(path, node.clone())?;
                Ok(Some(new_path))
            }
            Operation::Delete { path } => {
                manager.delete(path)?;
                Ok(None)
            }
            Operation::Duplicate { path } => {
                manager.duplicate(path)?;
                Ok(None)
            }
            Operation::Move { from, to } => {
                manager.move_node(from, to)?;
                Ok(None)
            }
            Operation::Print { path } => Ok(Some(manager.render(path)?)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Operation::Get { .. } => "get",
            Operation::Add { .. } => "add",
            Operation::Delete { .. } => "delete",
            Operation::Duplicate { .. } => "duplicate",
            Operation::Move { .. } => "move",
            Operation::Print { .. } => "print",
        }
    }
}

/// Prints one output line of an operation, prefixed by its label.
pub fn print_from_operation(label: &str, line: &str) {
    println!("{} {} {}", label.cyan().bold(), "|".dimmed(), line);
}

fn get_str<'a>(mapping: &'a LinkedHashMap<Yaml, Yaml>, key: &'static str) -> Option<&'a str> {
    mapping
        .get(&Yaml::Value(Scalar::String(Cow::Borrowed(key))))
        .and_then(|value| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use saphyr::LoadableYamlNode;

    fn first_operation(yaml: &str) -> Option<Operation> {
        let documents = Yaml::load_from_str(yaml).expect("Failed to parse test YAML");
        Operation::from_yaml(&documents[0])
    }

    #[test]
    fn parses_a_get_operation() {
        let operation = first_operation("op: get\npath: /file1");
        assert!(matches!(operation, Some(Operation::Get { path }) if path == "/file1"));
    }

    #[test]
    fn parses_an_add_file_operation_with_content() {
        let operation = first_operation("op: add\npath: /\nfile: notes\ncontent: hello");
        match operation {
            Some(Operation::Add { path, node }) => {
                assert_eq!(path, "/");
                assert_eq!(node, Node::from(TextFile::with_content("notes", "hello")));
            }
            other => panic!("Expected an add operation, got {:?}", other),
        }
    }

    #[test]
    fn parses_an_add_folder_operation() {
        let operation = first_operation("op: add\npath: /\nfolder: docs");
        match operation {
            Some(Operation::Add { node, .. }) => {
                assert_eq!(node, Node::from(Folder::new("docs")));
            }
            other => panic!("Expected an add operation, got {:?}", other),
        }
    }

    #[test]
    fn parses_a_move_operation() {
        let operation = first_operation("op: move\nfrom: folder1/file1\nto: folder2");
        assert!(matches!(
            operation,
            Some(Operation::Move { from, to }) if from == "folder1/file1" && to == "folder2"
        ));
    }

    #[test]
    fn skips_unknown_operation_kinds() {
        assert!(first_operation("op: archive\npath: /file1").is_none());
    }

    #[test]
    fn skips_operations_missing_required_fields() {
        assert!(first_operation("op: delete").is_none());
        assert!(first_operation("op: add\npath: /").is_none());
    }

    #[test]
    fn skips_entries_that_are_not_mappings() {
        assert!(first_operation("just a string").is_none());
    }

    #[test]
    fn apply_add_returns_the_new_path() {
        let mut manager = DocumentManager::default();
        let operation = first_operation("op: add\npath: /\nfile: notes").expect("Parse failed");
        let output = operation.apply(&mut manager).expect("Apply failed");
        assert_eq!(output.as_deref(), Some("/notes"));
    }

    #[test]
    fn apply_print_returns_the_rendering() {
        let mut manager = DocumentManager::default();
        manager
            .add_child("/", TextFile::new("file1"))
            .expect("Failed to add file");
        let operation = first_operation("op: print\npath: /").expect("Parse failed");
        let output = operation.apply(&mut manager).expect("Apply failed");
        assert_eq!(output.as_deref(), Some("/\n\tfile1"));
    }

    #[test]
    fn apply_surfaces_manager_errors() {
        let mut manager = DocumentManager::default();
        let operation = first_operation("op: delete\npath: /missing").expect("Parse failed");
        let result = operation.apply(&mut manager);
        assert!(matches!(result, Err(DocumentError::ChildNotFound { .. })));
    }
}
