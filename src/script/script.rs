use compio::{fs::File, io::AsyncReadExt, io::BufReader};
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use std::{borrow::Cow, io::Cursor, path::Path};
use tracing::debug;

use crate::document::{Folder, TextFile};
use crate::ext::BestEffortPathExt;
use crate::script::Operation;

/// A parsed document script: the initial tree under the root folder and the
/// operations to apply against it.
#[derive(Debug, Clone)]
pub struct Script {
    root: Folder,
    operations: Vec<Operation>,
}

impl Script {
    pub async fn from_path(path: &Path) -> Result<Self, ScriptCreationError> {
        debug!("Opening script file: {}", path.best_effort_path_display());
        let file = File::open(path).await.context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;

        debug!("Reading script file");
        let cursor = Cursor::new(file);
        let mut reader = BufReader::new(cursor);
        let res = reader.read_to_string(String::new()).await;
        match res.0 {
            Ok(n) => debug!("Successfully read script file: {n} bytes"),
            _ => {
                res.0.context(ReadSnafu {
                    file_path: path.best_effort_path_display(),
                })?;
            }
        }
        res.1.as_str().try_into()
    }

    pub fn root(&self) -> &Folder {
        &self.root
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn into_parts(self) -> (Folder, Vec<Operation>) {
        (self.root, self.operations)
    }

    fn parse_tree(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<Folder, ScriptCreationError> {
        let mut root = Folder::new("root");
        let Some(tree) = top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed("tree")))) else {
            return Ok(root);
        };
        let entries = tree.as_mapping().ok_or(ScriptCreationError::TreeNotMap)?;
        Self::populate_folder(&mut root, entries);
        Ok(root)
    }

    fn populate_folder(folder: &mut Folder, entries: &LinkedHashMap<Yaml, Yaml>) {
        for (key, value) in entries {
            let Some(name) = key.as_str() else {
                debug!("Skipping tree entry with non-string name: {:?}", key);
                continue;
            };
            match value {
                // A mapping value is a sub-folder, anything scalar is a file.
                Yaml::Mapping(children) => {
                    let mut sub = Folder::new(name);
                    Self::populate_folder(&mut sub, children);
                    folder.add_child(sub);
                }
                Yaml::Value(Scalar::Null) => folder.add_child(TextFile::new(name)),
                other => match other.as_str() {
                    Some(content) => folder.add_child(TextFile::with_content(name, content)),
                    None => debug!("Skipping tree entry '{}' with unsupported value", name),
                },
            }
        }
    }

    fn parse_operations(
        top_level: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<Vec<Operation>, ScriptCreationError> {
        let Some(operations) =
            top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed("operations"))))
        else {
            return Ok(Vec::new());
        };
        let sequence = operations
            .as_sequence()
            .ok_or(ScriptCreationError::OperationsNotSequence)?;
        Ok(sequence.iter().filter_map(Operation::from_yaml).collect())
    }
}

impl TryFrom<&str> for Script {
    type Error = ScriptCreationError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents)
            .map_err(|e| ScriptCreationError::ParseError { source: e })?;
        let contents = documents
            .first()
            .ok_or(ScriptCreationError::MalformedScript)?;

        let top_level = contents
            .as_mapping()
            .ok_or(ScriptCreationError::TopLevelNotMap)?;

        let root = Self::parse_tree(top_level)?;
        let operations = Self::parse_operations(top_level)?;

        Ok(Script { root, operations })
    }
}

#[derive(Debug, Snafu)]
pub enum ScriptCreationError {
    #[snafu(display("Failed to read the script file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the script file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted script file"))]
    MalformedScript,
    #[snafu(display("Top level of a script should be a map"))]
    TopLevelNotMap,
    #[snafu(display("The tree section should be a map"))]
    TreeNotMap,
    #[snafu(display("The operations section should be a sequence"))]
    OperationsNotSequence,
}
