//! YAML document scripts: an initial tree manifest plus a sequence of
//! operations to apply against the document manager.

mod operation;
mod script;

pub use operation::{Operation, print_from_operation};
pub use script::{Script, ScriptCreationError};
