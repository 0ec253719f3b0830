use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::document::{DocumentError, DocumentManager};
use crate::script::{Script, ScriptCreationError, print_from_operation};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let script = Script::from_path(&app_config.script)
            .await
            .context(ScriptSnafu)?;
        debug!("Loaded script: {:?}", script);

        let (root, operations) = script.into_parts();
        let mut manager = DocumentManager::new(root);

        for (index, operation) in operations.iter().enumerate() {
            debug!("Applying operation {}: {:?}", index, operation);
            let output = operation
                .apply(&mut manager)
                .context(OperationSnafu { index })?;
            if let Some(output) = output {
                for line in output.lines() {
                    print_from_operation(operation.label(), line);
                }
            }
        }
        info!("Applied {} operations", operations.len());

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the script"))]
    ScriptError { source: ScriptCreationError },
    #[snafu(display("Operation {} failed", index))]
    OperationError {
        index: usize,
        source: DocumentError,
    },
}
