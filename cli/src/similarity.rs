use category_graph_core::{CategoryStore, SimilarityManager};
use serde_json::{json, Value};

use crate::config::SimilarCommand;
use crate::error::CliError;

pub fn run<S: CategoryStore>(store: &mut S, command: &SimilarCommand) -> Result<Value, CliError> {
    let mut manager = SimilarityManager::new(store);
    match *command {
        SimilarCommand::Add { first, second } => match manager.add(first, second) {
            Ok(edge) => Ok(json!({ "status": "created", "edge": edge })),
            Err(e) if e.is_already_done() => {
                let existing = manager.find(first, second)?;
                tracing::warn!(first, second, "{}", e);
                Ok(json!({ "status": "duplicate", "edge": existing }))
            }
            Err(e) => Err(e.into()),
        },
        SimilarCommand::List { id } => Ok(serde_json::to_value(manager.list_for_category(id)?)?),
        SimilarCommand::Rm { first, other } => {
            let edge = manager.remove(first, other)?;
            Ok(json!({ "status": "removed", "edge": edge }))
        }
    }
}
