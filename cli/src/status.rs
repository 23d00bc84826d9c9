use category_graph_core::{CategoryStore, Snapshot};
use serde_json::{json, Value};

use crate::error::CliError;
use crate::store::JsonFileStore;

pub fn run(store: &JsonFileStore) -> Result<Value, CliError> {
    let snapshot = Snapshot::load(store)?;
    let status = if store.path().exists() {
        "loaded"
    } else {
        "empty"
    };

    Ok(json!({
        "data": store.path().display().to_string(),
        "status": status,
        "categories": store.inner().category_count(),
        "roots": snapshot.tree().roots().len(),
        "similarities": store.inner().similarity_count(),
        "generation": store.generation(),
        "load_time_ms": snapshot.load_time_ms,
    }))
}
