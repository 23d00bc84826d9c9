use category_graph_core::{tree_query, CategoryStore};
use serde_json::Value;

use crate::error::CliError;

/// `tree <id> <kind>`: ids of the matching categories, in query order.
///
/// The kind string goes to the core unparsed so an unknown kind surfaces as
/// `InvalidQueryType`, the same as any other boundary would see it.
pub fn run<S: CategoryStore>(store: &S, id: u64, kind: &str) -> Result<Value, CliError> {
    let ids = tree_query(store, id, kind)?;
    tracing::debug!(id, kind, count = ids.len(), "tree query");
    Ok(serde_json::to_value(ids)?)
}
