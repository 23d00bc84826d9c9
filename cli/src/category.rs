use category_graph_core::{CategoryStore, CategoryUpdate, NewCategory};
use serde_json::{json, Value};

use crate::config::CategoryCommand;
use crate::error::CliError;
use crate::store::JsonFileStore;

pub fn run(store: &mut JsonFileStore, command: CategoryCommand) -> Result<Value, CliError> {
    match command {
        CategoryCommand::Add(args) => {
            let new = NewCategory {
                name: args.name,
                description: args.description,
                parent: args.parent,
            };
            let category = store.mutate(|s| s.create_category(new))?;
            Ok(serde_json::to_value(category)?)
        }
        CategoryCommand::Update(args) => {
            let parent = if args.root {
                Some(None)
            } else {
                args.parent.map(Some)
            };
            let update = CategoryUpdate {
                name: args.name,
                description: args.description,
                parent,
            };
            let category = store.mutate(|s| s.update_category(args.id, update))?;
            Ok(serde_json::to_value(category)?)
        }
        CategoryCommand::Rm { id } => {
            let removed = store.mutate(|s| s.delete_category(id))?;
            Ok(json!({ "status": "removed", "ids": removed }))
        }
        CategoryCommand::Show { id } => Ok(serde_json::to_value(store.require_category(id)?)?),
        CategoryCommand::List => Ok(serde_json::to_value(store.list_categories()?)?),
        CategoryCommand::Image {
            id,
            reference,
            clear,
        } => {
            let image = if clear { None } else { reference };
            let category = store.mutate(|s| s.set_image(id, image))?;
            Ok(serde_json::to_value(category)?)
        }
    }
}
