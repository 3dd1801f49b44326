//! The shared CRUD surface behind every resource group.
//!
//! All seven resource families behave identically; only their paths and
//! envelope keys differ, and those come from the endpoint catalog.

use serde_json::{Map, Value, json};
use voluum_api::Resource;
use voluum_util::normalize::unwrap_list;

use crate::cli::{CrudCommand, GlobalArgs};
use crate::commands::helpers::resolve_data_input;
use crate::context::CommandContext;
use crate::error::CommandError;

pub async fn run(
    resource: Resource,
    command: &CrudCommand,
    global: &GlobalArgs,
) -> Result<Value, CommandError> {
    let context = CommandContext::resolve(global)?;
    run_with_context(resource, command, &context).await
}

pub(crate) async fn run_with_context(
    resource: Resource,
    command: &CrudCommand,
    context: &CommandContext,
) -> Result<Value, CommandError> {
    context.require_token()?;

    match command {
        CrudCommand::List => {
            let response = context.client.get(resource.base_path(), None).await?;
            let entries = unwrap_list(response, resource.plural_field());
            Ok(keyed(resource.plural_field(), entries))
        }
        CrudCommand::Get { id } => {
            let response = context.client.get(&resource.item_path(id), None).await?;
            Ok(keyed(resource.singular_key(), response))
        }
        CrudCommand::Create { input } => {
            let body = resolve_data_input(input).await?;
            let response = context.client.post(resource.base_path(), Some(&body), None).await?;
            Ok(keyed(resource.singular_key(), response))
        }
        CrudCommand::Update { id, input } => {
            let body = resolve_data_input(input).await?;
            let response = context.client.put(&resource.item_path(id), Some(&body), None).await?;
            Ok(keyed(resource.singular_key(), response))
        }
        CrudCommand::Delete { id } => {
            let response = context.client.delete(&resource.item_path(id), None).await?;
            Ok(json!({ "deleted": true, "id": id, "response": response }))
        }
    }
}

fn keyed(key: &str, value: Value) -> Value {
    let mut object = Map::new();
    object.insert(key.to_string(), value);
    Value::Object(object)
}
