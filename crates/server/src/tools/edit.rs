//! todo_edit tool implementation.
//!
//! Replaces the title and content of an existing todo.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use todos_core::{NewItem, TodoService};

use super::{notice_result, require_id};

/// Parameters for the todo_edit tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TodoEditParams {
    /// Id of the todo to edit.
    pub id: String,
    pub title: String,
    pub content: String,
}

/// Implementation of the todo_edit tool.
pub async fn edit_impl(service: &TodoService, params: TodoEditParams) -> Result<CallToolResult, McpError> {
    require_id(&params.id)?;
    let notice = service.edit(&params.id, NewItem::new(params.title, params.content)).await;
    notice_result(&notice)
}
