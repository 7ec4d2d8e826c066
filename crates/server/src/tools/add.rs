//! todo_add tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use todos_core::{NewItem, TodoService};

use super::notice_result;

/// Parameters for the todo_add tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TodoAddParams {
    /// Short title. Must not be empty.
    pub title: String,
    /// Body text. Must not be empty.
    pub content: String,
}

/// Implementation of the todo_add tool.
pub async fn add_impl(service: &TodoService, params: TodoAddParams) -> Result<CallToolResult, McpError> {
    let notice = service.add(NewItem::new(params.title, params.content)).await;
    notice_result(&notice)
}
