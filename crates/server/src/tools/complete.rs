//! todo_complete tool implementation.
//!
//! Marks a todo done through the optimistic cache path: the active page
//! reflects the change before the backend confirms it.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use todos_core::TodoService;

use super::{notice_result, require_id};

/// Parameters for the todo_complete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TodoCompleteParams {
    /// Id of the todo to mark done.
    pub id: String,
}

/// Implementation of the todo_complete tool.
pub async fn complete_impl(service: &TodoService, params: TodoCompleteParams) -> Result<CallToolResult, McpError> {
    require_id(&params.id)?;
    let notice = service.complete(&params.id).await;
    notice_result(&notice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{json, service};
    use todos_core::NewItem;

    #[tokio::test]
    async fn test_complete_marks_done() {
        let (todos, service) = service().await;
        service.add(NewItem::new("A", "B")).await;
        let id = service.open_page().await.unwrap().items[0].id.clone();

        let result = complete_impl(&service, TodoCompleteParams { id: id.clone() }).await.unwrap();
        assert_eq!(json(&result)["title"], "Todo Done");
        assert!(todos.get(&id).unwrap().done);
    }

    #[tokio::test]
    async fn test_complete_unknown_id() {
        let (_, service) = service().await;
        service.open_page().await.unwrap();

        let result = complete_impl(&service, TodoCompleteParams { id: "nope".into() }).await.unwrap();
        assert_eq!(result.is_error, Some(true));
        assert_eq!(json(&result)["kind"], "error");
    }
}
