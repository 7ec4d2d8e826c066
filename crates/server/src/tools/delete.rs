//! todo_delete tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use todos_core::TodoService;

use super::{notice_result, require_id};

/// Parameters for the todo_delete tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TodoDeleteParams {
    /// Id of the todo to delete.
    pub id: String,
}

/// Implementation of the todo_delete tool.
pub async fn delete_impl(service: &TodoService, params: TodoDeleteParams) -> Result<CallToolResult, McpError> {
    require_id(&params.id)?;
    let notice = service.remove(&params.id).await;
    notice_result(&notice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{json, service};
    use todos_core::NewItem;

    #[tokio::test]
    async fn test_delete_removes_row() {
        let (todos, service) = service().await;
        service.add(NewItem::new("A", "B")).await;
        let id = service.open_page().await.unwrap().items[0].id.clone();

        let result = delete_impl(&service, TodoDeleteParams { id }).await.unwrap();
        assert_eq!(json(&result)["title"], "Todo Deleted");
        assert!(todos.is_empty());
    }

    #[tokio::test]
    async fn test_delete_twice_reports_error() {
        let (_, service) = service().await;
        service.add(NewItem::new("A", "B")).await;
        let id = service.open_page().await.unwrap().items[0].id.clone();

        delete_impl(&service, TodoDeleteParams { id: id.clone() }).await.unwrap();
        let result = delete_impl(&service, TodoDeleteParams { id }).await.unwrap();
        assert_eq!(result.is_error, Some(true));
    }
}
