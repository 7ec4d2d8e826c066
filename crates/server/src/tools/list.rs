//! todo_list tool implementation.
//!
//! Returns the active filter's page, arranged by the saved slot order.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use todos_core::TodoService;

use super::json_result;

/// Parameters for the todo_list tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TodoListParams {
    /// 1-based page to show. Omit to reuse the current page.
    #[serde(default)]
    pub page: Option<u32>,
}

/// Implementation of the todo_list tool.
pub async fn list_impl(service: &TodoService, params: TodoListParams) -> Result<CallToolResult, McpError> {
    let view = match params.page {
        Some(page) => service.goto_page(page).await?,
        None => service.open_page().await?,
    };
    json_result(&view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{json, service};
    use todos_core::NewItem;

    #[tokio::test]
    async fn test_list_empty() {
        let (_, service) = service().await;
        let result = list_impl(&service, TodoListParams::default()).await.unwrap();
        let output = json(&result);
        assert_eq!(output["items"], serde_json::json!([]));
        assert_eq!(output["filter"], "all");
        assert_eq!(output["total_pages"], 0);
    }

    #[tokio::test]
    async fn test_list_second_page() {
        let (_, service) = service().await;
        for i in 0..12 {
            service.add(NewItem::new(format!("t{i}"), "x")).await;
        }

        let result = list_impl(&service, TodoListParams { page: Some(2) }).await.unwrap();
        let output = json(&result);
        assert_eq!(output["items"].as_array().unwrap().len(), 2);
        assert_eq!(output["current_page"], 2);
        assert_eq!(output["previous_page"], 1);
    }

    #[tokio::test]
    async fn test_list_page_zero_rejected() {
        let (_, service) = service().await;
        let result = list_impl(&service, TodoListParams { page: Some(0) }).await;
        assert!(result.is_err());
    }
}
