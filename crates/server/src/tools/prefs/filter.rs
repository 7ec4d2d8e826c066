//! todo_set_filter tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use todos_core::{Filter, TodoService};

use crate::tools::json_result;

/// Parameters for the todo_set_filter tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TodoSetFilterParams {
    /// One of `all`, `done`, `undone`.
    pub filter: Filter,
}

/// Implementation of the todo_set_filter tool.
pub async fn set_filter_impl(service: &TodoService, params: TodoSetFilterParams) -> Result<CallToolResult, McpError> {
    service.set_filter(params.filter).await?;
    json_result(&service.open_page().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{json, service};
    use todos_core::NewItem;

    #[tokio::test]
    async fn test_set_filter_switches_view() {
        let (_, service) = service().await;
        service.add(NewItem::new("A", "B")).await;
        service.add(NewItem::new("C", "D")).await;
        let id = service.open_page().await.unwrap().items[0].id.clone();
        service.complete(&id).await;

        let result = set_filter_impl(&service, TodoSetFilterParams { filter: Filter::Done }).await.unwrap();
        let output = json(&result);
        assert_eq!(output["filter"], "done");
        assert_eq!(output["items"].as_array().unwrap().len(), 1);
        assert_eq!(output["items"][0]["id"], id.as_str());
        assert_eq!(service.filter(), Filter::Done);
    }

    #[test]
    fn test_params_reject_unknown_filter() {
        let parsed: Result<TodoSetFilterParams, _> = serde_json::from_str(r#"{"filter":"someday"}"#);
        assert!(parsed.is_err());
    }
}
