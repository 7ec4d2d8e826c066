//! todo_reorder tool implementation.
//!
//! Saves the display order as `{slotId, itemId}` pairs. Items left out keep
//! their page order after the slotted ones.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use todos_core::{SlotItem, TodoService};

use crate::tools::json_result;

/// Parameters for the todo_reorder tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TodoReorderParams {
    /// Slots in display order.
    pub slots: Vec<SlotItem>,
}

/// Implementation of the todo_reorder tool.
pub async fn reorder_impl(service: &TodoService, params: TodoReorderParams) -> Result<CallToolResult, McpError> {
    service.reorder(&params.slots).await?;
    json_result(&service.open_page().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{json, service};
    use todos_core::NewItem;

    #[tokio::test]
    async fn test_reorder_returns_arranged_page() {
        let (_, service) = service().await;
        service.add(NewItem::new("A", "x")).await;
        service.add(NewItem::new("B", "x")).await;
        let items = service.open_page().await.unwrap().items;
        assert_eq!(items[0].title, "B");

        let params = TodoReorderParams { slots: vec![SlotItem::new("0", items[1].id.clone())] };
        let output = json(&reorder_impl(&service, params).await.unwrap());
        assert_eq!(output["items"][0]["title"], "A");
        assert_eq!(output["items"][1]["title"], "B");
    }

    #[test]
    fn test_params_use_camel_case_slots() {
        let params: TodoReorderParams = serde_json::from_str(r#"{"slots":[{"slotId":"0","itemId":"7"}]}"#).unwrap();
        assert_eq!(params.slots, vec![SlotItem::new("0", "7")]);
    }
}
