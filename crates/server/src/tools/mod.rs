//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-todos server.

pub mod add;
pub mod complete;
pub mod delete;
pub mod edit;
pub mod list;
pub mod prefs;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;
use todos_core::{Error, Notice};

/// Pretty JSON text result.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// A notice as the tool outcome; error notices set `is_error`.
pub(crate) fn notice_result(notice: &Notice) -> Result<CallToolResult, McpError> {
    let result = json_result(notice)?;
    if notice.is_success() { Ok(result) } else { Ok(CallToolResult::error(result.content)) }
}

pub(crate) fn require_id(id: &str) -> Result<(), Error> {
    if id.trim().is_empty() {
        return Err(Error::InvalidInput("id cannot be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use rmcp::model::CallToolResult;
    use todos_core::{MemoryCollection, MemoryStore, Preferences, SortDirection, TodoService};

    pub(crate) async fn service() -> (MemoryCollection, TodoService) {
        let todos = MemoryCollection::new("todos");
        let prefs = Preferences::new(Arc::new(MemoryStore::new()));
        let service = TodoService::open(Arc::new(todos.clone()), prefs, 10, SortDirection::Descending)
            .await
            .unwrap();
        (todos, service)
    }

    /// Parse the JSON text of the first content block.
    pub(crate) fn json(result: &CallToolResult) -> serde_json::Value {
        let text = result.content[0].as_text().unwrap();
        serde_json::from_str(&text.text).unwrap()
    }
}
