//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::{
    add::{TodoAddParams, add_impl},
    complete::{TodoCompleteParams, complete_impl},
    delete::{TodoDeleteParams, delete_impl},
    edit::{TodoEditParams, edit_impl},
    list::{TodoListParams, list_impl},
    prefs::{TodoReorderParams, TodoSetFilterParams, reorder_impl, set_filter_impl},
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use todos_core::TodoService;

/// The main MCP server handler for mcp-todos.
#[derive(Clone)]
pub struct McpTodosServer {
    service: Arc<TodoService>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl McpTodosServer {
    pub fn new(service: Arc<TodoService>) -> Self {
        Self { service, tool_router: Self::tool_router() }
    }

    #[tool(description = "List todos for the active filter, in saved display order. Returns items plus page pointers.")]
    async fn todo_list(&self, params: Parameters<TodoListParams>) -> Result<CallToolResult, McpError> {
        list_impl(&self.service, params.0).await
    }

    #[tool(description = "Add a todo with a title and content. Both must be non-empty.")]
    async fn todo_add(&self, params: Parameters<TodoAddParams>) -> Result<CallToolResult, McpError> {
        add_impl(&self.service, params.0).await
    }

    #[tool(description = "Replace the title and content of a todo by id.")]
    async fn todo_edit(&self, params: Parameters<TodoEditParams>) -> Result<CallToolResult, McpError> {
        edit_impl(&self.service, params.0).await
    }

    /// Mark a todo done.
    ///
    /// The cached page is updated before the backend confirms and rolled back if it refuses.
    #[tool(description = "Mark a todo as done by id. Marking an already-done todo succeeds.")]
    async fn todo_complete(&self, params: Parameters<TodoCompleteParams>) -> Result<CallToolResult, McpError> {
        complete_impl(&self.service, params.0).await
    }

    #[tool(description = "Delete a todo by id.")]
    async fn todo_delete(&self, params: Parameters<TodoDeleteParams>) -> Result<CallToolResult, McpError> {
        delete_impl(&self.service, params.0).await
    }

    #[tool(description = "Switch the active filter (all, done, undone). The choice is remembered across restarts.")]
    async fn todo_set_filter(&self, params: Parameters<TodoSetFilterParams>) -> Result<CallToolResult, McpError> {
        set_filter_impl(&self.service, params.0).await
    }

    #[tool(description = "Save a display order as a list of {slotId, itemId} pairs. Unlisted todos follow in page order.")]
    async fn todo_reorder(&self, params: Parameters<TodoReorderParams>) -> Result<CallToolResult, McpError> {
        reorder_impl(&self.service, params.0).await
    }
}

impl ServerHandler for McpTodosServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-todos".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
