//! MCP server implementation for Trellis
//!
//! Exposes the item store's operation set over the Model Context Protocol
//! so AI assistants can create, inspect, and maintain plan hierarchies.
//! Every tool is a thin wrapper that calls the planner and returns the
//! shared markdown formatting as text.

use std::sync::Arc;

use anyhow::Result;
use log::{debug, error, info};
use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router, ErrorData, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;
use tokio::signal::unix::{signal, SignalKind};
use trellis_core::{
    display::{CreateResult, Items, OperationStatus},
    params as core,
    Planner,
};

pub mod errors;

use errors::to_mcp_error;

/// Generic MCP wrapper for core parameter types with serde integration
///
/// Provides JSON deserialization and schema generation for any core
/// parameter type without individual wrapper structs, keeping the core
/// types free of protocol dependencies.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

// Type aliases for cleaner usage in tool signatures
pub type Id = McpParams<core::Id>;
pub type CreatePlan = McpParams<core::CreatePlan>;
pub type AddStep = McpParams<core::AddStep>;
pub type QueryItems = McpParams<core::QueryItems>;
pub type UpdateItem = McpParams<core::UpdateItem>;
pub type DeleteItem = McpParams<core::DeleteItem>;
pub type SetStatus = McpParams<core::SetStatus>;
pub type Reschedule = McpParams<core::Reschedule>;

pub type McpResult = Result<CallToolResult, ErrorData>;

fn text_result(text: String) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

/// MCP server for Trellis
#[derive(Clone)]
pub struct TrellisMcpServer {
    planner: Arc<Planner>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl TrellisMcpServer {
    /// Create a new Trellis MCP server
    pub fn new(planner: Planner) -> Self {
        Self {
            planner: Arc::new(planner),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "create_plan",
        description = "Create a new top-level plan. Provide a name (required) and optionally a description, a category (e.g. 'travel', 'study'), ISO dates for scheduled_at and deadline (YYYY-MM-DD), and a metadata JSON object (e.g. {\"budget\": 500}). A date earlier in the current year than today is reinterpreted as next year's same date; dates in past years are rejected. Returns the new plan ID for adding steps."
    )]
    async fn create_plan(&self, Parameters(params): Parameters<CreatePlan>) -> McpResult {
        debug!("create_plan: {:?}", params);

        let plan = self
            .planner
            .create_plan(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to create plan", &e))?;

        text_result(CreateResult::new(plan).to_string())
    }

    #[tool(
        name = "add_step",
        description = "Add a step (sub-task) under an existing plan or step. Requires parent_id and name. The step inherits the parent's category. Optionally include a description, a scheduled_at date (YYYY-MM-DD, taken as-is), and a metadata JSON object."
    )]
    async fn add_step(&self, Parameters(params): Parameters<AddStep>) -> McpResult {
        debug!("add_step: {:?}", params);

        let step = self
            .planner
            .add_step(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to add step", &e))?;

        text_result(CreateResult::new(step).to_string())
    }

    #[tool(
        name = "list_items",
        description = "List items with optional filters: top_level=true for plans only, parent_id for one item's direct children (the two are mutually exclusive; omit both for no parent filter), plus category, status ('pending', 'in_progress', 'completed', 'cancelled'), and a scheduled_from/scheduled_to date range. Results are ordered by scheduled date, then creation time; items without a date come last."
    )]
    async fn list_items(&self, Parameters(params): Parameters<QueryItems>) -> McpResult {
        debug!("list_items: {:?}", params);

        let items = self
            .planner
            .query_items(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to list items", &e))?;

        text_result(Items(items).to_string())
    }

    #[tool(
        name = "show_item",
        description = "Display the details of a single item: status, category, schedule, metadata, and timestamps. Use show_tree to include the item's steps."
    )]
    async fn show_item(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_item: {:?}", params);

        let item = self
            .planner
            .get_item(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to get item", &e))?;

        text_result(item.to_string())
    }

    #[tool(
        name = "show_tree",
        description = "Display an item together with its entire subtree of steps, recursively. Essential for understanding a plan's structure and progress."
    )]
    async fn show_tree(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_tree: {:?}", params);

        let tree = self
            .planner
            .get_tree(params.as_ref())
            .await
            .map_err(|e| to_mcp_error("Failed to get tree", &e))?;

        text_result(tree.to_string())
    }

    #[tool(
        name = "count_subtree",
        description = "Count the items in a subtree, the root included. Returns 0 when the item does not exist. Useful before deleting to see how many items would be removed."
    )]
    async fn count_subtree(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("count_subtree: {:?}", params);

        let inner = params.as_ref();
        let count = self
            .planner
            .count_subtree(inner)
            .await
            .map_err(|e| to_mcp_error("Failed to count subtree", &e))?;

        text_result(format!(
            "Subtree of item {} contains {count} item(s)",
            inner.id
        ))
    }

    #[tool(
        name = "update_item",
        description = "Modify an existing item's fields: name, description, category, status, scheduled_at, deadline, metadata, or parent (parent_id to move under another item, detach=true for top level). Only supplied fields change. Reports when the item does not exist instead of failing."
    )]
    async fn update_item(&self, Parameters(params): Parameters<UpdateItem>) -> McpResult {
        debug!("update_item: {:?}", params);

        let inner = params.as_ref();
        let updated = self
            .planner
            .update_item(inner)
            .await
            .map_err(|e| to_mcp_error("Failed to update item", &e))?;

        if updated {
            text_result(
                OperationStatus::success(format!("Item {} updated", inner.id)).to_string(),
            )
        } else {
            text_result(format!("Item {} not found or nothing to update", inner.id))
        }
    }

    #[tool(
        name = "set_status",
        description = "Update the status of an item. Valid statuses: 'pending', 'in_progress', 'completed', 'cancelled'."
    )]
    async fn set_status(&self, Parameters(params): Parameters<SetStatus>) -> McpResult {
        debug!("set_status: {:?}", params);

        let inner = params.as_ref();
        let update: core::UpdateItem = inner.clone().into();
        let updated = self
            .planner
            .update_item(&update)
            .await
            .map_err(|e| to_mcp_error("Failed to update status", &e))?;

        if updated {
            text_result(format!("Item {} status updated to '{}'", inner.id, inner.status))
        } else {
            text_result(format!("Item {} not found", inner.id))
        }
    }

    #[tool(
        name = "reschedule_item",
        description = "Change an item's scheduled date (YYYY-MM-DD). The date is taken exactly as given; rescheduling never applies the roll-forward adjustment used at plan creation."
    )]
    async fn reschedule_item(&self, Parameters(params): Parameters<Reschedule>) -> McpResult {
        debug!("reschedule_item: {:?}", params);

        let inner = params.as_ref();
        let update: core::UpdateItem = inner.clone().into();
        let updated = self
            .planner
            .update_item(&update)
            .await
            .map_err(|e| to_mcp_error("Failed to reschedule item", &e))?;

        if updated {
            text_result(format!(
                "Item {} rescheduled to {}",
                inner.id, inner.scheduled_at
            ))
        } else {
            text_result(format!("Item {} not found", inner.id))
        }
    }

    #[tool(
        name = "delete_item",
        description = "Permanently delete an item and its entire subtree of steps. This cannot be undone, so confirmed=true is required. Returns how many items were removed. Use count_subtree first to preview the impact."
    )]
    async fn delete_item(&self, Parameters(params): Parameters<DeleteItem>) -> McpResult {
        debug!("delete_item: {:?}", params);

        let inner = params.as_ref();
        let outcome = self
            .planner
            .delete_item(inner)
            .await
            .map_err(|e| to_mcp_error("Failed to delete item", &e))?;

        match outcome {
            Some(result) => text_result(result.to_string()),
            None => Err(ErrorData::internal_error(
                format!("Item with ID {} not found", inner.id),
                None,
            )),
        }
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for TrellisMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "trellis".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                r#"Trellis is a plan management system that keeps a hierarchy of plans and their nested steps in a local database.

## Core Concepts
- **Plans**: top-level items with a name, category, optional schedule (scheduled_at/deadline), and a free-form metadata document
- **Steps**: items nested under a plan (or another step), inheriting the parent's category at creation
- **Statuses**: pending, in_progress, completed, cancelled

## Workflow Examples

### Starting a Plan
1. Create a plan with `create_plan` (dates are YYYY-MM-DD; a date earlier in the current year than today is moved to next year)
2. Break the work down with `add_step`
3. Review the structure with `show_tree`

### Tracking Progress
1. `list_items` with top_level=true shows the plans; parent_id lists one plan's steps
2. Move work along with `set_status` (pending → in_progress → completed)
3. Shift dates with `reschedule_item`

### Cleaning Up
- `count_subtree` previews how many items a deletion would remove
- `delete_item` with confirmed=true removes a plan and every step under it

## Tool Categories
- **Creation**: create_plan, add_step
- **Reading**: list_items, show_item, show_tree, count_subtree
- **Maintenance**: update_item, set_status, reschedule_item, delete_item"#
                    .to_string(),
            ),
        }
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: TrellisMcpServer) -> Result<()> {
    use rmcp::{transport::stdio, ServiceExt};

    info!("Starting Trellis MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    // Set up signal handlers for graceful shutdown
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
