//! Error handling utilities for the MCP server

use rmcp::ErrorData;
use trellis_core::PlannerError;

/// Helper to convert planner errors to MCP errors
pub fn to_mcp_error(message: &str, error: &PlannerError) -> ErrorData {
    ErrorData::internal_error(format!("{message}: {error}"), None)
}
