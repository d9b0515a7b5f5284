//! Agent-facing tool catalog and dispatch.
//!
//! Definitions follow the MCP `tools/list` shape so agents can register them
//! directly; outcomes map onto MCP `tools/call` text results.

use crate::client::SondeHubClient;
use crate::report::format_recoveries;
use serde::Serialize;
use serde_json::{json, Value};

pub const GET_RECOVERIES: &str = "get_recoveries";

/// Tool definition as advertised to agents.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Text result of a tool invocation.
///
/// Failures are still text: the agent reads the message rather than
/// branching on a status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutcome {
    pub fn ok(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    pub fn error(text: String) -> Self {
        Self {
            text,
            is_error: true,
        }
    }
}

/// All tools this service exposes.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![ToolDefinition {
        name: GET_RECOVERIES,
        description: "Retrieves the latest recovery data from the SondeHub API.",
        input_schema: json!({
            "type": "object",
            "properties": {},
            "required": []
        }),
    }]
}

/// Look up a tool by the name an agent called it with.
pub fn find_tool(name: &str) -> Option<ToolDefinition> {
    tool_definitions().into_iter().find(|t| t.name == name)
}

/// Fetch `/recovered` and render it for an LLM.
///
/// Transport failures become `Error: <cause>`; formatter diagnostics pass
/// through unchanged.
pub async fn get_recoveries(client: &SondeHubClient) -> ToolOutcome {
    let body = match client.recovered().await {
        Ok(body) => body,
        Err(e) => return ToolOutcome::error(format!("Error: {}", e)),
    };

    match format_recoveries(&body) {
        Ok(report) => ToolOutcome::ok(report.to_string()),
        Err(e) => {
            tracing::warn!(error = ?e, "Recovery payload could not be formatted");
            ToolOutcome::error(e.to_string())
        }
    }
}
