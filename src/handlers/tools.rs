use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::tools::{self, ToolDefinition, ToolOutcome, GET_RECOVERIES};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct ToolListResponse {
    pub tools: Vec<ToolDefinition>,
}

#[derive(Debug, Deserialize)]
pub struct CallToolRequest {
    pub name: String,
    /// Tool arguments; `get_recoveries` takes none.
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct CallToolResponse {
    pub content: Vec<TextContent>,
    #[serde(rename = "isError")]
    pub is_error: bool,
}

#[derive(Debug, Serialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub content_type: &'static str,
    pub text: String,
}

impl From<ToolOutcome> for CallToolResponse {
    fn from(outcome: ToolOutcome) -> Self {
        Self {
            content: vec![TextContent {
                content_type: "text",
                text: outcome.text,
            }],
            is_error: outcome.is_error,
        }
    }
}

/// GET /tools - List the tools this service exposes
pub async fn list_tools_handler() -> Json<ToolListResponse> {
    Json(ToolListResponse {
        tools: tools::tool_definitions(),
    })
}

/// POST /tools/call - Invoke a tool by name.
///
/// # Flow
/// 1. Validate the tool name
/// 2. Dispatch; the tool's text (including upstream failures) is returned
///    with 200 and `isError` set accordingly
pub async fn call_tool_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CallToolRequest>,
) -> Result<Json<CallToolResponse>> {
    if request.name.is_empty() {
        return Err(AppError::ValidationError(
            "Tool name cannot be empty".to_string(),
        ));
    }
    let tool = tools::find_tool(&request.name)
        .ok_or_else(|| AppError::UnknownTool(request.name.clone()))?;

    let start_time = std::time::Instant::now();

    let outcome = match tool.name {
        GET_RECOVERIES => {
            if !request.arguments.is_empty() {
                tracing::debug!(
                    ignored = request.arguments.len(),
                    "get_recoveries takes no arguments"
                );
            }
            tools::get_recoveries(&state.client).await
        }
        other => return Err(AppError::UnknownTool(other.to_string())),
    };

    let total_ms = start_time.elapsed().as_millis();
    tracing::info!(
        tool = tool.name,
        is_error = outcome.is_error,
        total_ms,
        "Tool call completed"
    );

    metrics::counter!("tool_calls_total", "tool" => tool.name).increment(1);
    if outcome.is_error {
        metrics::counter!("tool_call_errors_total", "tool" => tool.name).increment(1);
    }

    Ok(Json(outcome.into()))
}
