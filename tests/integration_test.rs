//! Integration tests for the SondeHub tool service.
//!
//! The SondeHub API is replaced by a throwaway axum server on a loopback
//! port, so these tests never leave the machine.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use sondehub_tools::{get_recoveries, router, AppState, Config, SondeHubClient};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceExt;

/// Start a fake SondeHub API answering `GET /recovered` with a fixed reply.
/// Returns its base URL.
async fn spawn_upstream(status: StatusCode, body: String) -> String {
    let app = Router::new().route(
        "/recovered",
        get(move || {
            let body = body.clone();
            async move { (status, body) }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/", addr)
}

/// Helper to create the tool router against a given upstream.
fn create_test_app(api_base: &str) -> Router {
    let state = AppState::new(Config::with_api_base(api_base)).expect("Failed to create AppState");
    router(Arc::new(state))
}

/// Helper to make a JSON request to the router.
async fn json_request(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let req = match method {
        "GET" => Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
        "POST" => Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.unwrap_or(json!({})).to_string()))
            .unwrap(),
        _ => panic!("Unsupported method"),
    };

    let response = app.oneshot(req).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!({}));

    (status, body)
}

async fn call_get_recoveries(app: Router) -> (StatusCode, Value) {
    json_request(
        app,
        "POST",
        "/tools/call",
        Some(json!({ "name": "get_recoveries", "arguments": {} })),
    )
    .await
}

fn result_text(body: &Value) -> &str {
    body["content"][0]["text"].as_str().unwrap_or("")
}

// ============================================================================
// Health Endpoint Tests
// ============================================================================

#[tokio::test]
async fn test_health_endpoint_returns_200() {
    let app = create_test_app("http://127.0.0.1:1/");
    let (status, body) = json_request(app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "sondehub-tools");
}

#[tokio::test]
async fn test_health_reports_upstream() {
    let app = create_test_app("http://127.0.0.1:1/");
    let (status, body) = json_request(app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["upstream"], "http://127.0.0.1:1/");
}

#[tokio::test]
async fn test_tool_call_served_right_after_state_creation() {
    let base = spawn_upstream(StatusCode::OK, "[]".to_string()).await;
    let app = create_test_app(&base);

    let (status, body) = call_get_recoveries(app).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result_text(&body), "No data found in the API response.");
}

// ============================================================================
// Tool Catalog Tests
// ============================================================================

#[tokio::test]
async fn test_list_tools() {
    let app = create_test_app("http://127.0.0.1:1/");
    let (status, body) = json_request(app, "GET", "/tools", None).await;

    assert_eq!(status, StatusCode::OK);
    let tools = body["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "get_recoveries");
    assert_eq!(tools[0]["inputSchema"]["type"], "object");
}

#[tokio::test]
async fn test_unknown_tool_returns_404() {
    let app = create_test_app("http://127.0.0.1:1/");
    let (status, body) = json_request(
        app,
        "POST",
        "/tools/call",
        Some(json!({ "name": "get_predictions" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("get_predictions"));
}

#[tokio::test]
async fn test_empty_tool_name_returns_400() {
    let app = create_test_app("http://127.0.0.1:1/");
    let (status, body) =
        json_request(app, "POST", "/tools/call", Some(json!({ "name": "" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("empty"));
}

// ============================================================================
// get_recoveries End-to-End Tests
// ============================================================================

#[tokio::test]
async fn test_get_recoveries_formats_upstream_payload() {
    let payload = json!([
        {
            "datetime": "2024-03-15T12:30:00Z",
            "serial": "S1234567",
            "lat": -37.8,
            "lon": 145.0,
            "alt": 52.5,
            "recovered": true,
            "recovered_by": "Jane Doe",
            "description": "string"
        },
        {
            "datetime": "2024-03-16T08:00:00Z",
            "serial": "T7654321",
            "recovered": false,
            "recovered_by": "string"
        }
    ]);
    let base = spawn_upstream(StatusCode::OK, payload.to_string()).await;
    let app = create_test_app(&base);

    let (status, body) = call_get_recoveries(app).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isError"], false);
    assert_eq!(body["content"][0]["type"], "text");

    let text = result_text(&body);
    assert!(text.starts_with("# Data Report\nContaining 2 events.\n\n"));
    assert!(text.contains("- Date and Time: March 15, 2024 at 12:30:00 UTC\n"));
    assert!(text.contains("- Recovered By: Jane Doe\n"));
    assert!(text.contains("Latitude Unknown, Longitude Unknown, Altitude Unknown meters"));
    assert!(!text.contains("Additional Details"));
    assert!(!text.contains("string"));
}

#[tokio::test]
async fn test_get_recoveries_truncates_large_payload() {
    let events: Vec<Value> = (0..15)
        .map(|i| json!({ "serial": format!("S{}", i), "recovered": false }))
        .collect();
    let base = spawn_upstream(StatusCode::OK, Value::Array(events).to_string()).await;
    let app = create_test_app(&base);

    let (_, body) = call_get_recoveries(app).await;
    let text = result_text(&body);

    assert!(text.contains("Containing 15 events."));
    assert_eq!(text.matches("Event Details:").count(), 10);
}

#[tokio::test]
async fn test_get_recoveries_upstream_503_is_error_text() {
    let base = spawn_upstream(StatusCode::SERVICE_UNAVAILABLE, "down".to_string()).await;
    let app = create_test_app(&base);

    let (status, body) = call_get_recoveries(app).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isError"], true);

    let text = result_text(&body);
    assert!(text.starts_with("Error: "));
    assert!(text.contains("503"));
    assert!(!text.contains("# Data Report"));
    assert!(!text.contains("Event Details"));
}

#[tokio::test]
async fn test_get_recoveries_empty_payload() {
    let base = spawn_upstream(StatusCode::OK, "[]".to_string()).await;
    let app = create_test_app(&base);

    let (_, body) = call_get_recoveries(app).await;

    assert_eq!(body["isError"], false);
    assert_eq!(result_text(&body), "No data found in the API response.");
}

#[tokio::test]
async fn test_get_recoveries_invalid_json() {
    let base = spawn_upstream(StatusCode::OK, "{not json".to_string()).await;
    let app = create_test_app(&base);

    let (_, body) = call_get_recoveries(app).await;

    assert_eq!(body["isError"], true);
    assert_eq!(
        result_text(&body),
        "Error: Invalid JSON in the API response."
    );
}

#[tokio::test]
async fn test_get_recoveries_direct_call() {
    let base = spawn_upstream(StatusCode::NOT_FOUND, "missing".to_string()).await;
    let client = SondeHubClient::new(base.clone()).unwrap();

    let outcome = get_recoveries(&client).await;

    assert!(outcome.is_error);
    assert_eq!(
        outcome.text,
        format!("Error: Client error '404 Not Found' for url '{}recovered'", base)
    );
}
