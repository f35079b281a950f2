use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

use crate::state::AppState;

pub const MCP_PATH: &str = "/mcp";

pub fn router() -> Router<AppState> {
    Router::new().route(MCP_PATH, post(mcp_post).get(mcp_get))
}

async fn mcp_get() -> Response {
    StatusCode::METHOD_NOT_ALLOWED.into_response()
}

/// MCP JSON-RPC endpoint (single message or batch)
#[utoipa::path(
    post,
    path = "/mcp",
    request_body(content = String, content_type = "application/json", description = "JSON-RPC 2.0 request, notification, or batch"),
    responses(
        (status = 200, description = "JSON-RPC response or array of responses"),
        (status = 202, description = "Input contained only notifications")
    ),
    tag = "mcp"
)]
pub async fn mcp_post(State(state): State<AppState>, body: Bytes) -> Response {
    let incoming: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::warn!(event = "mcp_parse_error", error = %err, "Rejected unparseable MCP body");
            return (
                StatusCode::OK,
                Json(resume_mcp_runtime::parse_error_response()),
            )
                .into_response();
        }
    };

    let mut responses = resume_mcp_runtime::handle_http_jsonrpc(&state.dispatcher, incoming);

    match responses.len() {
        0 => StatusCode::ACCEPTED.into_response(),
        1 => (StatusCode::OK, Json(responses.remove(0))).into_response(),
        _ => (StatusCode::OK, Json(Value::Array(responses))).into_response(),
    }
}
