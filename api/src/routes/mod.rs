pub mod health;
pub mod landing;
pub mod mcp_http;
pub mod openapi;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router: MCP endpoint, landing page, health, OpenAPI document.
pub fn app(state: AppState, cors_layer: CorsLayer) -> Router {
    Router::new()
        .merge(landing::router())
        .merge(health::router())
        .merge(mcp_http::router())
        .merge(openapi::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode};
    use axum::response::Response;
    use resume_core::{DocumentStore, FileDocumentStore, ProfileDocument, StaticDocumentStore};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    fn app_with(store: Arc<dyn DocumentStore>) -> Router {
        let dispatcher = resume_mcp_runtime::build_dispatcher(store).unwrap();
        let state = AppState {
            dispatcher,
            server_url: "https://resume.example.com".to_string(),
        };
        app(state, CorsLayer::permissive())
    }

    fn sample_app() -> Router {
        app_with(Arc::new(StaticDocumentStore::new(ProfileDocument::sample())))
    }

    fn post_mcp(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/mcp")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_reports_tools_and_version() {
        let response = sample_app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["tools"], 4);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn health_is_degraded_when_document_missing() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with(Arc::new(FileDocumentStore::new(dir.path().join("none.json"))));
        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["status"], "degraded");
    }

    #[tokio::test]
    async fn mcp_tools_call_returns_search_text() {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": { "name": "searchResume", "arguments": { "query": "python" } }
        });
        let response = sample_app()
            .oneshot(post_mcp(request.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], 7);
        assert_eq!(body["result"]["isError"], Value::Null);
        let text = body["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("Found "));
        assert!(text.contains("🛠️ Technical Skill: Python"));
    }

    #[tokio::test]
    async fn mcp_unknown_tool_is_error_envelope_not_rpc_error() {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": { "name": "unknownTool", "arguments": {} }
        });
        let body = body_json(
            sample_app()
                .oneshot(post_mcp(request.to_string()))
                .await
                .unwrap(),
        )
        .await;
        assert!(body.get("error").is_none());
        assert_eq!(body["result"]["isError"], true);
        assert_eq!(body["result"]["structuredContent"]["error"], "unknown_tool");
    }

    #[tokio::test]
    async fn mcp_parse_error_is_jsonrpc_32700() {
        let response = sample_app().oneshot(post_mcp("{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], -32700);
        assert_eq!(body["id"], Value::Null);
    }

    #[tokio::test]
    async fn mcp_notification_only_is_accepted() {
        let notification = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" });
        let response = sample_app()
            .oneshot(post_mcp(notification.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn mcp_batch_returns_array() {
        let batch = json!([
            { "jsonrpc": "2.0", "id": 1, "method": "ping" },
            { "jsonrpc": "2.0", "method": "notifications/initialized" },
            { "jsonrpc": "2.0", "id": 2, "method": "tools/list" }
        ]);
        let body = body_json(
            sample_app()
                .oneshot(post_mcp(batch.to_string()))
                .await
                .unwrap(),
        )
        .await;
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["result"]["tools"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn mcp_get_is_method_not_allowed() {
        let response = sample_app().oneshot(get("/mcp")).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn landing_page_lists_tools_and_endpoint() {
        let response = sample_app().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("https://resume.example.com/mcp"));
        for tool in ["getResume", "getResumeSummary", "searchResume", "ping"] {
            assert!(html.contains(&format!("<code>{tool}</code>")), "missing {tool}");
        }
    }

    #[tokio::test]
    async fn openapi_document_lists_routes() {
        let response = sample_app()
            .oneshot(get("/api-doc/openapi.json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let doc = body_json(response).await;
        assert!(doc["paths"].get("/health").is_some());
        assert!(doc["paths"].get("/mcp").is_some());
        assert!(doc["components"]["schemas"].get("ProfileDocument").is_some());
    }
}
