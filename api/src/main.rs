use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod middleware;
mod routes;
mod state;

#[tokio::main]
async fn main() {
    // Load .env if present (dev only)
    let _ = dotenvy::dotenv();

    // Structured JSON logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "resume_api=info,resume_mcp_runtime=info,resume_core=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = state::AppConfig::from_env();
    let store = resume_mcp_runtime::open_store(config.document_path.clone());
    let dispatcher =
        resume_mcp_runtime::build_dispatcher(store).expect("Tool registry must be consistent");

    let app_state = state::AppState {
        dispatcher,
        server_url: config.public_url(),
    };

    let app = routes::app(app_state, middleware::cors::build_cors_layer());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Resume MCP API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
