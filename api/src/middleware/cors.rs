use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

const MAX_AGE: Duration = Duration::from_secs(86_400);

/// Build a CORS layer from the `RESUME_CORS_ORIGINS` env var.
///
/// - Origins: comma-separated allow-list (default: any origin)
/// - Methods: GET, POST, OPTIONS
/// - Headers: Content-Type, Authorization, mcp-protocol-version
/// - Max age: 86400s
pub fn build_cors_layer() -> CorsLayer {
    cors_layer_for(std::env::var("RESUME_CORS_ORIGINS").ok().as_deref())
}

fn cors_layer_for(origins: Option<&str>) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("authorization"),
            HeaderName::from_static("mcp-protocol-version"),
        ])
        .max_age(MAX_AGE)
}
