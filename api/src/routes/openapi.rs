use axum::{Json, Router, routing::get};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Resume MCP API",
        description = "MCP server exposing a single profile document to AI agents."
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::mcp_http::mcp_post,
    ),
    components(schemas(
        crate::routes::health::HealthResponse,
        resume_core::error::ErrorPayload,
        resume_core::ProfileDocument,
        resume_core::PersonalInfo,
        resume_core::ExperienceEntry,
        resume_core::EducationEntry,
        resume_core::Skills,
        resume_core::ProjectEntry,
    ))
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api-doc/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}
