use resume_core::DocumentStore;
use resume_core::query;
use serde::Deserialize;

use crate::registry::{
    InputSchema, ParamSpec, RegistryError, ToolDefinition, ToolError, ToolRegistry, ValidatedArgs,
};

pub const GET_RESUME: &str = "getResume";
pub const GET_RESUME_SUMMARY: &str = "getResumeSummary";
pub const SEARCH_RESUME: &str = "searchResume";
pub const PING: &str = "ping";

pub const PONG_TEXT: &str = "🏓 Pong! Resume MCP server is working correctly.";

#[derive(Debug, Deserialize)]
struct SearchResumeArgs {
    query: String,
}

pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: GET_RESUME,
            description: "Get complete resume data in JSON format",
            input_schema: InputSchema::empty(),
            handler: tool_get_resume,
        },
        ToolDefinition {
            name: GET_RESUME_SUMMARY,
            description: "Get a formatted summary of the resume",
            input_schema: InputSchema::empty(),
            handler: tool_get_resume_summary,
        },
        ToolDefinition {
            name: SEARCH_RESUME,
            description: "Search through resume content by keyword",
            input_schema: InputSchema::empty().with_param(
                ParamSpec::string("query", "Search query to find in resume").min_length(0),
            ),
            handler: tool_search_resume,
        },
        ToolDefinition {
            name: PING,
            description: "Test connectivity and server status",
            input_schema: InputSchema::empty(),
            handler: tool_ping,
        },
    ]
}

/// Registry holding the four resume tools.
pub fn resume_registry() -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();
    for tool in tool_definitions() {
        registry.register(tool)?;
    }
    Ok(registry)
}

fn tool_get_resume(store: &dyn DocumentStore, _args: &ValidatedArgs) -> Result<String, ToolError> {
    let doc = store.load()?;
    query::render_full(&doc)
        .map_err(|e| ToolError::internal(format!("failed to serialize resume: {e}")))
}

fn tool_get_resume_summary(
    store: &dyn DocumentStore,
    _args: &ValidatedArgs,
) -> Result<String, ToolError> {
    let doc = store.load()?;
    Ok(query::summarize(&doc))
}

fn tool_search_resume(
    store: &dyn DocumentStore,
    args: &ValidatedArgs,
) -> Result<String, ToolError> {
    let SearchResumeArgs { query } = args.decode()?;
    let doc = store.load()?;
    Ok(query::search(&doc, &query))
}

fn tool_ping(_store: &dyn DocumentStore, _args: &ValidatedArgs) -> Result<String, ToolError> {
    Ok(PONG_TEXT.to_string())
}
