use axum::extract::State;
use axum::response::Html;
use axum::{Router, routing::get};

use super::mcp_http::MCP_PATH;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(landing_page))
}

async fn landing_page(State(state): State<AppState>) -> Html<String> {
    Html(render_landing(&state))
}

fn render_landing(state: &AppState) -> String {
    let endpoint = format!("{}{}", state.server_url, MCP_PATH);
    let tools: String = state
        .dispatcher
        .registry()
        .tools()
        .iter()
        .map(|tool| {
            format!(
                "      <li><code>{}</code> {}</li>\n",
                escape_html(tool.name),
                escape_html(tool.description)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <title>Resume MCP Server</title>
  </head>
  <body>
    <h1>Resume MCP Server</h1>
    <p>Connect an MCP client to <code>{endpoint}</code> (JSON-RPC over HTTP POST).</p>
    <h2>Tools</h2>
    <ul>
{tools}    </ul>
    <p><a href="/health">Health</a> · <a href="/api-doc/openapi.json">OpenAPI</a></p>
  </body>
</html>
"#,
        endpoint = escape_html(&endpoint),
        tools = tools,
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
