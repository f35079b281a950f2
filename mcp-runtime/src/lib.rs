use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Subcommand};
use resume_core::DocumentStore;
use serde_json::{Map, Value, json};
use tokio::io::{self, AsyncBufRead, AsyncWrite, BufReader};
use uuid::Uuid;

pub mod dispatch;
pub mod framing;
pub mod registry;
pub mod tools;
mod util;

pub use dispatch::Dispatcher;
pub use registry::{ToolError, ToolRegistry, ToolResult};
pub use util::{config_path, open_store};

use framing::{FrameError, Framing, read_message, write_message};

const MCP_PROTOCOL_VERSION: &str = "2024-11-05";
const MCP_SERVER_NAME: &str = "resume-mcp";
const MCP_INSTRUCTIONS: &str = "Resume tools: call getResumeSummary for a short overview, searchResume with a keyword to find matching experience, achievements, skills, or projects, and getResume for the complete document. ping checks connectivity.";

#[derive(Subcommand)]
pub enum McpCommands {
    /// Run the resume MCP server over stdio
    Serve,
    /// Invoke a single tool and print the result envelope
    Call(McpCallArgs),
    /// Print the registered tools and their input schemas
    Tools,
}

#[derive(Args, Clone, Debug)]
pub struct McpCallArgs {
    /// Tool name (e.g. getResumeSummary, searchResume)
    pub tool: String,
    /// Tool arguments as a JSON object
    #[arg(long, default_value = "{}")]
    pub args: String,
}

/// CLI entry point shared by the standalone binary. Returns the process exit code.
pub async fn run(document: Option<PathBuf>, command: McpCommands) -> i32 {
    let dispatcher = match build_dispatcher(open_store(document)) {
        Ok(dispatcher) => dispatcher,
        Err(err) => {
            print_error("mcp_startup_error", &err.to_string());
            return 1;
        }
    };

    match command {
        McpCommands::Serve => {
            let server = McpServer::new(dispatcher);
            let reader = BufReader::new(io::stdin());
            match server.serve(reader, io::stdout()).await {
                Ok(()) => 0,
                Err(err) => {
                    print_error("mcp_server_error", &err.to_string());
                    1
                }
            }
        }
        McpCommands::Call(args) => {
            let arguments = match serde_json::from_str::<Value>(&args.args) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    print_error("invalid_arguments", "--args must be a JSON object");
                    return 1;
                }
                Err(e) => {
                    print_error("invalid_arguments", &format!("--args is not valid JSON: {e}"));
                    return 1;
                }
            };
            let result = dispatcher.dispatch(&args.tool, &arguments);
            println!("{}", to_pretty_json(&result.to_value()));
            if result.is_error { 2 } else { 0 }
        }
        McpCommands::Tools => {
            println!("{}", to_pretty_json(&tools_list_payload(dispatcher.registry())));
            0
        }
    }
}

/// Dispatcher over the resume tool set and the given store.
pub fn build_dispatcher(
    store: Arc<dyn DocumentStore>,
) -> Result<Dispatcher, registry::RegistryError> {
    Ok(Dispatcher::new(tools::resume_registry()?, store))
}

/// Handle one HTTP-delivered JSON-RPC message (single or batch).
pub fn handle_http_jsonrpc(dispatcher: &Dispatcher, incoming: Value) -> Vec<Value> {
    McpServer::new(dispatcher.clone()).handle_incoming_message(incoming)
}

/// JSON-RPC method handling over a [`Dispatcher`]. Framing lives in [`framing`].
pub struct McpServer {
    dispatcher: Dispatcher,
    session_id: String,
}

impl McpServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            session_id: format!("session-{}", Uuid::now_v7()),
        }
    }

    /// Serve until EOF. Malformed JSON gets a parse error reply; broken framing ends the session.
    /// An oversized frame is answered with an invalid request error before the session ends.
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<(), FrameError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        tracing::info!(
            session_id = %self.session_id,
            server = MCP_SERVER_NAME,
            version = env!("CARGO_PKG_VERSION"),
            "MCP session started"
        );

        loop {
            let (incoming, framing) = match read_message(&mut reader).await {
                Ok(Some(message)) => message,
                Ok(None) => break,
                Err(FrameError::InvalidJson { framing, source }) => {
                    tracing::warn!(error = %source, "Discarding unparseable MCP message");
                    write_message(&mut writer, &parse_error_response(), framing).await?;
                    continue;
                }
                Err(err @ FrameError::MessageTooLarge { .. }) => {
                    tracing::error!(error = %err, "Refusing oversized MCP message");
                    let reply = error_response(Value::Null, RpcError::invalid_request(err.to_string()));
                    write_message(&mut writer, &reply, Framing::ContentLength).await?;
                    return Err(err);
                }
                Err(err) => return Err(err),
            };

            for response in self.handle_incoming_message(incoming) {
                write_message(&mut writer, &response, framing).await?;
            }
        }

        tracing::info!(session_id = %self.session_id, "MCP session ended");
        Ok(())
    }

    pub fn handle_incoming_message(&self, incoming: Value) -> Vec<Value> {
        let mut responses = Vec::new();

        if let Some(batch) = incoming.as_array() {
            if batch.is_empty() {
                responses.push(error_response(
                    Value::Null,
                    RpcError::invalid_request("Batch request must not be empty"),
                ));
                return responses;
            }
            for item in batch {
                if let Some(response) = self.handle_single_message(item) {
                    responses.push(response);
                }
            }
            return responses;
        }

        if let Some(response) = self.handle_single_message(&incoming) {
            responses.push(response);
        }
        responses
    }

    fn handle_single_message(&self, incoming: &Value) -> Option<Value> {
        let Some(obj) = incoming.as_object() else {
            return Some(error_response(
                Value::Null,
                RpcError::invalid_request("Request must be a JSON object"),
            ));
        };

        if obj.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
            let id = obj.get("id").cloned().unwrap_or(Value::Null);
            return Some(error_response(
                id,
                RpcError::invalid_request("jsonrpc must be '2.0'"),
            ));
        }

        let Some(method) = obj.get("method").and_then(Value::as_str) else {
            // Most likely a client response; server does not issue outbound requests.
            return None;
        };

        let params = obj.get("params").cloned().unwrap_or(Value::Null);
        match obj.get("id").cloned() {
            Some(id) => Some(match self.handle_request(method, params) {
                Ok(payload) => success_response(id, payload),
                Err(err) => error_response(id, err),
            }),
            None => {
                tracing::debug!(method, "MCP notification received");
                None
            }
        }
    }

    fn handle_request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        match method {
            "initialize" => Ok(self.initialize_payload()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(tools_list_payload(self.dispatcher.registry())),
            "tools/call" => self.handle_tools_call(params),
            "resources/list" => Ok(json!({ "resources": [] })),
            "prompts/list" => Ok(json!({ "prompts": [] })),
            _ => Err(RpcError::method_not_found(method)),
        }
    }

    fn initialize_payload(&self) -> Value {
        json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {
                "tools": {
                    "listChanged": false
                }
            },
            "serverInfo": {
                "name": MCP_SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            },
            "instructions": MCP_INSTRUCTIONS
        })
    }

    fn handle_tools_call(&self, params: Value) -> Result<Value, RpcError> {
        let params = params
            .as_object()
            .ok_or_else(|| RpcError::invalid_params("tools/call params must be an object"))?;

        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::invalid_params("tools/call requires string field 'name'"))?;

        let args = match params.get("arguments") {
            Some(Value::Object(map)) => map.clone(),
            Some(Value::Null) | None => Map::new(),
            Some(_) => {
                return Err(RpcError::invalid_params(
                    "tools/call 'arguments' must be an object",
                ));
            }
        };

        Ok(self.dispatcher.dispatch(name, &args).to_value())
    }
}

/// `tools/list` result for a registry.
pub fn tools_list_payload(registry: &ToolRegistry) -> Value {
    let tools: Vec<Value> = registry.tools().iter().map(|tool| tool.to_value()).collect();
    json!({ "tools": tools })
}

#[derive(Debug)]
struct RpcError {
    code: i64,
    message: String,
}

impl RpcError {
    fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            code: -32600,
            message: message.into(),
        }
    }

    fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {method}"),
        }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: -32602,
            message: message.into(),
        }
    }
}

fn success_response(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

fn error_response(id: Value, error: RpcError) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": error.code,
            "message": error.message
        }
    })
}

/// JSON-RPC parse error reply (id unknown, so null).
pub fn parse_error_response() -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": null,
        "error": {
            "code": -32700,
            "message": "Parse error"
        }
    })
}

fn print_error(code: &str, message: &str) {
    let payload = json!({
        "error": code,
        "message": message,
    });
    eprintln!("{}", to_pretty_json(&payload));
}

pub(crate) fn to_pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
