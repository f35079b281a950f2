use std::collections::HashMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use resume_core::DocumentStore;
use resume_core::error::{ErrorKind, ErrorPayload};
use resume_core::store::StoreError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

const INTERNAL_FAULT_MESSAGE: &str = "An internal error occurred";

/// Failure of a single tool invocation, classified by [`ErrorKind`].
///
/// `detail` is only for logs; it never reaches the caller.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ToolError {
    kind: ErrorKind,
    message: String,
    field: Option<String>,
    docs_hint: Option<String>,
    detail: Option<String>,
}

impl ToolError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field: None,
            docs_hint: None,
            detail: None,
        }
    }

    pub fn unknown_tool(name: &str) -> Self {
        Self::new(ErrorKind::UnknownTool, format!("Unknown tool: {name}"))
            .with_field("name")
            .with_docs_hint("Call tools/list to see the registered tool names.")
    }

    pub fn invalid_arguments(field: &str, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArguments, reason).with_field(field)
    }

    pub fn document_unavailable() -> Self {
        Self::new(
            ErrorKind::DocumentUnavailable,
            "The profile document is currently unavailable",
        )
        .with_docs_hint("Retry the same call later.")
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        let mut err = Self::new(ErrorKind::InternalFault, INTERNAL_FAULT_MESSAGE);
        err.detail = Some(detail.into());
        err
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_docs_hint(mut self, docs_hint: impl Into<String>) -> Self {
        self.docs_hint = Some(docs_hint.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            error: self.kind.code().to_string(),
            message: self.message.clone(),
            field: self.field.clone(),
            docs_hint: self.docs_hint.clone(),
            retryable: self.kind.is_retryable(),
        }
    }
}

impl From<StoreError> for ToolError {
    fn from(err: StoreError) -> Self {
        let mut tool_err = ToolError::document_unavailable();
        tool_err.kind = err.kind();
        tool_err.detail = Some(err.to_string());
        tool_err
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub text: String,
}

/// Response envelope for `tools/call`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResult {
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
    pub content: Vec<ContentBlock>,
    #[serde(rename = "structuredContent", skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            is_error: false,
            content: vec![ContentBlock {
                kind: ContentKind::Text,
                text: text.into(),
            }],
            structured_content: None,
        }
    }

    pub fn error(err: &ToolError) -> Self {
        let payload = json!(err.to_payload());
        Self {
            is_error: true,
            content: vec![ContentBlock {
                kind: ContentKind::Text,
                text: crate::to_pretty_json(&payload),
            }],
            structured_content: Some(payload),
        }
    }

    /// Text of the first content block, or "" for an empty envelope.
    pub fn first_text(&self) -> &str {
        self.content
            .first()
            .map(|block| block.text.as_str())
            .unwrap_or_default()
    }

    pub fn to_value(&self) -> Value {
        json!(self)
    }
}

/// A required string argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub min_length: usize,
}

impl ParamSpec {
    pub fn string(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            min_length: 0,
        }
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = min;
        self
    }

    fn to_json_schema(&self) -> Value {
        json!({
            "type": "string",
            "description": self.description,
            "minLength": self.min_length
        })
    }

    fn check(&self, value: &Value) -> Result<(), ToolError> {
        let name = self.name;
        let Value::String(text) = value else {
            return Err(ToolError::invalid_arguments(
                name,
                format!("'{name}' must be a string"),
            ));
        };
        if text.chars().count() < self.min_length {
            return Err(ToolError::invalid_arguments(
                name,
                format!("'{name}' must be at least {} characters", self.min_length),
            ));
        }
        Ok(())
    }
}

/// Object schema for a tool's arguments. Unknown properties are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSchema {
    params: Vec<ParamSpec>,
}

impl InputSchema {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|param| (param.name.to_string(), param.to_json_schema()))
            .collect();
        let required: Vec<&str> = self.params.iter().map(|param| param.name).collect();

        let mut schema = json!({
            "type": "object",
            "properties": properties,
            "additionalProperties": false
        });
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }

    pub fn validate(&self, args: &Map<String, Value>) -> Result<ValidatedArgs, ToolError> {
        if let Some(extra) = args
            .keys()
            .find(|key| !self.params.iter().any(|param| param.name == key.as_str()))
        {
            return Err(ToolError::invalid_arguments(
                extra,
                format!("Unexpected argument '{extra}'"),
            ));
        }

        for param in &self.params {
            match args.get(param.name) {
                None | Some(Value::Null) => {
                    return Err(ToolError::invalid_arguments(
                        param.name,
                        format!("Missing required field '{}'", param.name),
                    ));
                }
                Some(value) => param.check(value)?,
            }
        }

        Ok(ValidatedArgs {
            values: args.clone(),
        })
    }
}

/// Arguments that passed [`InputSchema::validate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedArgs {
    values: Map<String, Value>,
}

impl ValidatedArgs {
    /// Decode into the tool's typed argument struct.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ToolError> {
        serde_json::from_value(Value::Object(self.values.clone()))
            .map_err(|e| ToolError::internal(format!("validated arguments failed to decode: {e}")))
    }
}

pub type ToolHandler = fn(&dyn DocumentStore, &ValidatedArgs) -> Result<String, ToolError>;

pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: InputSchema,
    pub handler: ToolHandler,
}

impl fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("input_schema", &self.input_schema)
            .finish_non_exhaustive()
    }
}

impl ToolDefinition {
    pub fn to_value(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema.to_json_schema(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("tool '{0}' is already registered")]
    DuplicateTool(&'static str),
}

/// Name-keyed tool table. Populated at startup, read-only afterwards.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
    by_name: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: ToolDefinition) -> Result<(), RegistryError> {
        if self.by_name.contains_key(tool.name) {
            return Err(RegistryError::DuplicateTool(tool.name));
        }
        self.by_name.insert(tool.name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<&ToolDefinition, ToolError> {
        self.by_name
            .get(name)
            .map(|&idx| &self.tools[idx])
            .ok_or_else(|| ToolError::unknown_tool(name))
    }

    /// Registered tools in registration order.
    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Resolve, validate, run, and wrap. Handler panics become `InternalFault`.
    pub fn invoke(
        &self,
        store: &dyn DocumentStore,
        name: &str,
        args: &Map<String, Value>,
    ) -> Result<ToolResult, ToolError> {
        let tool = self.resolve(name)?;
        let validated = tool.input_schema.validate(args)?;
        let outcome = catch_unwind(AssertUnwindSafe(|| (tool.handler)(store, &validated)))
            .map_err(|panic| ToolError::internal(panic_message(panic.as_ref())))?;
        outcome.map(ToolResult::text)
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .map(|msg| format!("handler panicked: {msg}"))
        .unwrap_or_else(|| "handler panicked".to_string())
}
