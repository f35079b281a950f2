use std::sync::Arc;
use std::time::Instant;

use resume_core::DocumentStore;
use resume_core::error::ErrorKind;
use serde_json::{Map, Value};

use crate::registry::{ToolRegistry, ToolResult};

/// The single entry point transports use to run a tool.
///
/// Stateless apart from shared read-only handles, so clones can serve concurrent
/// requests without locking.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    store: Arc<dyn DocumentStore>,
}

impl Dispatcher {
    pub fn new(registry: ToolRegistry, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            registry: Arc::new(registry),
            store,
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Run `tool_name`. Every failure comes back as an error-shaped [`ToolResult`].
    pub fn dispatch(&self, tool_name: &str, arguments: &Map<String, Value>) -> ToolResult {
        let started = Instant::now();
        match self
            .registry
            .invoke(self.store.as_ref(), tool_name, arguments)
        {
            Ok(result) => {
                tracing::info!(
                    event = "tool_call",
                    tool = %tool_name,
                    elapsed_us = started.elapsed().as_micros() as u64,
                    "Tool call completed"
                );
                result
            }
            Err(err) => {
                match err.kind() {
                    ErrorKind::InternalFault | ErrorKind::DocumentUnavailable => {
                        tracing::error!(
                            event = "tool_error",
                            tool = %tool_name,
                            code = err.kind().code(),
                            detail = err.detail().unwrap_or_default(),
                            "Tool call failed"
                        );
                    }
                    ErrorKind::UnknownTool | ErrorKind::InvalidArguments => {
                        tracing::warn!(
                            event = "tool_error",
                            tool = %tool_name,
                            code = err.kind().code(),
                            field = err.field().unwrap_or_default(),
                            message = %err,
                            "Tool call rejected"
                        );
                    }
                }
                ToolResult::error(&err)
            }
        }
    }
}
