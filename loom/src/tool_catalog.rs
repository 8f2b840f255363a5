//! `ToolCatalog` (§3): the name-indexed union of local-tool handlers and
//! remote MCP methods available to one agent. Built once per agent instance
//! and immutable thereafter.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mcp_protocol::FunctionSchema;
use mcp_client::McpHandle;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("application error: {0}")]
    Application(String),
    #[error("remote mcp call failed: {0}")]
    Remote(#[from] mcp_client::ClientError),
}

/// A tool implemented in-process, as opposed to one dispatched to a remote MCP.
#[async_trait]
pub trait LocalTool: Send + Sync {
    fn name(&self) -> &str;
    fn schema(&self) -> FunctionSchema;
    async fn call(&self, args: Value) -> Result<String, ToolError>;
}

/// Where a catalog entry's call actually goes.
pub enum DispatchTarget {
    Local(Arc<dyn LocalTool>),
    Remote {
        handle: Arc<McpHandle>,
        method: String,
    },
}

struct ToolEntry {
    schema: FunctionSchema,
    target: DispatchTarget,
}

/// Immutable once built. Collisions on registration keep the first entry and
/// reject the later one with a diagnostic (§3).
#[derive(Default)]
pub struct ToolCatalog {
    entries: HashMap<String, ToolEntry>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_local(&mut self, tool: Arc<dyn LocalTool>) {
        let name = tool.name().to_string();
        if self.entries.contains_key(&name) {
            tracing::warn!(tool = %name, "duplicate tool registration rejected, keeping first");
            return;
        }
        let schema = tool.schema();
        self.entries.insert(
            name,
            ToolEntry {
                schema,
                target: DispatchTarget::Local(tool),
            },
        );
    }

    pub fn register_remote(&mut self, schema: FunctionSchema, handle: Arc<McpHandle>, method: impl Into<String>) {
        let name = schema.name.clone();
        if self.entries.contains_key(&name) {
            tracing::warn!(tool = %name, "duplicate tool registration rejected, keeping first");
            return;
        }
        self.entries.insert(
            name,
            ToolEntry {
                schema,
                target: DispatchTarget::Remote {
                    handle,
                    method: method.into(),
                },
            },
        );
    }

    pub fn schemas(&self) -> Vec<FunctionSchema> {
        self.entries.values().map(|e| e.schema.clone()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// `true` only for names dispatched to a [`LocalTool`] — the GUI-command
    /// short-circuit (§4.4e) applies to local-tool results alone.
    pub fn is_local(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(ToolEntry { target: DispatchTarget::Local(_), .. }))
    }

    /// Invokes the named tool, returning its result as a string (§4.4d): a
    /// local handler's return value is already a string; a remote MCP's
    /// result object is serialized back to JSON text.
    pub async fn call(&self, name: &str, args: Value) -> Result<String, ToolError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| ToolError::Application("tool not available to this agent".to_string()))?;
        match &entry.target {
            DispatchTarget::Local(tool) => tool.call(args).await,
            DispatchTarget::Remote { handle, method } => {
                let result = handle.call(method, args).await?;
                Ok(serde_json::to_string(&result).unwrap_or_default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl LocalTool for Echo {
        fn name(&self) -> &str {
            "echo"
        }
        fn schema(&self) -> FunctionSchema {
            FunctionSchema {
                name: "echo".into(),
                description: None,
                parameters: serde_json::json!({"type": "object"}),
            }
        }
        async fn call(&self, args: Value) -> Result<String, ToolError> {
            Ok(args.to_string())
        }
    }

    #[tokio::test]
    async fn unknown_tool_name_is_application_error() {
        let catalog = ToolCatalog::new();
        let err = catalog.call("nope", Value::Null).await.unwrap_err();
        assert!(matches!(err, ToolError::Application(_)));
    }

    #[tokio::test]
    async fn duplicate_registration_keeps_first() {
        let mut catalog = ToolCatalog::new();
        catalog.register_local(Arc::new(Echo));
        catalog.register_local(Arc::new(Echo));
        assert_eq!(catalog.schemas().len(), 1);
    }

    #[tokio::test]
    async fn local_tool_dispatch_returns_its_string_result() {
        let mut catalog = ToolCatalog::new();
        catalog.register_local(Arc::new(Echo));
        let out = catalog.call("echo", serde_json::json!({"a":1})).await.unwrap();
        assert_eq!(out, "{\"a\":1}");
    }
}
