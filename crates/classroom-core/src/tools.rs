//! Tool protocol: named, schema-described request/response operations.

use crate::shared::RequestContext;
use crate::ToolError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Public description of a tool, as returned by `list_tools`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub title: String,
    pub description: String,
    pub input_schema: serde_json::Value,
    pub output_schema: serde_json::Value,
}

/// Result of a tool call: human-readable text blocks plus an optional structured payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    #[serde(default)]
    pub text: Vec<String>,
    #[serde(default)]
    pub structured: Option<serde_json::Value>,
}

impl ToolOutput {
    pub fn structured(value: serde_json::Value) -> Self {
        Self {
            text: Vec::new(),
            structured: Some(value),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text.push(text.into());
        self
    }

    /// Structured payload if it is a non-empty object; tool outputs are always objects.
    pub fn payload(&self) -> Option<&serde_json::Value> {
        self.structured
            .as_ref()
            .filter(|v| v.as_object().is_some_and(|m| !m.is_empty()))
    }
}

/// Trait implemented by every tool a server exposes.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name for routing.
    fn name(&self) -> &str;

    fn descriptor(&self) -> ToolDescriptor;

    /// Executes the tool with the given context and JSON arguments.
    async fn call(
        &self,
        ctx: &RequestContext,
        arguments: serde_json::Value,
    ) -> Result<ToolOutput, ToolError>;
}

/// Registry of tools that can be dispatched by name.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    /// Names of all registered tools, in registration order.
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }

    /// Routes a call to the named tool.
    pub async fn call(
        &self,
        ctx: &RequestContext,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<ToolOutput, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tracing::debug!(
            tool = name,
            client_id = ctx.resolved_client_id(),
            correlation_id = ctx.correlation_id.as_deref().unwrap_or(""),
            "Dispatching tool call"
        );
        tool.call(ctx, arguments).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
