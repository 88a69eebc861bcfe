//! In-process tool server and client session over tokio channels.
//!
//! The server owns a [`ToolRegistry`] and answers requests one at a time;
//! sessions are cheap clones of the request sender. Each request carries a
//! `oneshot` reply channel, so no socket is involved.

use crate::shared::RequestContext;
use crate::tools::{ToolDescriptor, ToolOutput, ToolRegistry};
use crate::ToolError;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use uuid::Uuid;

const TARGET: &str = "classroom::transport";

enum ToolRequest {
    ListTools {
        reply: oneshot::Sender<Vec<ToolDescriptor>>,
    },
    CallTool {
        id: Uuid,
        ctx: RequestContext,
        name: String,
        arguments: serde_json::Value,
        reply: oneshot::Sender<Result<ToolOutput, ToolError>>,
    },
}

/// Spawns the serving task for a registry.
pub struct ToolServer;

impl ToolServer {
    /// Starts serving `registry` on a background task. The task ends once every
    /// [`ToolSession`] clone has been dropped.
    pub fn spawn(registry: Arc<ToolRegistry>, capacity: usize) -> (ToolSession, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let handle = tokio::spawn(serve(registry, rx));
        (ToolSession { tx }, handle)
    }
}

async fn serve(registry: Arc<ToolRegistry>, mut rx: mpsc::Receiver<ToolRequest>) {
    tracing::debug!(target: TARGET, tools = ?registry.tool_names(), "Tool server started");
    while let Some(req) = rx.recv().await {
        match req {
            ToolRequest::ListTools { reply } => {
                let _ = reply.send(registry.descriptors());
            }
            ToolRequest::CallTool {
                id,
                ctx,
                name,
                arguments,
                reply,
            } => {
                let result = registry.call(&ctx, &name, arguments).await;
                if let Err(e) = &result {
                    tracing::warn!(target: TARGET, request_id = %id, tool = %name, error = %e, "Tool call failed");
                }
                if reply.send(result).is_err() {
                    tracing::debug!(target: TARGET, request_id = %id, "Caller went away before reply");
                }
            }
        }
    }
    tracing::debug!(target: TARGET, "Tool server stopped");
}

/// Client handle to a running [`ToolServer`].
#[derive(Clone)]
pub struct ToolSession {
    tx: mpsc::Sender<ToolRequest>,
}

impl ToolSession {
    /// Descriptors of every tool the server exposes.
    pub async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ToolError> {
        let (reply, rx) = oneshot::channel();
        self.send(ToolRequest::ListTools { reply }).await?;
        rx.await.map_err(|_| closed())
    }

    /// Calls a tool by name and waits for its response.
    pub async fn call_tool(
        &self,
        ctx: &RequestContext,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<ToolOutput, ToolError> {
        let id = Uuid::new_v4();
        tracing::debug!(target: TARGET, request_id = %id, tool = name, "Sending tool call");
        let (reply, rx) = oneshot::channel();
        self.send(ToolRequest::CallTool {
            id,
            ctx: ctx.clone(),
            name: name.to_string(),
            arguments,
            reply,
        })
        .await?;
        rx.await.map_err(|_| closed())?
    }

    async fn send(&self, req: ToolRequest) -> Result<(), ToolError> {
        self.tx.send(req).await.map_err(|_| closed())
    }
}

fn closed() -> ToolError {
    ToolError::Transport("tool server is not running".to_string())
}
