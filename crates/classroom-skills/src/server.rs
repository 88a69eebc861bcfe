//! Wires the knowledge tools into a registry and starts the classroom tool server.

use crate::{GetTopicSummary, ListTopics};
use classroom_core::{KnowledgeStore, ToolRegistry, ToolServer, ToolSession};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Server name reported by the gateway and the demo.
pub const SERVER_NAME: &str = "Classroom Tutor";

pub const SERVER_INSTRUCTIONS: &str = "You are connected to a classroom tutor service. Use the available tools to \
     explore topics and retrieve helpful study tips for students.";

/// Registry exposing `list_topics` and `get_topic_summary` over `store`.
pub fn demo_registry(store: Arc<KnowledgeStore>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(ListTopics::new(store.clone())));
    registry.register(Arc::new(GetTopicSummary::new(store)));
    registry
}

/// Spawns a tool server for the classroom tools and returns a connected session.
pub fn create_demo_server(
    store: Arc<KnowledgeStore>,
    capacity: usize,
) -> (ToolSession, JoinHandle<()>) {
    ToolServer::spawn(Arc::new(demo_registry(store)), capacity)
}
