//! classroom-core: shared types, the topic knowledge store, the tool protocol
//! and an in-memory transport connecting tool clients to a tool server.

mod error;
mod knowledge;
mod shared;
mod tools;
mod transport;

pub use error::{KnowledgeError, ToolError};
pub use knowledge::{Difficulty, KnowledgeSource, KnowledgeStore, TopicRecord};
pub use shared::{CoreConfig, RequestContext, DEFAULT_CLIENT_ID};
pub use tools::{Tool, ToolDescriptor, ToolOutput, ToolRegistry};
pub use transport::{ToolServer, ToolSession};
