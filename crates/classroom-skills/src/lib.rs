//! Classroom knowledge tools, the tool server builder, and the rule-based tutor.

pub use classroom_core::{Tool, ToolRegistry};

mod list_topics;
pub mod matcher;
mod server;
mod topic_summary;
mod tutor;

pub use list_topics::ListTopics;
pub use matcher::{match_topic, ALIASES};
pub use server::{create_demo_server, demo_registry, SERVER_INSTRUCTIONS, SERVER_NAME};
pub use topic_summary::GetTopicSummary;
pub use tutor::{format_answer, KnowledgeService, TutorAgent, APOLOGY_MESSAGE, FALLBACK_MESSAGE};
