//! Immutable classroom knowledge base.
//!
//! ## Built-in catalog
//!
//! | Title                   | Difficulty   |
//! |-------------------------|--------------|
//! | Cellular respiration    | intermediate |
//! | Newton's laws of motion | intermediate |
//! | Photosynthesis          | intro        |
//! | Pythagorean theorem     | intro        |
//!
//! The store is built once at startup and never mutated afterwards; callers
//! share it behind an `Arc`.

mod store;

pub use store::{Difficulty, KnowledgeStore, TopicRecord};

/// Read-only lookup surface shared by the store and anything wrapping it.
pub trait KnowledgeSource: Send + Sync {
    /// All topic titles, sorted ascending.
    fn list_topics(&self) -> Vec<String>;

    /// Exact, case-sensitive title lookup.
    fn get_topic(&self, name: &str) -> Result<&TopicRecord, crate::KnowledgeError>;
}
