//! In-memory topic store keyed by title.

use super::KnowledgeSource;
use crate::KnowledgeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// How much background a topic explanation assumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Intro,
    Intermediate,
}

impl Difficulty {
    /// Wire label (`"intro"` / `"intermediate"`).
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Intermediate => "intermediate",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "intro" => Some(Self::Intro),
            "intermediate" => Some(Self::Intermediate),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Short explanation and study tip for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRecord {
    /// Canonical title; primary key of the store.
    pub title: String,
    pub summary: String,
    pub difficulty: Difficulty,
    /// May be empty, in which case answers omit the tip line.
    #[serde(default)]
    pub study_tip: String,
}

impl TopicRecord {
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        difficulty: Difficulty,
        study_tip: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            difficulty,
            study_tip: study_tip.into(),
        }
    }
}

/// Immutable title -> record map. `BTreeMap` keeps titles sorted for `list_topics`.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeStore {
    topics: BTreeMap<String, TopicRecord>,
}

impl KnowledgeStore {
    /// The four built-in classroom topics.
    pub fn classroom() -> Self {
        Self::from_records([
            TopicRecord::new(
                "Photosynthesis",
                "Photosynthesis is the process plants use to convert sunlight, water, and carbon dioxide \
                 into glucose (their food) and oxygen.",
                Difficulty::Intro,
                "Remember the formula: sunlight + water + CO₂ -> glucose + O₂.",
            ),
            TopicRecord::new(
                "Pythagorean theorem",
                "In right triangles, the square of the hypotenuse equals the sum of the squares of the \
                 other two sides (a² + b² = c²).",
                Difficulty::Intro,
                "Draw a right triangle and square each side to visualize why the relationship works.",
            ),
            TopicRecord::new(
                "Newton's laws of motion",
                "Newton's three laws describe how forces affect motion: inertia, F = ma, and action/reaction.",
                Difficulty::Intermediate,
                "Link each law to a real-life example like pushing a shopping cart or wearing a seat belt.",
            ),
            TopicRecord::new(
                "Cellular respiration",
                "Cells break down glucose in the presence of oxygen to produce ATP, releasing carbon dioxide \
                 and water as byproducts.",
                Difficulty::Intermediate,
                "Compare it to photosynthesis—one stores energy, the other releases it.",
            ),
        ])
    }

    /// Builds a store from records; a later record with a duplicate title replaces the earlier one.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = TopicRecord>,
    {
        let topics = records
            .into_iter()
            .map(|r| (r.title.clone(), r))
            .collect();
        Self { topics }
    }

    /// Loads a catalog from a JSON array of records.
    pub fn load_json_path<P: AsRef<Path>>(path: P) -> Result<Self, KnowledgeError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let records: Vec<TopicRecord> = serde_json::from_str(&raw)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            count = records.len(),
            "Loaded topic catalog"
        );
        Ok(Self::from_records(records))
    }

    /// All topic titles, sorted ascending and duplicate-free.
    pub fn list_topics(&self) -> Vec<String> {
        self.topics.keys().cloned().collect()
    }

    /// Exact, case-sensitive lookup by title.
    pub fn get_topic(&self, name: &str) -> Result<&TopicRecord, KnowledgeError> {
        self.topics.get(name).ok_or_else(|| KnowledgeError::NotFound {
            topic: name.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

impl KnowledgeSource for KnowledgeStore {
    fn list_topics(&self) -> Vec<String> {
        KnowledgeStore::list_topics(self)
    }

    fn get_topic(&self, name: &str) -> Result<&TopicRecord, KnowledgeError> {
        KnowledgeStore::get_topic(self, name)
    }
}
