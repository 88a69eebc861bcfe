//! `get_topic_summary` tool: explanation, difficulty and study tip for one topic.

use classroom_core::{KnowledgeSource, RequestContext, Tool, ToolDescriptor, ToolError, ToolOutput};
use std::sync::Arc;

pub const TOOL_NAME: &str = "get_topic_summary";

pub struct GetTopicSummary {
    knowledge: Arc<dyn KnowledgeSource>,
}

impl GetTopicSummary {
    pub fn new(knowledge: Arc<dyn KnowledgeSource>) -> Self {
        Self { knowledge }
    }
}

#[async_trait::async_trait]
impl Tool for GetTopicSummary {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: TOOL_NAME.to_string(),
            title: "Explain a topic".to_string(),
            description: "Look up a short explanation and study tip for a topic.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "topic": {
                        "type": "string",
                        "description": "Topic name as returned by list_topics."
                    }
                },
                "required": ["topic"],
                "additionalProperties": false
            }),
            output_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "topic": { "type": "string" },
                    "summary": { "type": "string" },
                    "difficulty": { "type": "string", "enum": ["intro", "intermediate"] },
                    "study_tip": { "type": "string" }
                },
                "required": ["topic", "summary", "difficulty", "study_tip"],
                "additionalProperties": false
            }),
        }
    }

    async fn call(
        &self,
        _ctx: &RequestContext,
        arguments: serde_json::Value,
    ) -> Result<ToolOutput, ToolError> {
        let name = arguments
            .get("topic")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidArguments {
                tool: TOOL_NAME.to_string(),
                reason: "expected { topic: string }".to_string(),
            })?;
        let topic = self.knowledge.get_topic(name)?;

        let text = format!(
            "Topic: {}\nSummary: {}\nStudy tip: {}",
            topic.title, topic.summary, topic.study_tip
        );
        Ok(ToolOutput::structured(serde_json::json!({
            "topic": topic.title,
            "summary": topic.summary,
            "difficulty": topic.difficulty,
            "study_tip": topic.study_tip
        }))
        .with_text(text))
    }
}
