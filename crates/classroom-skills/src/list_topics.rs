//! `list_topics` tool: returns every topic title the tutor knows about.

use classroom_core::{KnowledgeSource, RequestContext, Tool, ToolDescriptor, ToolError, ToolOutput};
use std::sync::Arc;

pub const TOOL_NAME: &str = "list_topics";

pub struct ListTopics {
    knowledge: Arc<dyn KnowledgeSource>,
}

impl ListTopics {
    pub fn new(knowledge: Arc<dyn KnowledgeSource>) -> Self {
        Self { knowledge }
    }
}

#[async_trait::async_trait]
impl Tool for ListTopics {
    fn name(&self) -> &str {
        TOOL_NAME
    }

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: TOOL_NAME.to_string(),
            title: "List classroom topics".to_string(),
            description: "Return the list of study topics the tutor knows about.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
            output_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "topics": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Names of available topics."
                    }
                },
                "required": ["topics"],
                "additionalProperties": false
            }),
        }
    }

    async fn call(
        &self,
        _ctx: &RequestContext,
        _arguments: serde_json::Value,
    ) -> Result<ToolOutput, ToolError> {
        let topics = self.knowledge.list_topics();
        Ok(ToolOutput::structured(serde_json::json!({ "topics": topics })))
    }
}
