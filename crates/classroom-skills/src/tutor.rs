//! Rule-based tutor: resolves a question to a topic and explains it using the
//! knowledge tools.

use crate::matcher::match_topic;
use crate::{list_topics, topic_summary};
use classroom_core::{Difficulty, RequestContext, ToolError, ToolSession, TopicRecord};
use std::sync::Arc;
use tokio::sync::OnceCell;

const TARGET: &str = "classroom::tutor";

/// Reply when a question matches no known topic.
pub const FALLBACK_MESSAGE: &str = "I can help with introductory science and math topics like photosynthesis or the \
     Pythagorean theorem. Try asking about one of those!";

/// Reply when the topic lookup returned nothing usable.
pub const APOLOGY_MESSAGE: &str = "Something went wrong—please try again.";

/// Where the tutor gets its knowledge from.
#[async_trait::async_trait]
pub trait KnowledgeService: Send + Sync {
    /// All known topic titles.
    async fn list_topics(&self) -> Result<Vec<String>, ToolError>;

    /// Record for `name`; `Ok(None)` when the call produced no structured payload.
    async fn fetch_topic(&self, name: &str) -> Result<Option<TopicRecord>, ToolError>;
}

#[async_trait::async_trait]
impl KnowledgeService for ToolSession {
    async fn list_topics(&self) -> Result<Vec<String>, ToolError> {
        let out = self
            .call_tool(&tutor_context(), list_topics::TOOL_NAME, serde_json::json!({}))
            .await?;
        let topics = out
            .payload()
            .and_then(|p| p.get("topics"))
            .and_then(|v| v.as_array())
            .map(|items| {
                items
                    .iter()
                    .map(|t| match t {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(topics)
    }

    async fn fetch_topic(&self, name: &str) -> Result<Option<TopicRecord>, ToolError> {
        let out = self
            .call_tool(
                &tutor_context(),
                topic_summary::TOOL_NAME,
                serde_json::json!({ "topic": name }),
            )
            .await?;
        Ok(out.payload().map(|p| record_from_payload(name, p)))
    }
}

#[async_trait::async_trait]
impl<T: KnowledgeService + ?Sized> KnowledgeService for Arc<T> {
    async fn list_topics(&self) -> Result<Vec<String>, ToolError> {
        (**self).list_topics().await
    }

    async fn fetch_topic(&self, name: &str) -> Result<Option<TopicRecord>, ToolError> {
        (**self).fetch_topic(name).await
    }
}

fn tutor_context() -> RequestContext {
    RequestContext::new("tutor-agent")
}

/// Lenient decode of a `get_topic_summary` payload: missing fields become
/// empty strings and an unrecognised difficulty falls back to intro. The
/// record is titled with the requested name, which is also what the answer
/// header shows; the payload's own `topic` field is not consulted.
fn record_from_payload(requested: &str, payload: &serde_json::Value) -> TopicRecord {
    let field = |key: &str| {
        payload
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };
    let difficulty = payload
        .get("difficulty")
        .and_then(|v| v.as_str())
        .and_then(Difficulty::parse)
        .unwrap_or(Difficulty::Intro);
    TopicRecord {
        title: requested.to_string(),
        summary: field("summary"),
        difficulty,
        study_tip: field("study_tip"),
    }
}

/// Tiny rule-based agent that relies on a [`KnowledgeService`] for content.
pub struct TutorAgent<S> {
    service: S,
    topics: OnceCell<Vec<String>>,
}

impl<S: KnowledgeService> TutorAgent<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            topics: OnceCell::new(),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Known topics, fetched once per agent. A failed listing is cached as empty.
    pub async fn topics(&self) -> &[String] {
        self.topics
            .get_or_init(|| async move {
                match self.service.list_topics().await {
                    Ok(topics) => {
                        tracing::debug!(target: TARGET, count = topics.len(), "Loaded topic list");
                        topics
                    }
                    Err(e) => {
                        tracing::warn!(target: TARGET, error = %e, "Topic listing failed; continuing with none");
                        Vec::new()
                    }
                }
            })
            .await
    }

    /// Classroom-friendly answer for `question`.
    ///
    /// Unmatched questions and unusable tool responses become fixed messages;
    /// a topic that the store does not know is returned as an error.
    pub async fn answer(&self, question: &str) -> Result<String, ToolError> {
        let topics = self.topics().await;
        let Some(topic) = match_topic(question, topics) else {
            tracing::info!(target: TARGET, "No topic matched question");
            return Ok(FALLBACK_MESSAGE.to_string());
        };
        tracing::info!(target: TARGET, topic = %topic, "Matched question to topic");

        let record = match self.service.fetch_topic(&topic).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::warn!(target: TARGET, topic = %topic, "Topic lookup returned no payload");
                return Ok(APOLOGY_MESSAGE.to_string());
            }
            Err(e) if e.is_not_found() => return Err(e),
            Err(e) => {
                tracing::warn!(target: TARGET, topic = %topic, error = %e, "Topic lookup failed");
                return Ok(APOLOGY_MESSAGE.to_string());
            }
        };

        Ok(format_answer(&topic, &record))
    }
}

impl TutorAgent<ToolSession> {
    /// Names of the tools exposed by the connected server.
    pub async fn list_tool_names(&self) -> Result<Vec<String>, ToolError> {
        let tools = self.service.list_tools().await?;
        Ok(tools.into_iter().map(|t| t.name).collect())
    }
}

/// Header, summary, and (when present) the study tip, one per line.
pub fn format_answer(topic: &str, record: &TopicRecord) -> String {
    let mut lines = vec![
        format!("Here's a {} explanation of {}:", record.difficulty, topic),
        record.summary.clone(),
    ];
    if !record.study_tip.is_empty() {
        lines.push(format!("Study tip: {}", record.study_tip));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_demo_server;
    use classroom_core::{KnowledgeError, KnowledgeStore};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory service with call counting and switchable failure modes.
    struct FakeService {
        store: KnowledgeStore,
        list_calls: AtomicUsize,
        empty_payload: bool,
        transport_down: bool,
    }

    impl FakeService {
        fn new(store: KnowledgeStore) -> Self {
            Self {
                store,
                list_calls: AtomicUsize::new(0),
                empty_payload: false,
                transport_down: false,
            }
        }
    }

    #[async_trait::async_trait]
    impl KnowledgeService for FakeService {
        async fn list_topics(&self) -> Result<Vec<String>, ToolError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.store.list_topics())
        }

        async fn fetch_topic(&self, name: &str) -> Result<Option<TopicRecord>, ToolError> {
            if self.transport_down {
                return Err(ToolError::Transport("down".into()));
            }
            if self.empty_payload {
                return Ok(None);
            }
            Ok(Some(self.store.get_topic(name)?.clone()))
        }
    }

    /// Lists a topic the store cannot serve.
    struct DanglingService;

    #[async_trait::async_trait]
    impl KnowledgeService for DanglingService {
        async fn list_topics(&self) -> Result<Vec<String>, ToolError> {
            Ok(vec!["Photosynthesis".into()])
        }

        async fn fetch_topic(&self, name: &str) -> Result<Option<TopicRecord>, ToolError> {
            Err(KnowledgeError::NotFound { topic: name.to_string() }.into())
        }
    }

    /// Listing takes long enough for concurrent first callers to overlap.
    struct SlowListing {
        inner: FakeService,
    }

    #[async_trait::async_trait]
    impl KnowledgeService for SlowListing {
        async fn list_topics(&self) -> Result<Vec<String>, ToolError> {
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.inner.list_topics().await
        }

        async fn fetch_topic(&self, name: &str) -> Result<Option<TopicRecord>, ToolError> {
            self.inner.fetch_topic(name).await
        }
    }

    #[tokio::test]
    async fn answers_known_topic_with_three_lines() {
        let agent = TutorAgent::new(FakeService::new(KnowledgeStore::classroom()));
        let answer = agent.answer("Can you explain the Pythagorean theorem?").await.unwrap();
        let lines: Vec<&str> = answer.split('\n').collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Here's a intro explanation of Pythagorean theorem:");
        assert!(lines[1].contains("hypotenuse"));
        assert!(lines[2].starts_with("Study tip: "));
    }

    #[tokio::test]
    async fn empty_study_tip_gives_two_lines() {
        let store = KnowledgeStore::from_records([TopicRecord::new(
            "Photosynthesis",
            "Plants make food.",
            Difficulty::Intermediate,
            "",
        )]);
        let agent = TutorAgent::new(FakeService::new(store));
        let answer = agent.answer("what is photosynthesis").await.unwrap();
        assert_eq!(
            answer,
            "Here's a intermediate explanation of Photosynthesis:\nPlants make food."
        );
    }

    #[tokio::test]
    async fn unmatched_question_gets_fallback() {
        let agent = TutorAgent::new(FakeService::new(KnowledgeStore::classroom()));
        let answer = agent.answer("Tell me about quantum mechanics.").await.unwrap();
        assert_eq!(answer, FALLBACK_MESSAGE);
        assert!(answer.contains("introductory science and math"));
    }

    #[tokio::test]
    async fn empty_payload_gets_apology() {
        let mut service = FakeService::new(KnowledgeStore::classroom());
        service.empty_payload = true;
        let agent = TutorAgent::new(service);
        assert_eq!(agent.answer("photosynthesis?").await.unwrap(), APOLOGY_MESSAGE);
    }

    #[tokio::test]
    async fn transport_failure_gets_apology() {
        let mut service = FakeService::new(KnowledgeStore::classroom());
        service.transport_down = true;
        let agent = TutorAgent::new(service);
        assert_eq!(agent.answer("newton").await.unwrap(), APOLOGY_MESSAGE);
    }

    #[tokio::test]
    async fn not_found_propagates() {
        let agent = TutorAgent::new(DanglingService);
        let err = agent.answer("photosynthesis").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn topic_list_is_fetched_once_and_answers_are_stable() {
        let agent = TutorAgent::new(FakeService::new(KnowledgeStore::classroom()));
        let first = agent.answer("What do Newton's laws of motion say?").await.unwrap();
        let second = agent.answer("What do Newton's laws of motion say?").await.unwrap();
        assert_eq!(first, second);
        agent.answer("something unrelated").await.unwrap();
        assert_eq!(agent.service().list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_callers_share_one_listing() {
        let agent = Arc::new(TutorAgent::new(SlowListing {
            inner: FakeService::new(KnowledgeStore::classroom()),
        }));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let agent = Arc::clone(&agent);
                tokio::spawn(async move { agent.answer("newton").await.unwrap() })
            })
            .collect();
        let mut answers = Vec::new();
        for handle in handles {
            answers.push(handle.await.unwrap());
        }
        assert_eq!(agent.service().inner.list_calls.load(Ordering::SeqCst), 1);
        assert!(answers[0].starts_with("Here's a intermediate explanation of Newton's laws of motion:"));
        assert!(answers.iter().all(|a| a == &answers[0]));
    }

    #[tokio::test]
    async fn shared_service_handle_works_as_a_service() {
        let service: Arc<dyn KnowledgeService> = Arc::new(DanglingService);
        let agent = TutorAgent::new(service);
        assert_eq!(agent.topics().await.to_vec(), vec!["Photosynthesis".to_string()]);
        assert!(agent.answer("photosynthesis").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn separate_agents_keep_separate_caches() {
        let a = TutorAgent::new(FakeService::new(KnowledgeStore::classroom()));
        let b = TutorAgent::new(FakeService::new(KnowledgeStore::from_records([])));
        assert_eq!(a.topics().await.len(), 4);
        assert!(b.topics().await.is_empty());
        assert_eq!(b.answer("photosynthesis").await.unwrap(), FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn end_to_end_over_tool_session() {
        let (session, _server) = create_demo_server(Arc::new(KnowledgeStore::classroom()), 8);
        let agent = TutorAgent::new(session);

        let tools = agent.list_tool_names().await.unwrap();
        assert!(tools.contains(&"list_topics".to_string()));
        assert!(tools.contains(&"get_topic_summary".to_string()));

        let answer = agent.answer("Can you explain the Pythagorean theorem?").await.unwrap();
        assert!(answer.contains("Pythagorean"));
        assert!(answer.contains("Study tip"));

        let answer = agent.answer("Tell me about quantum mechanics.").await.unwrap();
        assert!(answer.contains("introductory science and math"));
    }

    #[tokio::test]
    async fn session_not_found_propagates_through_transport() {
        let (session, _server) = create_demo_server(Arc::new(KnowledgeStore::classroom()), 8);
        let err = session.fetch_topic("Astrology").await.unwrap_err();
        assert!(err.is_not_found());
    }

    /// Answers `get_topic_summary` with a bare array instead of an object.
    struct ArraySummary;

    #[async_trait::async_trait]
    impl classroom_core::Tool for ArraySummary {
        fn name(&self) -> &str {
            topic_summary::TOOL_NAME
        }

        fn descriptor(&self) -> classroom_core::ToolDescriptor {
            classroom_core::ToolDescriptor {
                name: topic_summary::TOOL_NAME.into(),
                title: "Broken summary".into(),
                description: "Returns an array.".into(),
                input_schema: serde_json::json!({ "type": "object" }),
                output_schema: serde_json::json!({ "type": "array" }),
            }
        }

        async fn call(
            &self,
            _ctx: &RequestContext,
            _arguments: serde_json::Value,
        ) -> Result<classroom_core::ToolOutput, ToolError> {
            Ok(classroom_core::ToolOutput::structured(serde_json::json!([])))
        }
    }

    #[tokio::test]
    async fn non_object_summary_gets_apology() {
        let store = Arc::new(KnowledgeStore::classroom());
        let mut registry = classroom_core::ToolRegistry::new();
        registry.register(Arc::new(crate::ListTopics::new(store)));
        registry.register(Arc::new(ArraySummary));
        let (session, _server) = classroom_core::ToolServer::spawn(Arc::new(registry), 4);
        let agent = TutorAgent::new(session);
        assert_eq!(agent.answer("photosynthesis").await.unwrap(), APOLOGY_MESSAGE);
    }

    #[test]
    fn decoded_record_keeps_requested_title() {
        let record = record_from_payload(
            "Photosynthesis",
            &serde_json::json!({ "topic": "Something else", "summary": "s", "difficulty": "intermediate" }),
        );
        assert_eq!(record.title, "Photosynthesis");
        assert_eq!(record.difficulty, Difficulty::Intermediate);
    }

    #[test]
    fn lenient_payload_decoding() {
        let record = record_from_payload(
            "Gravity",
            &serde_json::json!({ "summary": "Things fall.", "difficulty": "expert" }),
        );
        assert_eq!(record.title, "Gravity");
        assert_eq!(record.difficulty, Difficulty::Intro);
        assert_eq!(record.study_tip, "");
        assert_eq!(format_answer("Gravity", &record), "Here's a intro explanation of Gravity:\nThings fall.");
    }
}
