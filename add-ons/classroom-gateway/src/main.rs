//! Axum-based gateway for the classroom tutor. Config-driven via CoreConfig.
//!
//! Flags: `--verify` runs a pre-flight check, `--demo` runs a scripted
//! console session against the in-process tool server and exits.

use axum::{
    extract::{Json, Path, State},
    http::{Method, StatusCode},
    routing::{get, post},
    Router,
};
use classroom_core::{CoreConfig, KnowledgeStore, RequestContext, ToolSession};
use classroom_skills::{
    create_demo_server, KnowledgeService, TutorAgent, SERVER_INSTRUCTIONS, SERVER_NAME,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const DEMO_QUESTIONS: [&str; 3] = [
    "Can you remind me what photosynthesis is?",
    "What do Newton's laws of motion say?",
    "Do you know anything about quantum field theory?",
];

/// Built-in catalog, or the JSON catalog named by `catalog_path`.
fn load_catalog(config: &CoreConfig) -> Result<KnowledgeStore, classroom_core::KnowledgeError> {
    match config.catalog_path.as_deref() {
        Some(path) => KnowledgeStore::load_json_path(path),
        None => Ok(KnowledgeStore::classroom()),
    }
}

/// Pre-flight check: config parses, catalog loads, port is available.
fn run_verify() -> Result<(), String> {
    let config = CoreConfig::load().map_err(|e| format!("Config load failed: {}", e))?;

    print!("Checking topic catalog... ");
    let store = load_catalog(&config).map_err(|e| format!("catalog unavailable: {}", e))?;
    if store.is_empty() {
        return Err("catalog contains no topics".to_string());
    }
    println!("OK ({} topics)", store.len());

    let port = config.port;
    print!("Checking port {}... ", port);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    match std::net::TcpListener::bind(addr) {
        Ok(listener) => {
            drop(listener);
            println!("OK (available)");
        }
        Err(e) => {
            return Err(format!("Port {} BLOCKED: {}", port, e));
        }
    }

    println!("\nSUCCESS: ready to start gateway.");
    Ok(())
}

/// Scripted classroom session written to `out`.
async fn run_demo<W: std::io::Write>(
    store: Arc<KnowledgeStore>,
    capacity: usize,
    out: &mut W,
) -> Result<(), BoxError> {
    let (session, _server) = create_demo_server(store, capacity);
    let agent = TutorAgent::new(session);
    let tool_names = agent.list_tool_names().await?;
    writeln!(out, "Connected tools: {}", tool_names.join(", "))?;

    for question in DEMO_QUESTIONS {
        writeln!(out, "\nStudent: {}", question)?;
        let answer = agent.answer(question).await?;
        writeln!(out, "Tutor: {}", answer)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[classroom-gateway] .env not loaded: {} (using system environment)", e);
    }

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--verify") {
        match run_verify() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("PRE-FLIGHT FAILED: {}", e);
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        // Logs go to stderr so stdout carries only the demo transcript.
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Arc::new(CoreConfig::load()?);
    let knowledge = Arc::new(load_catalog(&config)?);
    tracing::info!(topics = knowledge.len(), "Topic catalog loaded");

    if args.iter().any(|a| a == "--demo") {
        return run_demo(knowledge, config.channel_capacity, &mut std::io::stdout()).await;
    }

    let (session, _server) = create_demo_server(Arc::clone(&knowledge), config.channel_capacity);
    let app = build_app(AppState::new(Arc::clone(&config), knowledge, session));

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], config.port));
    tracing::info!("{} listening on {}", config.app_name, addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_app(state: AppState) -> Router {
    // CORS: allow Backend/API (8001-8099) and Frontend/UI (3001-3099) port ranges.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin: &axum::http::HeaderValue, _| {
            let s = origin.to_str().unwrap_or("");
            let port = s
                .rsplit(':')
                .next()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(0);
            (3001..=3099).contains(&port) || (8001..=8099).contains(&port)
        }))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/v1/execute", post(execute))
        .route("/api/v1/health", get(health))
        .route("/api/v1/status", get(status))
        .route("/api/v1/tools", get(list_tools))
        .route("/api/v1/topics", get(list_topics))
        .route("/api/v1/topics/:title", get(get_topic))
        .route("/api/v1/ask", post(ask))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<CoreConfig>,
    pub(crate) knowledge: Arc<KnowledgeStore>,
    pub(crate) session: ToolSession,
    pub(crate) tutor: Arc<TutorAgent<Arc<dyn KnowledgeService>>>,
}

impl AppState {
    /// State whose tutor reads through the same tool session the routes use.
    fn new(config: Arc<CoreConfig>, knowledge: Arc<KnowledgeStore>, session: ToolSession) -> Self {
        let service: Arc<dyn KnowledgeService> = Arc::new(session.clone());
        Self::with_tutor_service(config, knowledge, session, service)
    }

    /// State whose tutor uses `service` for topic listing and lookup.
    fn with_tutor_service(
        config: Arc<CoreConfig>,
        knowledge: Arc<KnowledgeStore>,
        session: ToolSession,
        service: Arc<dyn KnowledgeService>,
    ) -> Self {
        Self {
            config,
            knowledge,
            session,
            tutor: Arc::new(TutorAgent::new(service)),
        }
    }
}

type ApiError = (StatusCode, axum::Json<serde_json::Value>);

fn api_error(status: StatusCode, message: impl std::fmt::Display) -> ApiError {
    (
        status,
        axum::Json(serde_json::json!({ "status": "error", "error": message.to_string() })),
    )
}

/// GET /api/v1/health – liveness check for UI and scripts.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/v1/status – server identity and catalog size.
async fn status(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "app_name": state.config.app_name,
        "server": SERVER_NAME,
        "instructions": SERVER_INSTRUCTIONS,
        "topics": state.knowledge.len()
    }))
}

/// GET /api/v1/tools – descriptors of the tools served to the tutor.
async fn list_tools(
    State(state): State<AppState>,
) -> Result<axum::Json<serde_json::Value>, ApiError> {
    let tools = state
        .session
        .list_tools()
        .await
        .map_err(|e| api_error(StatusCode::SERVICE_UNAVAILABLE, e))?;
    Ok(axum::Json(serde_json::json!({ "tools": tools })))
}

/// GET /api/v1/topics – sorted topic titles.
async fn list_topics(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "topics": state.knowledge.list_topics() }))
}

/// GET /api/v1/topics/:title – one topic record (exact title).
async fn get_topic(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<axum::Json<serde_json::Value>, ApiError> {
    let record = state
        .knowledge
        .get_topic(&title)
        .map_err(|e| api_error(StatusCode::NOT_FOUND, e))?;
    Ok(axum::Json(serde_json::json!(record)))
}

#[derive(serde::Deserialize)]
struct AskRequest {
    question: String,
}

/// POST /api/v1/ask – tutor answer for a free-text question.
async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<axum::Json<serde_json::Value>, ApiError> {
    let answer = state.tutor.answer(&req.question).await.map_err(|e| {
        tracing::error!(error = %e, "Tutor lookup inconsistent with catalog");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, e)
    })?;
    Ok(axum::Json(serde_json::json!({
        "question": req.question,
        "answer": answer
    })))
}

#[derive(serde::Deserialize)]
struct ExecuteRequest {
    client_id: String,
    correlation_id: Option<String>,
    tool: String,
    #[serde(default)]
    arguments: Option<serde_json::Value>,
}

/// POST /v1/execute – raw tool call through the tool session.
async fn execute(
    State(state): State<AppState>,
    Json(req): Json<ExecuteRequest>,
) -> axum::Json<serde_json::Value> {
    let ctx = RequestContext {
        client_id: req.client_id,
        correlation_id: req.correlation_id,
    };
    let arguments = req.arguments.unwrap_or_else(|| serde_json::json!({}));
    match state.session.call_tool(&ctx, &req.tool, arguments).await {
        Ok(out) => axum::Json(serde_json::json!({
            "status": "ok",
            "tool": req.tool,
            "content": out.text,
            "structured": out.structured
        })),
        Err(e) => axum::Json(serde_json::json!({
            "status": "error",
            "tool": req.tool,
            "error": e.to_string()
        })),
    }
}
