//! REST API Server for the Financial Query Assistant
//!
//! Exposes the query router via HTTP endpoints
//! Integrates with the chat front end (form posts to `/ask`)

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, info_span, Instrument};

use crate::models::{ErrorCode, Reply, ResponsePayload, StatusClass};
use crate::router::QueryRouter;

/// =============================
/// Request Models
/// =============================

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AskRequest {
    #[serde(default)]
    pub query: Option<String>,
}

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success(text: String) -> Self {
        Self {
            success: true,
            response: Some(text),
            error: None,
            code: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(code: ErrorCode, message: String) -> Self {
        Self {
            success: false,
            response: None,
            error: Some(message),
            code: Some(code),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Translate a router reply into the HTTP response
fn respond(reply: Reply) -> (StatusCode, Json<ApiResponse>) {
    let status = http_status(reply.status);
    let body = match reply.payload {
        ResponsePayload::Answer(text) => ApiResponse::success(text),
        ResponsePayload::Error { code, message } => ApiResponse::error(code, message),
    };
    (status, Json(body))
}

fn http_status(status: StatusClass) -> StatusCode {
    match status {
        StatusClass::Ok => StatusCode::OK,
        StatusClass::BadRequest => StatusCode::BAD_REQUEST,
        StatusClass::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub router: Arc<QueryRouter>,
}

/// =============================
/// Health & Status Endpoints
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn status(State(state): State<ApiState>) -> Json<serde_json::Value> {
    let oracle_error = state.router.oracle_error();
    Json(serde_json::json!({
        "oracle_available": oracle_error.is_none(),
        "oracle_error": oracle_error,
    }))
}

/// =============================
/// Ask Endpoints
/// =============================

async fn answer(state: ApiState, req: AskRequest) -> (StatusCode, Json<ApiResponse>) {
    let request_id = uuid::Uuid::new_v4();
    let query = req.query.unwrap_or_default();

    let span = info_span!("ask", %request_id);
    async move {
        info!("Received query: {}", query);
        let reply = state.router.ask(&query).await;
        info!(status = ?reply.status, stage = ?reply.stage, "Query handled");
        respond(reply)
    }
    .instrument(span)
    .await
}

async fn ask_form(
    State(state): State<ApiState>,
    Form(req): Form<AskRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    answer(state, req).await
}

async fn ask_json(
    State(state): State<ApiState>,
    Json(req): Json<AskRequest>,
) -> (StatusCode, Json<ApiResponse>) {
    answer(state, req).await
}

/// =============================
/// Router
/// =============================

pub fn create_router(router: Arc<QueryRouter>) -> Router {
    let state = ApiState { router };

    Router::new()
        .route("/health", get(health))
        .route("/api/status", get(status))
        .route("/ask", post(ask_form))
        .route("/api/ask", post(ask_json))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    router: Arc<QueryRouter>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let app = create_router(router);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API Server listening on http://0.0.0.0:{}", port);
    info!("Local: http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
