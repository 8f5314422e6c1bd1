use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;

use prepline_core::{ExtractionResult, GenerateRequest, InterviewDraft, InterviewRequest, RequestError};
use prepline_transcript::{resolve, CallLog, Source};

const DEFAULT_BIND: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 7433;

// ── Config ──

pub struct ServeConfig {
    pub bind: String,
    pub port: u16,
}

impl ServeConfig {
    /// Read `PREPLINE_BIND` / `PREPLINE_PORT`, falling back to defaults.
    pub fn from_env() -> Self {
        let bind = std::env::var("PREPLINE_BIND")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let port = std::env::var("PREPLINE_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        Self { bind, port }
    }
}

// ── Error Handling ──

struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<RequestError>() {
            Some(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(%status, error = %self.0, "request failed");
        let body = serde_json::json!({ "success": false, "message": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Unwrap a JSON body, reporting a rejected body in the usual error shape.
/// A literal `null` body reads as an empty object.
fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    match body {
        Ok(Json(Value::Null)) => Ok(Value::Object(Default::default())),
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(AppError(anyhow::anyhow!(rejection.body_text()))),
    }
}

// ── Entrypoint ──

pub async fn serve(config: ServeConfig) -> anyhow::Result<()> {
    let app = router();
    let addr = format!("{}:{}", config.bind, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("prepline HTTP server listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the router (for testing without binding to a port).
pub fn router() -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/extract", post(post_extract))
        .route("/api/interviews", post(post_interviews))
        .layer(CorsLayer::permissive())
}

// ── Health ──

async fn health() -> Json<Value> {
    Json(serde_json::json!({ "ok": true }))
}

// ── POST /api/extract ──

#[derive(Serialize)]
struct ExtractResponse {
    success: bool,
    source: Source,
    interview: ExtractionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    request: Option<InterviewRequest>,
}

/// Body is a call object: `{ messages, transcript?, extractedVariables?, userid? }`.
async fn post_extract(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ExtractResponse>, AppError> {
    let body = json_body(body)?;
    let (call, stats) = CallLog::from_call(&body);
    tracing::debug!(
        read = stats.records_read,
        dropped = stats.records_dropped,
        "ingested call messages"
    );
    let resolution = resolve(&call);

    let request = body
        .get("userid")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|userid| InterviewRequest::from_extraction(&resolution.result, userid));

    Ok(Json(ExtractResponse {
        success: true,
        source: resolution.source,
        interview: resolution.result,
        request,
    }))
}

// ── POST /api/interviews ──

#[derive(Serialize)]
struct InterviewResponse {
    success: bool,
    interview: InterviewDraft,
}

async fn post_interviews(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<InterviewResponse>, AppError> {
    let body: GenerateRequest = serde_json::from_value(json_body(body)?)?;
    let req = body.validate()?;
    let draft = InterviewDraft::stamped_now(&req)?;
    tracing::info!(userid = %req.userid, role = %req.role, "interview request accepted");
    Ok(Json(InterviewResponse {
        success: true,
        interview: draft,
    }))
}

// ── Tests ──
