use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use crate::db::{ExecutionError, execute_scalar_async};
use crate::llm::models::NlAnswer;
use crate::translator::{FailureKind, GenerationError};
use crate::web::state::AppState;

#[derive(Debug, Deserialize, Clone)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct HelpText {
    pub description: String,
    pub examples: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SystemStatus {
    pub version: String,
    pub uptime_seconds: i64,
    pub backend: String,
    pub model: String,
}

/// Failure surfaced to the client. Never carries generated SQL.
#[derive(Debug)]
pub enum ApiError {
    Generation(GenerationError),
    Execution(ExecutionError),
}

impl From<GenerationError> for ApiError {
    fn from(e: GenerationError) -> Self {
        ApiError::Generation(e)
    }
}

impl From<ExecutionError> for ApiError {
    fn from(e: ExecutionError) -> Self {
        ApiError::Execution(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match &self {
            ApiError::Generation(e) => match e.kind() {
                FailureKind::MalformedInput => (
                    StatusCode::BAD_REQUEST,
                    "malformed_input",
                    "Please ask a question.",
                ),
                FailureKind::UntrustedOutputRejected => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "untrusted_output_rejected",
                    "Could not process the question. Please rephrase it.",
                ),
                FailureKind::EndpointUnavailable => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "endpoint_unavailable",
                    "The language model is unavailable right now. Please try again.",
                ),
            },
            ApiError::Execution(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "execution_failed",
                "An error occurred while processing the question. Try again or rephrase it.",
            ),
        };

        let body = ApiErrorBody {
            error: error.to_string(),
            message: message.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// Natural language question -> one number
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<NlAnswer>, ApiError> {
    let start_time = Instant::now();

    let sql = state.translator.text_to_sql(&payload.question).await.map_err(|e| {
        error!("Failed to translate question: {}", e);
        ApiError::from(e)
    })?;

    let value = execute_scalar_async(state.db_pool.clone(), sql.clone())
        .await
        .map_err(|e| {
            error!("Failed to execute generated SQL: {}", e);
            ApiError::from(e)
        })?;

    info!(
        "Query result: {} ({}ms)",
        value,
        start_time.elapsed().as_millis()
    );

    Ok(Json(NlAnswer {
        question: payload.question,
        sql: sql.into_inner(),
        value,
        created_at: chrono::Utc::now(),
    }))
}

pub async fn help() -> Json<HelpText> {
    Json(HelpText {
        description: "Ask questions about videos and their statistics: number of videos, \
                      views, likes, comments, per-creator stats and day-by-day growth. \
                      Questions may be written in Russian."
            .to_string(),
        examples: vec![
            "Сколько всего видео есть в системе?".to_string(),
            "Сколько видео набрало больше 100000 просмотров?".to_string(),
            "На сколько просмотров выросли все видео 28 ноября 2025?".to_string(),
            "Сколько видео получали новые просмотры 27 ноября 2025?".to_string(),
        ],
    })
}

pub async fn system_status(State(state): State<Arc<AppState>>) -> Json<SystemStatus> {
    let now = chrono::Utc::now();
    let uptime = now.signed_duration_since(state.startup_time).num_seconds();

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        backend: state.config.llm.backend.clone(),
        model: state.translator.model_name().to_string(),
    })
}
