use axum::{
    routing::{get, post},
    Router,
    extract::{Json, State},
};
use serde_json::{json, Value};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{Result, AppError};
use crate::api::models::{GenerateRequest, GenerateResponse, HealthResponse};
use crate::notes::{char_count, normalize_notes, word_count};
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(app_state.config.cors_origin.clone())
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/v1/generate", post(generate_handler))
        .layer(cors)
        .with_state(app_state)
}

async fn root_handler() -> Json<Value> {
    Json(json!({}))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn generate_handler(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>> {
    info!(chars = char_count(&req.text), "Processing generate request");
    let start_time = Instant::now();
    let limit = state.config.request_timeout;

    let result = tokio::time::timeout(limit, process_generate_request(&state, &req)).await;
    let elapsed = start_time.elapsed();

    match result {
        Ok(Ok(response)) => {
            info!(
                ?elapsed,
                summary_points = response.summary.len(),
                questions = response.quiz.len(),
                "Generate request completed"
            );
            Ok(Json(response))
        }
        Ok(Err(err)) => {
            warn!(?elapsed, error = %err, "Generate request failed");
            Err(err)
        }
        Err(_) => {
            warn!(?elapsed, "Generate request timed out");
            Err(AppError::Timeout(limit))
        }
    }
}

async fn process_generate_request(state: &AppState, req: &GenerateRequest) -> Result<GenerateResponse> {
    req.validate()?;

    let chars = char_count(&req.text);
    if chars > state.config.max_text_chars {
        return Err(AppError::Validation(format!(
            "text is {} characters, limit is {}",
            chars, state.config.max_text_chars
        )));
    }

    let notes = normalize_notes(&req.text);
    debug!(words = word_count(&notes), "Normalized notes");

    if let Some(cached) = state.cached(&notes) {
        info!("Cache hit for notes");
        return Ok(cached);
    }

    info!(generator = state.generator.name(), "Generating study material");
    let generated = state.generator.generate(&notes).await?;

    state.store(notes, generated.clone());
    Ok(generated)
}
