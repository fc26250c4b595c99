//! JSON HTTP API over the retrieval service.
//!
//! # Endpoints
//!
//! | Method   | Path | Description |
//! |----------|------|-------------|
//! | `POST`   | `/api/upload` | Upload a document (base64 body) |
//! | `POST`   | `/api/search` | Ask a question against the corpus |
//! | `GET`    | `/api/documents` | List documents, newest first |
//! | `DELETE` | `/api/documents/{id}` | Delete a document and its chunks |
//! | `GET`    | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! All error responses share one schema:
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "query must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `embeddings_disabled` (400),
//! `not_found` (404), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted to support browser-based
//! clients.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use quarry_core::embedding::Embedder;
use quarry_core::store::CorpusStore;
use quarry_core::CoreError;

use crate::config::Config;
use crate::extract::{extract_text, ExtractError};
use crate::service;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    store: Arc<dyn CorpusStore>,
    embedder: Arc<dyn Embedder>,
}

/// Starts the HTTP server on `[server].bind` and runs until the process
/// is terminated.
pub async fn run_server(
    config: &Config,
    store: Arc<dyn CorpusStore>,
    embedder: Arc<dyn Embedder>,
) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();

    let state = AppState {
        config: Arc::new(config.clone()),
        store,
        embedder,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/api/upload", post(handle_upload))
        .route("/api/search", post(handle_search))
        .route("/api/documents", get(handle_list_documents))
        .route("/api/documents/{id}", delete(handle_delete_document))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state);

    println!("quarry server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"bad_request"`, `"not_found"`).
    code: String,
    /// Human-readable error message.
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

/// Maps service errors to the most appropriate HTTP status.
///
/// Typed errors ([`CoreError`], [`ExtractError`]) are matched by downcast;
/// embedding-provider configuration errors are recognized by message so
/// disabled providers surface as a 400 rather than a generic 500.
fn classify_error(err: anyhow::Error) -> AppError {
    if let Some(core) = err.downcast_ref::<CoreError>() {
        return match core {
            CoreError::NotFound(id) => not_found(format!("document {} not found", id)),
            CoreError::DimensionMismatch { .. } | CoreError::InvalidConfiguration { .. } => {
                bad_request(core.to_string())
            }
            _ => internal(err.to_string()),
        };
    }

    if let Some(extract) = err.downcast_ref::<ExtractError>() {
        return bad_request(extract.to_string());
    }

    let msg = err.to_string();
    if msg.contains("disabled") {
        let mut e = bad_request(msg);
        e.code = "embeddings_disabled".to_string();
        return e;
    }

    internal(msg)
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /api/upload ============

#[derive(Deserialize)]
struct UploadRequest {
    /// Original filename; the extension selects the extractor.
    name: String,
    /// Base64-encoded file bytes.
    content_b64: String,
}

#[derive(Serialize)]
struct UploadResponse {
    id: i64,
    name: String,
    chunks: usize,
    size: usize,
}

/// Handler for `POST /api/upload`.
///
/// Decodes the payload, extracts text by file type, then chunks, embeds,
/// and persists the document.
async fn handle_upload(
    State(state): State<AppState>,
    Json(req): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, AppError> {
    if req.name.trim().is_empty() {
        return Err(bad_request("name must not be empty"));
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(&req.content_b64)
        .map_err(|e| bad_request(format!("invalid base64 content: {}", e)))?;

    let text = extract_text(&bytes, &req.name).map_err(|e| bad_request(e.to_string()))?;

    let result = service::ingest(
        state.store.as_ref(),
        state.embedder.as_ref(),
        &req.name,
        &text,
        &state.config.chunking,
        &state.config.embedding,
    )
    .await
    .map_err(classify_error)?;

    Ok(Json(UploadResponse {
        id: result.doc_id,
        name: req.name,
        chunks: result.chunk_count,
        size: text.len(),
    }))
}

// ============ POST /api/search ============

#[derive(Deserialize)]
struct SearchRequest {
    query: String,
    /// Overrides `[retrieval].top_k` for this request.
    top_k: Option<i64>,
}

#[derive(Serialize)]
struct SearchResponse {
    answer: String,
    sources: Vec<SourceResponse>,
}

#[derive(Serialize)]
struct SourceResponse {
    #[serde(rename = "docName")]
    doc_name: String,
    excerpt: String,
    score: f32,
}

/// Handler for `POST /api/search`.
async fn handle_search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    if req.query.trim().is_empty() {
        return Err(bad_request("query must not be empty"));
    }

    let top_k = req.top_k.unwrap_or(state.config.retrieval.top_k);
    if top_k < 1 {
        return Err(bad_request("top_k must be >= 1"));
    }

    let result = service::answer(
        state.store.as_ref(),
        state.embedder.as_ref(),
        &req.query,
        top_k,
    )
    .await
    .map_err(classify_error)?;

    Ok(Json(SearchResponse {
        answer: result.answer,
        sources: result
            .sources
            .into_iter()
            .map(|s| SourceResponse {
                doc_name: s.doc_name,
                excerpt: s.excerpt,
                score: s.score,
            })
            .collect(),
    }))
}

// ============ GET /api/documents ============

#[derive(Serialize)]
struct DocumentResponse {
    id: i64,
    name: String,
    chunks: i64,
    #[serde(rename = "uploadedAt")]
    uploaded_at: i64,
    size: i64,
}

/// Handler for `GET /api/documents`. Newest upload first.
async fn handle_list_documents(
    State(state): State<AppState>,
) -> Result<Json<Vec<DocumentResponse>>, AppError> {
    let docs = state
        .store
        .get_all_documents()
        .await
        .map_err(classify_error)?;

    Ok(Json(
        docs.into_iter()
            .map(|d| DocumentResponse {
                id: d.id,
                name: d.name,
                chunks: d.chunk_count,
                uploaded_at: d.uploaded_at,
                size: d.size,
            })
            .collect(),
    ))
}

// ============ DELETE /api/documents/{id} ============

#[derive(Serialize)]
struct DeleteResponse {
    success: bool,
}

/// Handler for `DELETE /api/documents/{id}`. Idempotent: deleting a
/// missing id still succeeds.
async fn handle_delete_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, AppError> {
    state
        .store
        .delete_document(id)
        .await
        .map_err(classify_error)?;

    Ok(Json(DeleteResponse { success: true }))
}
