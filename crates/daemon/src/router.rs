//! HTTP routing for the AssetView API.
//!
//! This module builds the axum [`Router`] that exposes the asset library:
//! JSON endpoints under `/api`, raw asset files under the configured mount,
//! and the browser UI bundle for everything else.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path as UrlPath, Query, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use protocol::{
    BrowseResponse, ErrorCode, ErrorMessage, FileContentResponse, SearchRequest, SearchResponse,
};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::config::ServerConfig;
use crate::files::{AssetLibrary, FileError, MIN_QUERY_LENGTH};

/// Shared state handed to every handler.
pub struct AppState {
    /// The asset library being served.
    pub library: AssetLibrary,
}

/// Error returned by API handlers.
///
/// Serialises as `{ "error": "<message>", "code": "<code>" }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorMessage,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorMessage {
                error: message.into(),
                code,
            },
        }
    }

    pub fn invalid_query() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidQuery,
            format!("Search query must be at least {MIN_QUERY_LENGTH} characters"),
        )
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::ReadError,
            "Internal server error",
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<FileError> for ApiError {
    fn from(err: FileError) -> Self {
        let status = match &err {
            FileError::AccessDenied(_) => StatusCode::FORBIDDEN,
            FileError::NotFound(_) => StatusCode::NOT_FOUND,
            FileError::NotADirectory(_)
            | FileError::IsADirectory(_)
            | FileError::UnsupportedType(_) => StatusCode::BAD_REQUEST,
            FileError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            FileError::InvalidQuery { .. } => return Self::invalid_query(),
            FileError::ReadError { .. } => {
                // OS error text stays in the log only.
                error!(error = %err, "Filesystem operation failed");
                return Self::internal();
            }
        };

        debug!(error = %err, "Request rejected");
        match &err {
            FileError::AccessDenied(_) => Self::new(status, err.code(), "Access denied"),
            _ => Self::new(status, err.code(), err.to_string()),
        }
    }
}

/// Query string for path-addressed endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PathQuery {
    /// Path relative to the asset root.
    #[serde(default)]
    pub path: String,
}

/// Build the `/api` routes.
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/browse", get(browse))
        .route("/search", post(search))
        .route("/file-content", get(file_content))
        .with_state(state)
}

/// Build the complete application: API, raw asset mount, UI bundle.
pub fn app_router(library: AssetLibrary, config: &ServerConfig) -> Router {
    let state = Arc::new(AppState { library });

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
        .allow_origin(Any);

    let mount = config.assets_mount.trim_end_matches('/');
    let raw = Router::new()
        .route(&format!("{mount}/{{*path}}"), get(raw_asset))
        .with_state(state.clone());

    Router::new()
        .nest("/api", api_router(state))
        .merge(raw)
        .fallback_service(ServeDir::new(&config.ui_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn health() -> &'static str {
    "ok"
}

async fn browse(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PathQuery>,
) -> Result<Json<BrowseResponse>, ApiError> {
    let response = blocking(state, move |library| library.browse(&query.path)).await?;
    Ok(Json(response))
}

async fn search(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!(error = %rejection, "Rejected search body");
        ApiError::invalid_query()
    })?;
    let query = request.query.ok_or_else(ApiError::invalid_query)?;

    let term = query.clone();
    let results = blocking(state, move |library| {
        library.search(&term, request.path.as_deref())
    })
    .await?;

    Ok(Json(SearchResponse::new(query, results)))
}

async fn file_content(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PathQuery>,
) -> Result<Json<FileContentResponse>, ApiError> {
    let response = blocking(state, move |library| library.read_text(&query.path)).await?;
    Ok(Json(response))
}

async fn raw_asset(
    State(state): State<Arc<AppState>>,
    UrlPath(path): UrlPath<String>,
) -> Result<Response, ApiError> {
    let asset = blocking(state, move |library| library.resolve_file(&path)).await?;

    let file = tokio::fs::File::open(&asset.path).await.map_err(|e| {
        error!(error = %e, "Failed to open asset file");
        ApiError::internal()
    })?;

    let headers = [
        (header::CONTENT_TYPE, asset.mime_type),
        (header::CONTENT_LENGTH, asset.size.to_string()),
    ];
    Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
}

/// Run a library call on the blocking pool.
async fn blocking<T, F>(state: Arc<AppState>, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&AssetLibrary) -> Result<T, FileError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state.library))
        .await
        .map_err(|e| {
            error!(error = %e, "Blocking task failed");
            ApiError::internal()
        })?
        .map_err(ApiError::from)
}
