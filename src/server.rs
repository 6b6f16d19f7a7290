//! Content API HTTP server.
//!
//! Exposes the listing and fetch pipeline as a small JSON/binary API for a
//! client-rendered portfolio UI. Handlers hold no state beyond the shared
//! [`DriveClient`]; every request re-derives its data from the store, so
//! there is nothing to invalidate and nothing to coordinate.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Health check (returns version) |
//! | `GET` | `/api/posts` | List Markdown posts with thumbnails |
//! | `GET` | `/api/posts/{id}` | Post content split into front matter and body |
//! | `GET` | `/api/projects` | List PDF projects with thumbnails |
//! | `GET` | `/api/projects/{id}` | Project bytes, streamed as `application/pdf` |
//! | `GET` | `/api/projects/{id}/metadata` | Project name, modified time, view link |
//! | `GET` | `/api/resume` | Resume bytes as an attachment download |
//!
//! # Error Contract
//!
//! All error responses share one envelope:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "File not found." } }
//! ```
//!
//! Error codes: `bad_request` (400), `access_denied` (403), `not_found`
//! (404), `config_error` (500), `upstream_error` (500). Upstream details
//! are logged and never included in the payload. The resume endpoint is the
//! one exception to the taxonomy: any failure there is a 500, since it has
//! no client-supplied id to blame.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted — the API serves a
//! statically hosted front end on a different origin.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::drive::{self, DriveClient};
use crate::error::StoreError;
use crate::fetch;
use crate::listing;
use crate::models::ContentItem;

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
struct AppState {
    /// Application configuration (wrapped in `Arc` for cheap cloning across handlers).
    config: Arc<Config>,
    /// Authenticated Drive client, shared so the token cache is shared too.
    drive: Arc<DriveClient>,
}

/// Starts the content API server.
///
/// Builds the Drive client (fatal if credentials cannot be loaded), binds
/// to the address configured in `[server].bind`, and registers all route
/// handlers. The server runs until the process is terminated.
///
/// # Returns
///
/// Returns `Ok(())` when the server shuts down, or an error if credential
/// loading or binding fails.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let drive = DriveClient::from_config(config)?;

    let state = AppState {
        config: Arc::new(config.clone()),
        drive: Arc::new(drive),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(handle_health))
        .route("/api/posts", get(handle_list_posts))
        .route("/api/posts/{id}", get(handle_get_post))
        .route("/api/projects", get(handle_list_projects))
        .route("/api/projects/{id}", get(handle_get_project))
        .route("/api/projects/{id}/metadata", get(handle_get_project_metadata))
        .route("/api/resume", get(handle_get_resume))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    println!("folio server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Inner error detail with a machine-readable code and human-readable message.
#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"not_found"`, `"access_denied"`).
    code: String,
    /// Human-readable error message.
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
#[derive(Debug)]
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

/// Constructs a 400 Bad Request error.
fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

/// Constructs a 403 Forbidden error.
fn access_denied(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::FORBIDDEN,
        code: "access_denied".to_string(),
        message: message.into(),
    }
}

/// Constructs a 404 Not Found error.
fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

/// Constructs a 500 error for missing or broken configuration.
fn config_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "config_error".to_string(),
        message: message.into(),
    }
}

/// Constructs a 500 error for store-side failures.
fn upstream_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "upstream_error".to_string(),
        message: message.into(),
    }
}

/// Maps a pipeline error onto the client-visible status/message pair.
///
/// `upstream_message` is the generic message used when the store failed in
/// a way the client has no business knowing about; the real cause goes to
/// the log. An `InvalidId` reaching this point came from configuration —
/// client-supplied ids are rejected by [`require_id`] before any store
/// call — so it maps to 500, not 400.
fn classify_store_error(err: StoreError, upstream_message: &str) -> AppError {
    match err {
        StoreError::MissingConfig(what) => config_error(format!("{} not configured.", what)),
        StoreError::NotFound => not_found("File not found."),
        StoreError::AccessDenied => access_denied("Access denied by Google Drive."),
        StoreError::InvalidId(id) => {
            tracing::error!("configured id is not a valid drive id: {:?}", id);
            config_error("A configured file or folder ID is invalid.")
        }
        StoreError::Upstream(detail) => {
            tracing::error!("drive request failed: {}", detail);
            upstream_error(upstream_message)
        }
    }
}

/// Validates a client-supplied path id with the endpoint's own message,
/// before anything touches the store.
fn require_id(id: &str, message: &str) -> Result<(), AppError> {
    drive::require_file_id(id).map_err(|_| bad_request(message))
}

// ============ GET /health ============

/// JSON response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    /// Always `"ok"` when the server is running.
    status: String,
    /// The crate version from `Cargo.toml`.
    version: String,
}

/// Handler for `GET /health`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /api/posts ============

/// Handler for `GET /api/posts`.
///
/// Returns the post listing, newest first, with thumbnails joined by name.
/// An empty folder is an empty array, not an error.
async fn handle_list_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContentItem>>, AppError> {
    let items = listing::list_posts(&state.drive, &state.config)
        .await
        .map_err(|e| classify_store_error(e, "Failed to fetch posts."))?;
    Ok(Json(items))
}

// ============ GET /api/posts/{id} ============

/// JSON response body for `GET /api/posts/{id}`.
#[derive(Serialize)]
struct PostContentResponse {
    content: String,
    frontmatter: serde_json::Map<String, serde_json::Value>,
}

/// Handler for `GET /api/posts/{id}`.
///
/// Fetches one Markdown post and returns its body and parsed front matter.
async fn handle_get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostContentResponse>, AppError> {
    require_id(&id, "Blog post ID is required.")?;

    let doc = fetch::fetch_post(&state.drive, &id)
        .await
        .map_err(|e| classify_store_error(e, "Failed to fetch post."))?;

    Ok(Json(PostContentResponse {
        content: doc.body,
        frontmatter: doc.front_matter,
    }))
}

// ============ GET /api/projects ============

/// Handler for `GET /api/projects`.
async fn handle_list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContentItem>>, AppError> {
    let items = listing::list_projects(&state.drive, &state.config)
        .await
        .map_err(|e| classify_store_error(e, "Failed to fetch projects."))?;
    Ok(Json(items))
}

// ============ GET /api/projects/{id} ============

/// Handler for `GET /api/projects/{id}`.
///
/// Relays the project PDF as a byte stream. The response body is wired
/// straight to the store's stream, so the file is never buffered here and
/// a client disconnect drops the upstream connection with it.
async fn handle_get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    require_id(&id, "Project ID is required.")?;

    let stream = fetch::fetch_project_stream(&state.drive, &id)
        .await
        .map_err(|e| classify_store_error(e, "Failed to fetch project."))?;

    Ok((
        [(header::CONTENT_TYPE, "application/pdf")],
        Body::from_stream(stream),
    )
        .into_response())
}

// ============ GET /api/projects/{id}/metadata ============

/// JSON response body for `GET /api/projects/{id}/metadata`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectMetadataResponse {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    modified_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    web_view_link: Option<String>,
}

/// Handler for `GET /api/projects/{id}/metadata`.
async fn handle_get_project_metadata(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProjectMetadataResponse>, AppError> {
    require_id(&id, "Project ID is required.")?;

    let file = fetch::fetch_project_metadata(&state.drive, &id)
        .await
        .map_err(|e| classify_store_error(e, "Failed to fetch project metadata."))?;

    Ok(Json(ProjectMetadataResponse {
        name: file.name,
        modified_time: file.modified_time,
        web_view_link: file.web_view_link,
    }))
}

// ============ GET /api/resume ============

/// Handler for `GET /api/resume`.
///
/// Serves the configured resume file as an attachment named by the store.
/// There is no client-supplied id here, so every failure is a 500.
async fn handle_get_resume(State(state): State<AppState>) -> Result<Response, AppError> {
    let (name, bytes) = fetch::fetch_resume(&state.drive, &state.config)
        .await
        .map_err(classify_resume_error)?;

    let disposition = content_disposition(&name)?;
    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/pdf"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// Resume failures collapse to 500: missing configuration keeps its
/// descriptive message, everything else becomes a generic download error.
fn classify_resume_error(err: StoreError) -> AppError {
    match err {
        StoreError::MissingConfig(what) => config_error(format!("{} not configured.", what)),
        other => {
            tracing::error!("resume download failed: {}", other);
            upstream_error("Failed to download resume.")
        }
    }
}

/// Builds the attachment header from the store-reported name. Characters
/// that cannot appear in a quoted header value are dropped.
fn content_disposition(name: &str) -> Result<HeaderValue, AppError> {
    let safe: String = name
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control() && *c != '"')
        .collect();
    HeaderValue::from_str(&format!("attachment; filename=\"{}\"", safe))
        .map_err(|_| upstream_error("Failed to download resume."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_maps_each_variant_once() {
        let cases = [
            (StoreError::MissingConfig("Posts folder ID"), StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            (StoreError::NotFound, StatusCode::NOT_FOUND, "not_found"),
            (StoreError::AccessDenied, StatusCode::FORBIDDEN, "access_denied"),
            (StoreError::InvalidId("..".to_string()), StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            (StoreError::Upstream("boom".to_string()), StatusCode::INTERNAL_SERVER_ERROR, "upstream_error"),
        ];
        for (err, status, code) in cases {
            let mapped = classify_store_error(err, "Failed to fetch posts.");
            assert_eq!(mapped.status, status);
            assert_eq!(mapped.code, code);
        }
    }

    #[test]
    fn test_upstream_detail_never_reaches_the_client() {
        let mapped = classify_store_error(
            StoreError::Upstream("connect ECONNREFUSED 10.0.0.7".to_string()),
            "Failed to fetch posts.",
        );
        assert_eq!(mapped.message, "Failed to fetch posts.");
        assert!(!mapped.message.contains("ECONNREFUSED"));
    }

    #[test]
    fn test_resume_errors_are_always_500() {
        for err in [
            StoreError::NotFound,
            StoreError::AccessDenied,
            StoreError::Upstream("x".to_string()),
            StoreError::InvalidId("y".to_string()),
        ] {
            let mapped = classify_resume_error(err);
            assert_eq!(mapped.status, StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_content_disposition_strips_quotes_and_controls() {
        let value = content_disposition("Jane \"Doe\"\nResume.pdf").unwrap();
        assert_eq!(
            value.to_str().unwrap(),
            "attachment; filename=\"Jane DoeResume.pdf\""
        );
    }
}
