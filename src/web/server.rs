use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use crate::cli::ServeArgs;
use crate::extract::extract;
use crate::parsing::xlsx::{self, SourceError};
use crate::utils::validation::{validate_upload, MAX_UPLOAD_SIZE};

/// Security configuration constants to prevent `DoS` attacks
pub const MAX_MULTIPART_FIELDS: usize = 10;
pub const MAX_TOKEN_FIELD_SIZE: usize = 1024; // 1KB

/// Shared application state
pub struct AppState {
    /// Workbook served by `/panel.json` and replaced by `/upload`.
    pub data_path: PathBuf,
    /// Shared secret required for uploads, when set.
    pub upload_token: Option<String>,
    /// Serializes workbook reads against atomic replacement.
    source_lock: RwLock<()>,
}

/// Build a failure response in the panel's error shape.
fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({ "ok": false, "error": message })),
    )
        .into_response()
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    // Build tokio runtime
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args).await })
}

/// Create the application router with all routes and middleware configured.
#[allow(clippy::missing_panics_doc)] // Panics only on invalid governor config (constants are valid)
#[must_use]
pub fn create_router(data_path: PathBuf, upload_token: Option<String>) -> Router {
    // An empty token disables the gate rather than requiring an empty header
    let upload_token = upload_token.filter(|token| !token.is_empty());
    let state = Arc::new(AppState {
        data_path,
        upload_token,
        source_lock: RwLock::new(()),
    });

    // Configure IP-based rate limiting
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10) // 10 requests per second per IP
        .burst_size(50) // Allow bursts of 50 requests
        .finish()
        .unwrap();

    // Build router with comprehensive security layers
    Router::new()
        .route("/", get(index_handler))
        .route("/panel.json", get(panel_handler))
        .route("/upload", post(upload_handler))
        .route("/_health", get(health_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                // Security headers for browser protection
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("x-xss-protection"),
                    HeaderValue::from_static("1; mode=block"),
                ))
                .layer(SetResponseHeaderLayer::if_not_present(
                    HeaderName::from_static("referrer-policy"),
                    HeaderValue::from_static("strict-origin-when-cross-origin"),
                ))
                // The panel is consumed by browser clients on other origins
                .layer(CorsLayer::permissive())
                // IP-based rate limiting to prevent abuse
                .layer(GovernorLayer {
                    config: Arc::new(governor_conf),
                })
                // Request timeout to prevent slow client attacks
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(30),
                ))
                // Limit concurrent requests to prevent DOS
                .layer(ConcurrencyLimitLayer::new(100))
                // Limit request body size (largest workbook + multipart overhead)
                .layer(DefaultBodyLimit::max(20 * 1024 * 1024)), // 20MB limit
        )
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting antigram-panel web server at http://{addr}");
    println!("Serving panel from {}", args.data.display());

    if args.open {
        let _ = open::that(format!("http://{addr}"));
    }

    let app = create_router(args.data, args.upload_token);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Main page handler
async fn index_handler() -> Html<&'static str> {
    Html(include_str!("templates/index.html"))
}

/// Liveness probe
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "ok": true,
        "now": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Re-read the source workbook and return the extracted panel.
async fn panel_handler(State(state): State<Arc<AppState>>) -> Response {
    let source = {
        let _guard = state.source_lock.read().await;
        xlsx::load(&state.data_path)
    };

    match source {
        Ok(sheet) => {
            let extraction = extract(&sheet.grid, &sheet.sheet_name);
            Json(extraction.panel).into_response()
        }
        Err(err @ SourceError::Missing(_)) => {
            error_response(StatusCode::NOT_FOUND, &err.to_string())
        }
        Err(err) => {
            tracing::error!("failed to read source workbook: {err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}

/// Replace the source workbook from a multipart upload.
async fn upload_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut payload: Option<(Option<String>, Vec<u8>)> = None;
    let mut form_token: Option<String> = None;
    let mut fields_received = 0usize;

    // Process multipart fields
    loop {
        // Check field count limit before processing
        if fields_received >= MAX_MULTIPART_FIELDS {
            return error_response(StatusCode::BAD_REQUEST, "Too many form fields");
        }

        match multipart.next_field().await {
            Ok(Some(field)) => {
                fields_received += 1;
                let name = field.name().unwrap_or_default().to_string();

                match name.as_str() {
                    "file" => {
                        let filename = field.file_name().map(std::string::ToString::to_string);
                        match field.bytes().await {
                            Ok(bytes) => {
                                // Validate field size before processing
                                if bytes.len() > MAX_UPLOAD_SIZE {
                                    return error_response(
                                        StatusCode::PAYLOAD_TOO_LARGE,
                                        "File size exceeds limit",
                                    );
                                }
                                payload = Some((filename, bytes.to_vec()));
                            }
                            Err(_) => {
                                return error_response(
                                    StatusCode::BAD_REQUEST,
                                    "Failed to read file field",
                                );
                            }
                        }
                    }
                    "token" => match field.text().await {
                        Ok(text) => {
                            if text.len() > MAX_TOKEN_FIELD_SIZE {
                                return error_response(
                                    StatusCode::PAYLOAD_TOO_LARGE,
                                    "Token field size exceeds limit",
                                );
                            }
                            form_token = Some(text);
                        }
                        Err(_) => {
                            return error_response(
                                StatusCode::BAD_REQUEST,
                                "Failed to read token field",
                            );
                        }
                    },
                    _ => {} // Ignore unknown fields
                }
            }
            Ok(None) => break, // No more fields
            Err(_) => {
                return error_response(StatusCode::BAD_REQUEST, "Malformed multipart body");
            }
        }
    }

    // The shared secret may arrive as a header or a form field
    if let Some(expected) = &state.upload_token {
        let presented = headers
            .get("x-upload-token")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .or(form_token);
        if presented.as_deref() != Some(expected.as_str()) {
            tracing::warn!("upload rejected: missing or invalid token");
            return error_response(StatusCode::UNAUTHORIZED, "Unauthorized");
        }
    }

    let Some((filename, content)) = payload else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "No file posted (field name: file)",
        );
    };

    if let Err(err) = validate_upload(filename.as_deref(), &content) {
        tracing::warn!("upload rejected: {err}");
        return error_response(StatusCode::BAD_REQUEST, &err.to_string());
    }

    if let Err(err) = replace_source(&state, &content).await {
        tracing::error!("failed to replace source workbook: {err}");
        return error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to replace source file",
        );
    }

    let replaced = state.data_path.file_name().map_or_else(
        || state.data_path.display().to_string(),
        |name| name.to_string_lossy().to_string(),
    );
    tracing::info!("source workbook replaced ({} bytes) as {replaced}", content.len());
    Json(serde_json::json!({
        "ok": true,
        "message": format!("Replaced {replaced}"),
    }))
    .into_response()
}

/// Atomically replace the source workbook: write to a temp file in the
/// same directory, then rename over the target.
async fn replace_source(state: &AppState, content: &[u8]) -> anyhow::Result<()> {
    let dir = state
        .data_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let _guard = state.source_lock.write().await;
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content)?;
    temp.persist(&state.data_path)?;
    Ok(())
}
