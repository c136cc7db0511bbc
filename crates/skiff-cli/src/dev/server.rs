//! Development server: the long-running server entry adapter.
//!
//! Unlike the edge and serverless targets, in dev the host platform is this
//! process itself, so the "no response" marker from the shared adapter
//! routine turns into serving the public asset straight from disk.

use std::net::SocketAddr;

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use bytes::Bytes;
use http::header::HeaderMap;
use http::Method;
use skiff_runtime::{handle_entry, AdapterError, CanonicalResponse, NativeRequest};
use tower_http::cors::{Any, CorsLayer};

use crate::dev::SharedState;
use crate::error::{CliError, Result};
use crate::ui;

/// Development server configuration.
#[derive(Debug, Clone)]
pub struct DevConfig {
    pub addr: SocketAddr,
}

/// Development server.
pub struct DevServer {
    config: DevConfig,
    state: SharedState,
}

impl DevServer {
    pub fn new(config: DevConfig, state: SharedState) -> Self {
        Self { config, state }
    }

    /// Bind and serve until the process is stopped.
    ///
    /// # Errors
    ///
    /// Returns an error if the server cannot bind to the configured address.
    pub async fn start(self) -> Result<()> {
        let addr = self.config.addr;
        let app = build_router(self.state);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| CliError::Server(format!("Failed to bind to {addr}: {e}")))?;

        ui::success(&format!("Development server running at http://{addr}"));

        axum::serve(listener, app)
            .await
            .map_err(|e| CliError::Server(format!("Server error: {e}")))?;

        Ok(())
    }
}

/// Build the axum router: every route goes through the entry adapter, CORS
/// open for dev.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .fallback(handle_request)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// One inbound request: adapter first, disk second.
async fn handle_request(
    State(state): State<SharedState>,
    request: axum::extract::Request,
) -> Response {
    let native = ServerView::new(request);
    let path = native.path.clone();

    match handle_entry(native, state.dispatcher(), state.assets()).await {
        Ok(Some(response)) => into_native(response),
        Ok(None) => serve_public_asset(&state, &path).await,
        Err(err) => {
            // Request-scoped failure: log and answer this one request with
            // an error, leave the server running.
            tracing::warn!(path = %path, error = %err, "request failed");
            let status = match err {
                AdapterError::InvalidUrl { .. } | AdapterError::InvalidPart { .. } => {
                    StatusCode::BAD_REQUEST
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, err.to_string()).into_response()
        }
    }
}

/// Canonical response to axum response: representation only.
fn into_native(response: CanonicalResponse) -> Response {
    let mut native = Response::new(Body::from(response.body));
    *native.status_mut() = response.status;
    *native.headers_mut() = response.headers;
    native
}

/// The host serves the asset itself in dev.
async fn serve_public_asset(state: &SharedState, path: &str) -> Response {
    let file_path = state.public_dir().join(path.trim_start_matches('/'));

    match tokio::fs::read(&file_path).await {
        Ok(content) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type_for(path))
            .header(header::CACHE_CONTROL, "no-cache")
            .body(Body::from(content))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()),
        Err(e) => {
            tracing::warn!(path = %file_path.display(), error = %e, "indexed asset unreadable");
            (StatusCode::NOT_FOUND, format!("Asset not found: {path}")).into_response()
        }
    }
}

/// Native view over an axum request.
///
/// The dev server speaks plain HTTP, so the connection is never secure and
/// no forwarded-proto header gets synthesized.
struct ServerView {
    method: Method,
    path: String,
    query: Option<String>,
    host: String,
    headers: HeaderMap,
    body: Option<Body>,
}

impl ServerView {
    fn new(request: axum::extract::Request) -> Self {
        let (parts, body) = request.into_parts();
        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .map(strip_port)
            .unwrap_or("localhost")
            .to_string();

        Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            host,
            headers: parts.headers,
            body: Some(body),
        }
    }
}

fn strip_port(host: &str) -> &str {
    // "[::1]:3000" keeps its brackets, "localhost:3000" drops the port
    if host.starts_with('[') {
        match host.find(']') {
            Some(end) => &host[..=end],
            // unclosed bracket: pass the raw value through
            None => host,
        }
    } else {
        host.split(':').next().unwrap_or(host)
    }
}

#[async_trait]
impl NativeRequest for ServerView {
    fn method(&self) -> Method {
        self.method.clone()
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn secure(&self) -> bool {
        false
    }

    fn headers(&self) -> HeaderMap {
        self.headers.clone()
    }

    async fn read_body(&mut self) -> skiff_runtime::Result<Option<Bytes>> {
        let Some(body) = self.body.take() else {
            return Ok(None);
        };

        let bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(|e| AdapterError::BodyRead(e.to_string()))?;

        Ok((!bytes.is_empty()).then_some(bytes))
    }
}

/// Content type from file extension, for assets served off disk.
fn content_type_for(path: &str) -> &'static str {
    let extension = std::path::Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");

    match extension {
        "html" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript",
        "json" | "map" => "application/json",
        "css" => "text/css",
        "wasm" => "application/wasm",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}
