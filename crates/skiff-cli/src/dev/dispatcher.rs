//! Stand-in dispatcher for the development server.
//!
//! The real application pipeline is a separate concern; in dev, this
//! dispatcher echoes the canonical request back as JSON so adapter behavior
//! is observable, and serves keyed server assets from storage under
//! `/files`.

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use skiff_runtime::{
    CanonicalRequest, CanonicalResponse, DispatchError, DispatchOptions, Dispatcher,
    MemoryStorage, Storage,
};

pub struct DemoDispatcher {
    storage: MemoryStorage,
}

impl DemoDispatcher {
    pub fn new() -> Self {
        let mut storage = MemoryStorage::new();
        storage.insert(
            "assets/files/index.html",
            &b"<!DOCTYPE html><h1>skiff dev</h1>"[..],
        );
        Self { storage }
    }

    pub fn with_storage(storage: MemoryStorage) -> Self {
        Self { storage }
    }
}

impl Default for DemoDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Dispatcher for DemoDispatcher {
    async fn local_fetch(
        &self,
        path_with_query: &str,
        options: DispatchOptions,
    ) -> Result<CanonicalResponse, DispatchError> {
        let request = CanonicalRequest::from_dispatch(path_with_query, options);

        if request.path == "/files" {
            return Ok(self.serve_stored_file(&request));
        }

        let echo = serde_json::json!({
            "method": request.method.as_str(),
            "path": request.path,
            "query": request.query,
            "host": request.host,
            "protocol": request.protocol.as_str(),
            "forwardedProto": request
                .headers
                .get("x-forwarded-proto")
                .and_then(|value| value.to_str().ok()),
            "bodyLength": request.body.as_ref().map(Bytes::len),
        });

        let body = serde_json::to_vec(&echo)
            .map_err(|e| DispatchError(format!("echo serialization failed: {e}")))?;

        let mut response = CanonicalResponse::status(StatusCode::OK);
        response
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response.body = Bytes::from(body);
        Ok(response)
    }
}

impl DemoDispatcher {
    /// `/files?filename=x` reads `assets/files/x` from storage.
    fn serve_stored_file(&self, request: &CanonicalRequest) -> CanonicalResponse {
        let filename = request
            .query
            .as_deref()
            .and_then(|query| {
                query
                    .split('&')
                    .find_map(|pair| pair.strip_prefix("filename="))
            })
            .unwrap_or("index.html");

        match self.storage.get_item(&format!("assets/files/{filename}")) {
            Some(content) => {
                let mut response = CanonicalResponse::status(StatusCode::OK);
                response.body = content;
                response
            }
            None => CanonicalResponse::status(StatusCode::NOT_FOUND),
        }
    }
}
