//! The dispatch contract between entry adapters and the application
//! pipeline.
//!
//! Adapters make exactly one outbound call per request:
//! `local_fetch(path_with_query, options)`. The dispatcher owns routing,
//! application logic, and its own caches; this crate only defines the seam.

use async_trait::async_trait;
use bytes::Bytes;
use http::header::HeaderMap;
use http::Method;

use crate::error::DispatchError;
use crate::request::Protocol;
use crate::response::CanonicalResponse;

/// How the application pipeline should treat redirects, mirroring the
/// fetch-style request modes platforms hand us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedirectPolicy {
    /// Follow redirects inside the pipeline.
    Follow,
    /// Return redirect responses to the caller untouched.
    #[default]
    Manual,
    /// Treat a redirect response as a dispatch failure.
    Error,
}

/// Canonical-request option bag for one dispatch call.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    pub host: String,
    pub protocol: Protocol,
    pub headers: HeaderMap,
    pub method: Method,
    pub redirect: RedirectPolicy,
    /// Fully materialized body, or absent. Never a stream handle.
    pub body: Option<Bytes>,
}

/// The internal application pipeline.
///
/// Implementations may hold process-wide caches (route tables, asset
/// indexes); they are responsible for their own synchronization. The adapter
/// layer only issues independent calls against a shared reference.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Handle one canonical request.
    ///
    /// `path_with_query` is the origin-form path plus the original query
    /// string, exactly as the platform delivered it.
    async fn local_fetch(
        &self,
        path_with_query: &str,
        options: DispatchOptions,
    ) -> Result<CanonicalResponse, DispatchError>;
}
