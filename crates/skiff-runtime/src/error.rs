//! Error types for the adapter layer.
//!
//! Adapter errors are request-scoped: a malformed URL or a body read failure
//! rejects that one dispatch and leaves the adapter (and every concurrent
//! request) untouched. Dispatcher errors pass through opaque.

use thiserror::Error;

pub type Result<T, E = AdapterError> = std::result::Result<T, E>;

/// A dispatch rejected by the application pipeline.
///
/// Opaque to the adapter layer: adapters never interpret or retry it, they
/// only propagate it to the platform's error representation.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct DispatchError(pub String);

/// Request normalization failures inside an entry adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The native request's URL could not be parsed into path/host/protocol.
    #[error("malformed request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The native request carried a method or header the canonical model
    /// cannot represent.
    #[error("invalid request {part}: {reason}")]
    InvalidPart { part: &'static str, reason: String },

    /// The native body stream failed mid-read (e.g. connection reset).
    /// Retryable at the platform level; never swallowed here.
    #[error("failed to read request body: {0}")]
    BodyRead(String),

    /// The dispatcher rejected the request. Passed through unmodified.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
