//! Canonical response model.

use bytes::Bytes;
use http::header::HeaderMap;
use http::StatusCode;

/// Response shape returned by the dispatcher.
///
/// The adapter layer passes it through untouched; translation back to a
/// platform-native response changes representation only, never status,
/// headers, or body.
#[derive(Debug, Clone)]
pub struct CanonicalResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CanonicalResponse {
    /// Empty-body response with the given status.
    pub fn status(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }
}
