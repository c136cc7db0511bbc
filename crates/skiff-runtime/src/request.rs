//! Canonical request model.
//!
//! Every entry adapter normalizes its platform-native request into this one
//! shape before dispatch. Instances are created fresh per inbound call and
//! dropped once the native response is emitted; nothing here is shared
//! across requests.

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::Method;

use crate::dispatch::DispatchOptions;

/// Forwarded-protocol header adapters synthesize over secure connections.
pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// Connection protocol the request arrived over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    pub fn from_secure(secure: bool) -> Self {
        if secure { Protocol::Https } else { Protocol::Http }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    pub fn is_secure(&self) -> bool {
        matches!(self, Protocol::Https)
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The platform-neutral request shape presented to the dispatcher.
///
/// `body` is either absent or fully materialized; a half-consumed stream is
/// never passed through this type.
#[derive(Debug, Clone)]
pub struct CanonicalRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub host: String,
    pub protocol: Protocol,
    pub body: Option<Bytes>,
}

impl CanonicalRequest {
    /// Assemble from the dispatch call's wire form: the path-with-query
    /// string plus the option bag. Splits path and query exactly once.
    pub fn from_dispatch(path_with_query: &str, options: DispatchOptions) -> Self {
        let (path, query) = match path_with_query.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (path_with_query.to_string(), None),
        };

        Self {
            method: options.method,
            path,
            query,
            headers: options.headers,
            host: options.host,
            protocol: options.protocol,
            body: options.body,
        }
    }

    /// Path and query joined back into origin form.
    pub fn path_with_query(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }
}

/// Synthesize `x-forwarded-proto: https` for secure connections.
///
/// Additive only: an existing value, whatever it says, is authoritative
/// (an upstream proxy may have set it) and is never overwritten.
pub fn ensure_forwarded_proto(headers: &mut HeaderMap, secure: bool) {
    if secure && !headers.contains_key(X_FORWARDED_PROTO) {
        headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("https"));
    }
}
