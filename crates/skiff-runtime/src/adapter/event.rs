//! Buffered-event entry adapter for serverless function runtimes.
//!
//! These platforms deliver the request as one JSON document (method, path,
//! string header map, optionally base64-encoded body) and expect a JSON
//! document back. There is no stream to manage; the whole request is already
//! materialized when the function is invoked.

use std::collections::HashMap;

use async_trait::async_trait;
use base64::prelude::{Engine as _, BASE64_STANDARD};
use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::Method;
use serde::{Deserialize, Serialize};

use crate::assets::AssetResolver;
use crate::dispatch::{Dispatcher, RedirectPolicy};
use crate::error::{AdapterError, Result};
use crate::response::CanonicalResponse;

use super::{handle_entry, NativeRequest};

/// Inbound serverless invocation payload.
///
/// Extra platform fields are ignored on purpose: event envelopes grow
/// vendor-specific keys the adapter has no use for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub method: String,
    /// Origin-form path, no query string.
    pub path: String,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

/// Outbound serverless response payload.
///
/// Headers are multi-valued: a name may carry several values (most commonly
/// `set-cookie`) and every one must reach the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub status_code: u16,
    pub headers: HashMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub is_base64_encoded: bool,
}

impl From<CanonicalResponse> for EventResponse {
    fn from(response: CanonicalResponse) -> Self {
        let mut headers: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in response.headers.iter() {
            headers
                .entry(name.as_str().to_string())
                .or_default()
                .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
        }

        let (body, is_base64_encoded) = if response.body.is_empty() {
            (None, false)
        } else {
            match std::str::from_utf8(&response.body) {
                Ok(text) => (Some(text.to_string()), false),
                Err(_) => (Some(BASE64_STANDARD.encode(&response.body)), true),
            }
        };

        Self {
            status_code: response.status.as_u16(),
            headers,
            body,
            is_base64_encoded,
        }
    }
}

/// Entry point for buffered-event platforms.
///
/// `Ok(None)` means the path names a public asset; the platform's static
/// layer serves it and no function response is emitted.
pub async fn event_entry<D, A>(
    event: EventRequest,
    dispatcher: &D,
    assets: &A,
) -> Result<Option<EventResponse>>
where
    D: Dispatcher + ?Sized,
    A: AssetResolver + ?Sized,
{
    let view = EventView::parse(event)?;
    let response = handle_entry(view, dispatcher, assets).await?;
    Ok(response.map(EventResponse::from))
}

#[derive(Debug)]
struct EventView {
    method: Method,
    path: String,
    query: Option<String>,
    host: String,
    secure: bool,
    headers: HeaderMap,
    body: Option<String>,
    is_base64_encoded: bool,
}

impl EventView {
    fn parse(event: EventRequest) -> Result<Self> {
        let method = Method::from_bytes(event.method.as_bytes()).map_err(|e| {
            AdapterError::InvalidPart {
                part: "method",
                reason: e.to_string(),
            }
        })?;

        let mut headers = HeaderMap::with_capacity(event.headers.len());
        for (name, value) in &event.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                AdapterError::InvalidPart {
                    part: "header name",
                    reason: format!("'{name}': {e}"),
                }
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| AdapterError::InvalidPart {
                part: "header value",
                reason: format!("'{name}': {e}"),
            })?;
            headers.append(name, value);
        }

        let host = headers
            .get(http::header::HOST)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("localhost")
            .to_string();

        // The platform terminates TLS in front of the function; an explicit
        // forwarded-proto header is the only signal that says otherwise.
        let secure = headers
            .get("x-forwarded-proto")
            .map(|value| value.as_bytes() == b"https")
            .unwrap_or(true);

        Ok(Self {
            method,
            path: event.path,
            query: event.query,
            host,
            secure,
            headers,
            body: event.body,
            is_base64_encoded: event.is_base64_encoded,
        })
    }
}

#[async_trait]
impl NativeRequest for EventView {
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
        self.secure
    }

    fn headers(&self) -> HeaderMap {
        self.headers.clone()
    }

    fn redirect(&self) -> RedirectPolicy {
        RedirectPolicy::Manual
    }

    async fn read_body(&mut self) -> Result<Option<Bytes>> {
        let Some(body) = self.body.take() else {
            return Ok(None);
        };

        if self.is_base64_encoded {
            let decoded = BASE64_STANDARD
                .decode(body.as_bytes())
                .map_err(|e| AdapterError::BodyRead(format!("invalid base64 body: {e}")))?;
            Ok(Some(Bytes::from(decoded)))
        } else {
            Ok(Some(Bytes::from(body)))
        }
    }
}
