//! Fetch-style entry adapter for edge runtimes (Cloudflare Workers, Netlify
//! Edge Functions).
//!
//! The native contract is a fetch `Request`/`Response` pair: an absolute URL,
//! header map, optional buffered body, and a redirect mode. Returning no
//! response tells the edge host to fall through to its own asset serving.

use async_trait::async_trait;
use bytes::Bytes;
use http::header::HeaderMap;
use http::{Method, StatusCode, Uri};

use crate::assets::AssetResolver;
use crate::dispatch::{Dispatcher, RedirectPolicy};
use crate::error::{AdapterError, Result};
use crate::response::CanonicalResponse;

use super::{handle_entry, NativeRequest};

/// Fetch-API-shaped inbound request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Absolute request URL, e.g. `https://example.com/api/x?y=1`.
    pub url: String,
    pub method: Method,
    pub headers: HeaderMap,
    pub redirect: RedirectPolicy,
    /// Body as delivered by the platform, already buffered.
    pub body: Option<Bytes>,
}

/// Fetch-API-shaped outbound response.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl From<CanonicalResponse> for FetchResponse {
    fn from(response: CanonicalResponse) -> Self {
        Self {
            status: response.status,
            headers: response.headers,
            body: response.body,
        }
    }
}

/// Entry point for fetch-style platforms.
///
/// `Ok(None)` is the "no response" marker: the path names a public asset and
/// the host serves it itself.
///
/// # Errors
///
/// [`AdapterError::InvalidUrl`] for URLs that do not parse as absolute;
/// dispatcher rejections pass through as [`AdapterError::Dispatch`].
pub async fn fetch_entry<D, A>(
    request: FetchRequest,
    dispatcher: &D,
    assets: &A,
) -> Result<Option<FetchResponse>>
where
    D: Dispatcher + ?Sized,
    A: AssetResolver + ?Sized,
{
    let view = FetchView::parse(request)?;
    let response = handle_entry(view, dispatcher, assets).await?;
    Ok(response.map(FetchResponse::from))
}

/// Parsed view over a [`FetchRequest`], the [`NativeRequest`] seam.
struct FetchView {
    method: Method,
    path: String,
    query: Option<String>,
    host: String,
    secure: bool,
    headers: HeaderMap,
    redirect: RedirectPolicy,
    body: Option<Bytes>,
}

impl FetchView {
    fn parse(request: FetchRequest) -> Result<Self> {
        let invalid = |reason: &str| AdapterError::InvalidUrl {
            url: request.url.clone(),
            reason: reason.to_string(),
        };

        let uri: Uri = request
            .url
            .parse()
            .map_err(|e: http::uri::InvalidUri| AdapterError::InvalidUrl {
                url: request.url.clone(),
                reason: e.to_string(),
            })?;

        let scheme = uri.scheme_str().ok_or_else(|| invalid("missing scheme"))?;
        let secure = scheme == "https";
        let host = uri
            .host()
            .ok_or_else(|| invalid("missing host"))?
            .to_string();

        Ok(Self {
            method: request.method,
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            host,
            secure,
            headers: request.headers,
            redirect: request.redirect,
            body: request.body,
        })
    }
}

#[async_trait]
impl NativeRequest for FetchView {
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
        self.redirect
    }

    async fn read_body(&mut self) -> Result<Option<Bytes>> {
        Ok(self.body.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::tests::RecordingDispatcher;
    use crate::assets::{NoPublicAssets, PublicAssetIndex};
    use crate::request::Protocol;
    use http::header::HeaderValue;
    use std::sync::atomic::Ordering;

    fn get(url: &str) -> FetchRequest {
        FetchRequest {
            url: url.to_string(),
            method: Method::GET,
            headers: HeaderMap::new(),
            redirect: RedirectPolicy::Manual,
            body: None,
        }
    }

    #[tokio::test]
    async fn url_parts_become_canonical_fields() {
        let dispatcher = RecordingDispatcher::default();
        fetch_entry(get("https://example.com/api/x?y=1"), &dispatcher, &NoPublicAssets)
            .await
            .unwrap();

        let (path_with_query, options) = dispatcher.last.lock().unwrap().take().unwrap();
        assert_eq!(path_with_query, "/api/x?y=1");
        assert_eq!(options.host, "example.com");
        assert_eq!(options.protocol, Protocol::Https);
        assert_eq!(options.headers.get("x-forwarded-proto").unwrap(), "https");
    }

    #[tokio::test]
    async fn http_scheme_is_not_secure() {
        let dispatcher = RecordingDispatcher::default();
        fetch_entry(get("http://internal.test/health"), &dispatcher, &NoPublicAssets)
            .await
            .unwrap();

        let (_, options) = dispatcher.last.lock().unwrap().take().unwrap();
        assert_eq!(options.protocol, Protocol::Http);
        assert!(!options.headers.contains_key("x-forwarded-proto"));
    }

    #[tokio::test]
    async fn asset_paths_return_the_no_response_marker() {
        let dispatcher = RecordingDispatcher::default();
        let mut assets = PublicAssetIndex::new();
        assets.add_path("/favicon.ico");

        let result = fetch_entry(get("https://example.com/favicon.ico"), &dispatcher, &assets)
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn relative_urls_are_rejected_without_crashing() {
        let dispatcher = RecordingDispatcher::default();
        let err = fetch_entry(get("/just/a/path"), &dispatcher, &NoPublicAssets)
            .await
            .unwrap_err();

        assert!(matches!(err, AdapterError::InvalidUrl { .. }));
        assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn response_round_trips_status_headers_and_body() {
        let dispatcher = RecordingDispatcher::default();
        let response = fetch_entry(get("https://example.com/"), &dispatcher, &NoPublicAssets)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.headers.get("x-handled-by"),
            Some(&HeaderValue::from_static("dispatcher"))
        );
        assert_eq!(response.body, Bytes::from_static(b"ok"));
    }

    #[tokio::test]
    async fn request_body_is_forwarded_exactly() {
        let dispatcher = RecordingDispatcher::default();
        let mut request = get("https://example.com/submit");
        request.method = Method::POST;
        request.body = Some(Bytes::from_static(b"\x00\x01binary\xff"));

        fetch_entry(request, &dispatcher, &NoPublicAssets)
            .await
            .unwrap();

        let (_, options) = dispatcher.last.lock().unwrap().take().unwrap();
        assert_eq!(options.body, Some(Bytes::from_static(b"\x00\x01binary\xff")));
    }
}
