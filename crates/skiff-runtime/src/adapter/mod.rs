//! Entry adapters: bridge platform-native request/response contracts to the
//! canonical dispatch call.
//!
//! Normalization is written once, in [`handle_entry`], and parameterized
//! over a narrow per-platform capability set ([`NativeRequest`]). Each
//! platform module only parses its native type into that seam and translates
//! the canonical response back out, so adapters cannot drift apart.

pub mod event;
pub mod fetch;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::HeaderMap;
use http::Method;

use crate::assets::AssetResolver;
use crate::dispatch::{DispatchOptions, Dispatcher, RedirectPolicy};
use crate::error::Result;
use crate::request::{ensure_forwarded_proto, Protocol};
use crate::response::CanonicalResponse;

/// Per-platform view of an inbound request.
///
/// Implementations are cheap accessors over the native type; all policy
/// lives in [`handle_entry`]. `read_body` is only called after the asset
/// short-circuit has passed, and at most once.
#[async_trait]
pub trait NativeRequest: Send {
    fn method(&self) -> Method;

    /// Origin-form path, no query string.
    fn path(&self) -> &str;

    /// Raw query string, without the `?`.
    fn query(&self) -> Option<&str>;

    fn host(&self) -> &str;

    /// Whether the connection (or the platform in front of it) is TLS.
    fn secure(&self) -> bool;

    fn headers(&self) -> HeaderMap;

    fn redirect(&self) -> RedirectPolicy {
        RedirectPolicy::default()
    }

    /// Fully buffer the native body, if one was declared.
    ///
    /// # Errors
    ///
    /// A stream failure mid-read maps to [`AdapterError::BodyRead`] and
    /// rejects this one request.
    ///
    /// [`AdapterError::BodyRead`]: crate::error::AdapterError::BodyRead
    async fn read_body(&mut self) -> Result<Option<Bytes>>;
}

/// The one normalization routine every entry adapter runs.
///
/// In order:
/// 1. asset short-circuit - `Ok(None)` means the host serves the path
///    itself; the body is never read and the dispatcher is never called
/// 2. additive `x-forwarded-proto: https` for secure connections
/// 3. body materialization (the dispatcher contract takes bytes, not a
///    stream; buffering trades memory for one uniform contract)
/// 4. the single dispatch call
///
/// All per-request state lives in locals here; nothing is shared or retained
/// across invocations.
pub async fn handle_entry<N, D, A>(
    mut native: N,
    dispatcher: &D,
    assets: &A,
) -> Result<Option<CanonicalResponse>>
where
    N: NativeRequest,
    D: Dispatcher + ?Sized,
    A: AssetResolver + ?Sized,
{
    if assets.is_public_asset_url(native.path()) {
        tracing::trace!(path = native.path(), "public asset, skipping dispatch");
        return Ok(None);
    }

    let secure = native.secure();
    let mut headers = native.headers();
    ensure_forwarded_proto(&mut headers, secure);

    let path_with_query = match native.query() {
        Some(query) => format!("{}?{}", native.path(), query),
        None => native.path().to_string(),
    };

    let options = DispatchOptions {
        host: native.host().to_string(),
        protocol: Protocol::from_secure(secure),
        method: native.method(),
        redirect: native.redirect(),
        headers,
        body: native.read_body().await?,
    };

    let response = dispatcher.local_fetch(&path_with_query, options).await?;
    Ok(Some(response))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::assets::{NoPublicAssets, PublicAssetIndex};
    use crate::error::{AdapterError, DispatchError};
    use http::header::HeaderValue;
    use http::StatusCode;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Dispatcher double that records the last call and counts invocations.
    #[derive(Default)]
    pub(crate) struct RecordingDispatcher {
        pub calls: AtomicUsize,
        pub last: Mutex<Option<(String, DispatchOptions)>>,
    }

    #[async_trait]
    impl Dispatcher for RecordingDispatcher {
        async fn local_fetch(
            &self,
            path_with_query: &str,
            options: DispatchOptions,
        ) -> Result<CanonicalResponse, DispatchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some((path_with_query.to_string(), options));

            let mut response = CanonicalResponse::status(StatusCode::OK);
            response
                .headers
                .insert("x-handled-by", HeaderValue::from_static("dispatcher"));
            response.body = Bytes::from_static(b"ok");
            Ok(response)
        }
    }

    struct TestNative {
        method: Method,
        path: String,
        query: Option<String>,
        host: String,
        secure: bool,
        headers: HeaderMap,
        body: Option<Bytes>,
        body_read: Arc<AtomicBool>,
    }

    impl TestNative {
        fn get(path: &str, query: Option<&str>) -> Self {
            Self {
                method: Method::GET,
                path: path.to_string(),
                query: query.map(str::to_string),
                host: "example.com".to_string(),
                secure: true,
                headers: HeaderMap::new(),
                body: None,
                body_read: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    #[async_trait]
    impl NativeRequest for TestNative {
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
        async fn read_body(&mut self) -> Result<Option<Bytes>> {
            self.body_read.store(true, Ordering::SeqCst);
            Ok(self.body.take())
        }
    }

    #[tokio::test]
    async fn public_asset_short_circuits_before_body_and_dispatch() {
        let dispatcher = RecordingDispatcher::default();
        let mut assets = PublicAssetIndex::new();
        assets.add_path("/favicon.ico");

        let native = TestNative::get("/favicon.ico", None);
        let body_read = native.body_read.clone();

        let result = handle_entry(native, &dispatcher, &assets).await.unwrap();

        assert!(result.is_none(), "asset path must yield the no-response marker");
        assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 0);
        assert!(!body_read.load(Ordering::SeqCst), "body must not be read");
    }

    #[tokio::test]
    async fn secure_get_dispatches_with_synthesized_proto_and_no_body() {
        let dispatcher = RecordingDispatcher::default();
        let native = TestNative::get("/api/x", Some("y=1"));

        let response = handle_entry(native, &dispatcher, &NoPublicAssets)
            .await
            .unwrap()
            .expect("non-asset path must dispatch");

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 1);

        let (path_with_query, options) = dispatcher.last.lock().unwrap().take().unwrap();
        assert_eq!(path_with_query, "/api/x?y=1");
        assert_eq!(options.headers.get("x-forwarded-proto").unwrap(), "https");
        assert_eq!(options.host, "example.com");
        assert_eq!(options.protocol, Protocol::Https);
        assert_eq!(options.method, Method::GET);
        assert!(options.body.is_none());
    }

    #[tokio::test]
    async fn existing_forwarded_proto_survives_untouched() {
        let dispatcher = RecordingDispatcher::default();
        let mut native = TestNative::get("/", None);
        native
            .headers
            .insert("x-forwarded-proto", HeaderValue::from_static("http"));

        handle_entry(native, &dispatcher, &NoPublicAssets)
            .await
            .unwrap();

        let (_, options) = dispatcher.last.lock().unwrap().take().unwrap();
        assert_eq!(options.headers.get("x-forwarded-proto").unwrap(), "http");
    }

    #[tokio::test]
    async fn insecure_connection_gets_no_proto_header() {
        let dispatcher = RecordingDispatcher::default();
        let mut native = TestNative::get("/", None);
        native.secure = false;

        handle_entry(native, &dispatcher, &NoPublicAssets)
            .await
            .unwrap();

        let (_, options) = dispatcher.last.lock().unwrap().take().unwrap();
        assert!(!options.headers.contains_key("x-forwarded-proto"));
        assert_eq!(options.protocol, Protocol::Http);
    }

    #[tokio::test]
    async fn body_reaches_dispatcher_byte_for_byte() {
        let dispatcher = RecordingDispatcher::default();
        let payload = Bytes::from_static(b"{\"answer\":42}");
        let mut native = TestNative::get("/submit", None);
        native.method = Method::POST;
        native.body = Some(payload.clone());

        handle_entry(native, &dispatcher, &NoPublicAssets)
            .await
            .unwrap();

        let (_, options) = dispatcher.last.lock().unwrap().take().unwrap();
        assert_eq!(options.body, Some(payload));
    }

    #[tokio::test]
    async fn body_read_failure_rejects_the_call() {
        struct BrokenBody(TestNative);

        #[async_trait]
        impl NativeRequest for BrokenBody {
            fn method(&self) -> Method {
                self.0.method()
            }
            fn path(&self) -> &str {
                self.0.path()
            }
            fn query(&self) -> Option<&str> {
                self.0.query()
            }
            fn host(&self) -> &str {
                self.0.host()
            }
            fn secure(&self) -> bool {
                self.0.secure()
            }
            fn headers(&self) -> HeaderMap {
                self.0.headers()
            }
            async fn read_body(&mut self) -> Result<Option<Bytes>> {
                Err(AdapterError::BodyRead("connection reset".to_string()))
            }
        }

        let dispatcher = RecordingDispatcher::default();
        let err = handle_entry(
            BrokenBody(TestNative::get("/upload", None)),
            &dispatcher,
            &NoPublicAssets,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AdapterError::BodyRead(_)));
        assert_eq!(dispatcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn dispatcher_errors_pass_through_opaque() {
        struct FailingDispatcher;

        #[async_trait]
        impl Dispatcher for FailingDispatcher {
            async fn local_fetch(
                &self,
                _path_with_query: &str,
                _options: DispatchOptions,
            ) -> Result<CanonicalResponse, DispatchError> {
                Err(DispatchError("route panicked".to_string()))
            }
        }

        let err = handle_entry(TestNative::get("/", None), &FailingDispatcher, &NoPublicAssets)
            .await
            .unwrap_err();

        match err {
            AdapterError::Dispatch(inner) => assert_eq!(inner.0, "route panicked"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
