//! Canonical request/response model and entry adapters.
//!
//! One application, many hosting runtimes: each platform module translates
//! its native request into the canonical shape, runs the shared
//! normalization routine, makes the single dispatch call, and translates the
//! canonical response back. No state survives a request.

pub mod adapter;
pub mod assets;
pub mod dispatch;
pub mod error;
pub mod request;
pub mod response;
pub mod storage;

// Re-export main types
pub use adapter::event::{event_entry, EventRequest, EventResponse};
pub use adapter::fetch::{fetch_entry, FetchRequest, FetchResponse};
pub use adapter::{handle_entry, NativeRequest};
pub use assets::{AssetResolver, NoPublicAssets, PublicAssetIndex};
pub use dispatch::{DispatchOptions, Dispatcher, RedirectPolicy};
pub use error::{AdapterError, DispatchError, Result};
pub use request::{ensure_forwarded_proto, CanonicalRequest, Protocol, X_FORWARDED_PROTO};
pub use response::CanonicalResponse;
pub use storage::{MemoryStorage, Storage};
