//! Development server module.
//!
//! A long-running server adapter: axum accepts native requests, the shared
//! normalization routine produces the canonical dispatch, and public assets
//! are served straight from disk without touching the dispatcher.

pub mod dispatcher;
pub mod server;
pub mod state;

// Re-exports
pub use dispatcher::DemoDispatcher;
pub use server::{DevConfig, DevServer};
pub use state::{DevServerState, SharedState};
