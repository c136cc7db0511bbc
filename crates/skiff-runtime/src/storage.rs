//! Key-based storage contract.
//!
//! Used by application code running behind the dispatcher (e.g. a route
//! serving server assets by key), not by the adapter layer itself.

use std::collections::HashMap;

use bytes::Bytes;

/// Read-only key/value lookup.
pub trait Storage: Send + Sync {
    /// Value stored under `key`, or absent.
    fn get_item(&self, key: &str) -> Option<Bytes>;
}

/// In-memory storage, populated at startup.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, Bytes>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Bytes>) {
        self.items.insert(key.into(), value.into());
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<Bytes> {
        self.items.get(key).cloned()
    }
}
