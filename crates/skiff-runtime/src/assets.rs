//! Public-asset resolution.
//!
//! Before any body is read or any dispatch happens, adapters ask whether the
//! request path names a static public asset the host platform should serve
//! itself. The check is pure and synchronous.

use std::collections::BTreeSet;

/// Declares whether a request path names a public asset.
///
/// Failure mode is fail-closed: an implementation that cannot answer (index
/// unavailable, backing store error) must return `false` so the request
/// proceeds to the dispatcher instead of being dropped.
pub trait AssetResolver: Send + Sync {
    /// `true` if the host should serve `path` directly, bypassing the
    /// dispatcher.
    fn is_public_asset_url(&self, path: &str) -> bool;
}

/// Never short-circuits; every request reaches the dispatcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPublicAssets;

impl AssetResolver for NoPublicAssets {
    fn is_public_asset_url(&self, _path: &str) -> bool {
        false
    }
}

/// Path index over a target's public-assets directory.
///
/// Built once at startup from the resolved `publicDir` contents (or any
/// other enumeration of served paths) and read concurrently afterwards.
#[derive(Debug, Clone, Default)]
pub struct PublicAssetIndex {
    exact: BTreeSet<String>,
    prefixes: Vec<String>,
}

impl PublicAssetIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one servable path, e.g. `/favicon.ico`.
    pub fn add_path(&mut self, path: impl Into<String>) {
        self.exact.insert(normalize(path.into()));
    }

    /// Register a directory prefix, e.g. `/assets/`. Every path beneath it
    /// is treated as public.
    pub fn add_prefix(&mut self, prefix: impl Into<String>) {
        let mut prefix = normalize(prefix.into());
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        self.prefixes.push(prefix);
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.prefixes.is_empty()
    }
}

fn normalize(path: String) -> String {
    if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    }
}

impl AssetResolver for PublicAssetIndex {
    fn is_public_asset_url(&self, path: &str) -> bool {
        self.exact.contains(path) || self.prefixes.iter().any(|prefix| path.starts_with(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_paths_match() {
        let mut index = PublicAssetIndex::new();
        index.add_path("/favicon.ico");
        assert!(index.is_public_asset_url("/favicon.ico"));
        assert!(!index.is_public_asset_url("/favicon.png"));
    }

    #[test]
    fn prefixes_match_everything_beneath() {
        let mut index = PublicAssetIndex::new();
        index.add_prefix("/assets");
        assert!(index.is_public_asset_url("/assets/logo.svg"));
        assert!(index.is_public_asset_url("/assets/fonts/mono.woff2"));
        // the directory itself is not a file
        assert!(!index.is_public_asset_url("/assets"));
        assert!(!index.is_public_asset_url("/assetstore/item"));
    }

    #[test]
    fn paths_are_normalized_to_leading_slash() {
        let mut index = PublicAssetIndex::new();
        index.add_path("robots.txt");
        assert!(index.is_public_asset_url("/robots.txt"));
    }

    #[test]
    fn empty_index_never_matches() {
        assert!(!PublicAssetIndex::new().is_public_asset_url("/anything"));
        assert!(!NoPublicAssets.is_public_asset_url("/anything"));
    }
}
