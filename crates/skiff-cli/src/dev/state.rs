//! Shared state for the development server.
//!
//! Built once at startup and only read per request: the dispatcher handle,
//! the public-asset index, and the directory assets are served from.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use skiff_runtime::{Dispatcher, PublicAssetIndex};

/// Immutable per-server state shared across request tasks.
pub struct DevServerState {
    dispatcher: Arc<dyn Dispatcher>,
    assets: PublicAssetIndex,
    public_dir: PathBuf,
}

pub type SharedState = Arc<DevServerState>;

impl DevServerState {
    /// Index the public directory and wire up the dispatcher.
    ///
    /// A missing public directory is not an error: the index stays empty and
    /// every request goes to the dispatcher.
    pub fn new(dispatcher: Arc<dyn Dispatcher>, public_dir: PathBuf) -> Self {
        let mut assets = PublicAssetIndex::new();
        index_dir(&public_dir, Path::new("/"), &mut assets);

        if assets.is_empty() {
            tracing::debug!(dir = %public_dir.display(), "no public assets indexed");
        }

        Self {
            dispatcher,
            assets,
            public_dir,
        }
    }

    pub fn dispatcher(&self) -> &dyn Dispatcher {
        self.dispatcher.as_ref()
    }

    pub fn assets(&self) -> &PublicAssetIndex {
        &self.assets
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }
}

/// Register every file under `dir` at its URL path below `prefix`.
fn index_dir(dir: &Path, prefix: &Path, assets: &mut PublicAssetIndex) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let url = prefix.join(entry.file_name());
        if path.is_dir() {
            index_dir(&path, &url, assets);
        } else {
            assets.add_path(url.to_string_lossy().into_owned());
        }
    }
}
