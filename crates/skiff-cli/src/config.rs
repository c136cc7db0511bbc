//! Project configuration for the Skiff CLI.
//!
//! Layered loading via figment: built-in defaults, then skiff.config.json,
//! then `SKIFF_`-prefixed environment variables, then CLI arguments on top.
//! Preset-level overrides live in the `defaults` field and are merged by
//! skiff-preset with unknown keys rejected, not here.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format as _, Json, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// Top-level project configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkiffConfig {
    /// Deployment target built when none is passed on the command line.
    #[serde(default = "default_target")]
    pub target: String,

    /// Root directory for all build output; resolves `{{ buildDir }}`.
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,

    /// Project root; resolves `{{ rootDir }}`.
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// Global preset overrides, deep-merged into every resolved preset.
    #[serde(default)]
    pub defaults: Value,

    /// Development server settings.
    #[serde(default)]
    pub dev: DevSettings,
}

impl Default for SkiffConfig {
    fn default() -> Self {
        Self {
            target: default_target(),
            build_dir: default_build_dir(),
            root_dir: default_root_dir(),
            defaults: Value::Null,
            dev: DevSettings::default(),
        }
    }
}

/// Development server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory of static assets the dev server serves directly.
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
}

impl Default for DevSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_dir: default_public_dir(),
        }
    }
}

impl SkiffConfig {
    /// Load configuration from defaults, file, and environment.
    ///
    /// With an explicit `config_path` the file must exist; otherwise
    /// `skiff.config.json` is picked up when present and skipped when not.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()).into());
                }
                Some(path.to_path_buf())
            }
            None => {
                let default_path = Path::new("skiff.config.json");
                default_path.exists().then(|| default_path.to_path_buf())
            }
        };

        if let Some(path) = config_file {
            figment = figment.merge(Json::file(path));
        }

        // SKIFF_TARGET, SKIFF_BUILD_DIR, ...
        figment = figment.merge(Env::prefixed("SKIFF_"));

        figment.extract().map_err(|e| {
            ConfigError::InvalidValue {
                field: "configuration".to_string(),
                value: e.to_string(),
                hint: "Check skiff.config.json syntax and field types".to_string(),
            }
            .into()
        })
    }
}

fn default_target() -> String {
    "dev".to_string()
}

fn default_build_dir() -> PathBuf {
    PathBuf::from(".skiff")
}

fn default_root_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}
