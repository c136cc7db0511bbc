//! Error handling for the Skiff CLI.
//!
//! `CliError` is the top-level type commands return; domain errors convert
//! into it via `#[from]`. At the binary boundary everything becomes a miette
//! report.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Preset resolution failures (unknown target, unresolved placeholder,
    /// bad override). Fatal: the build does not proceed.
    #[error("Configuration error: {0}")]
    Preset(#[from] skiff_preset::PresetError),

    /// Request normalization failures surfaced by the dev server adapter.
    #[error("Request error: {0}")]
    Adapter(#[from] skiff_runtime::AdapterError),

    /// Config file loading errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors from file system operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors (build-plan output).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Development server errors.
    #[error("Server error: {0}")]
    Server(String),
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}\n\nHint: create skiff.config.json or pass --config <path>", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        field: String,
        value: String,
        hint: String,
    },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Convert CliError to a miette Report for terminal rendering.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Preset(e) => miette::miette!("Configuration error: {}", e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        other => miette::miette!("{}", other),
    }
}
