//! Resolved build plans.
//!
//! A [`BuildPlan`] is what the bundler consumes: one fully resolved artifact
//! description with no placeholder left in any path.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::preset::{AdapterKind, ExternalsPolicy};

/// Final build plan for one artifact of a target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPlan {
    /// Preset this plan was resolved from.
    pub preset: String,

    /// Entry adapter source module.
    pub entry: String,

    /// Entry adapter flavor to build around.
    pub adapter: AdapterKind,

    /// Resolved output layout.
    pub output: ResolvedOutput,

    pub externals: ExternalsPolicy,

    pub inline_dynamic_imports: bool,

    pub source_map: bool,
}

/// Output directories with every placeholder substituted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOutput {
    pub dir: PathBuf,
    pub server_dir: PathBuf,
    pub public_dir: PathBuf,
}
