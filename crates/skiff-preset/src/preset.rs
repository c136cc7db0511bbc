//! Preset definitions: declarative descriptions of one deployment target's
//! build shape.
//!
//! A [`PresetDefinition`] is pure data, created once when the registry is
//! assembled and never mutated at run time. Output paths are templates (see
//! [`crate::template`]) until the merger resolves them into a
//! [`crate::BuildPlan`].

use serde::{Deserialize, Serialize};

/// Declarative build shape for one deployment target artifact.
///
/// Unknown keys are rejected at deserialization time: a typo in a preset or
/// an override is a configuration error, not a silently ignored field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PresetDefinition {
    /// Unique identifier for the target this definition belongs to.
    pub name: String,

    /// Logical path to the entry adapter's source module.
    pub entry: String,

    /// Output path templates, holding `{{ token }}` placeholders.
    pub output: OutputPaths,

    /// Which dependencies are bundled vs. left external.
    #[serde(default)]
    pub externals: ExternalsPolicy,

    /// Flatten all dynamic imports into one file. Needed where the externals
    /// mechanism cannot resolve them at the target.
    #[serde(default)]
    pub inline_dynamic_imports: bool,

    /// Emit debug source maps.
    #[serde(default)]
    pub source_map: bool,

    /// Provenance for diagnostics. Never affects build semantics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PresetMeta>,
}

/// Output path templates for one artifact.
///
/// All three are derived from one templated root; `serverDir` and `publicDir`
/// must resolve to `dir` itself or somewhere beneath it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct OutputPaths {
    /// Root build directory.
    pub dir: String,
    /// Server-code directory.
    pub server_dir: String,
    /// Public-assets directory.
    pub public_dir: String,
}

impl OutputPaths {
    /// One template for all three directories (the dev preset shape).
    pub fn flat(template: impl Into<String>) -> Self {
        let template = template.into();
        Self {
            dir: template.clone(),
            server_dir: template.clone(),
            public_dir: template,
        }
    }

    /// `<root>`, `<root>/server`, `<root>/public`.
    pub fn standard(root: impl Into<String>) -> Self {
        let root = root.into();
        Self {
            dir: root.clone(),
            server_dir: format!("{root}/server"),
            public_dir: format!("{root}/public"),
        }
    }
}

/// Bundling policy for dependencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ExternalsPolicy {
    /// Let the bundler auto-discover externals by tracing imports.
    #[serde(default = "default_trace")]
    pub trace: bool,

    /// Module specifiers always left external.
    #[serde(default)]
    pub external: Vec<String>,

    /// Module specifiers always bundled, even when tracing would externalize
    /// them.
    #[serde(default)]
    pub inline: Vec<String>,
}

impl Default for ExternalsPolicy {
    fn default() -> Self {
        Self {
            trace: default_trace(),
            external: Vec::new(),
            inline: Vec::new(),
        }
    }
}

fn default_trace() -> bool {
    true
}

/// Where a definition was declared. Diagnostics only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PresetMeta {
    /// Module or file that declared the preset.
    pub origin: String,
}

/// Which entry adapter a target's artifact is built around.
///
/// The set of supported platforms is statically enumerable: entry selection
/// is a registry lookup, never a runtime module load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdapterKind {
    /// Fetch-style edge runtime (Cloudflare Workers, Netlify Edge).
    Fetch,
    /// Buffered JSON event runtime (serverless functions).
    Event,
    /// Long-running HTTP server (dev server, node-server).
    Server,
}

impl AdapterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterKind::Fetch => "fetch",
            AdapterKind::Event => "event",
            AdapterKind::Server => "server",
        }
    }
}
