//! Error types for preset resolution.
//!
//! Every variant that concerns a single preset names the offending preset
//! (and the output key where one applies) so build failures point at the
//! exact piece of configuration to fix. Nothing here is ever silently
//! defaulted away.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PresetError>;

#[derive(Debug, Error)]
pub enum PresetError {
    /// No preset registered under the requested target name.
    #[error("unknown deployment target: '{0}'\n\nHint: run 'skiff presets' to list registered targets")]
    UnknownTarget(String),

    /// A known placeholder token has no value in the resolve context.
    #[error("preset '{preset}': unresolved placeholder '{{{{ {token} }}}}' in output.{key}\n\nHint: provide a value for '{token}' in the resolve context")]
    UnresolvedPlaceholder {
        preset: String,
        key: String,
        token: String,
    },

    /// A template names a token that is not part of the placeholder
    /// vocabulary at all. Unknown tokens never pass through unresolved.
    #[error("preset '{preset}': unknown placeholder token '{token}' in output.{key}\n\nHint: known tokens are {known}", known = crate::template::known_tokens_list())]
    UnknownToken {
        preset: String,
        key: String,
        token: String,
    },

    /// A template contains `{{` without a matching `}}`.
    #[error("preset '{preset}': malformed template in output.{key}: '{template}'")]
    MalformedTemplate {
        preset: String,
        key: String,
        template: String,
    },

    /// Two output paths resolved into an inconsistent layout.
    #[error("preset '{preset}': conflicting output paths: output.{key} resolves to '{path}', which is outside output.dir '{dir}'")]
    ConflictingOutput {
        preset: String,
        key: String,
        path: String,
        dir: String,
    },

    /// Global defaults could not be merged into the preset definition.
    /// Unknown option keys are rejected here rather than ignored.
    #[error("preset '{preset}': invalid configuration override: {message}")]
    InvalidOverride { preset: String, message: String },

    /// The global defaults value was not a JSON object.
    #[error("invalid global defaults: {0}")]
    InvalidDefaults(String),

    /// A post-processing hook rejected the plan.
    #[error("preset '{preset}': hook failed: {message}")]
    Hook { preset: String, message: String },
}
