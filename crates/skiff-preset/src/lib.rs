pub mod error;
pub mod merge;
pub mod plan;
pub mod preset;
pub mod registry;
pub mod template;

// Re-export main types
pub use error::{PresetError, Result};
pub use merge::{PresetHook, resolve_definition};
pub use plan::{BuildPlan, ResolvedOutput};
pub use preset::{AdapterKind, ExternalsPolicy, OutputPaths, PresetDefinition, PresetMeta};
pub use registry::{PresetEntry, PresetRegistry};
pub use template::{KNOWN_TOKENS, ResolveContext, resolve_template};
