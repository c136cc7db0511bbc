//! Explicit registry mapping target names to preset definitions.
//!
//! Entry selection is a static lookup: every supported target is registered
//! up front with its definition, adapter kind, and optional hook, so the set
//! of platforms is enumerable and testable without any runtime module
//! loading. A target may contribute more than one artifact.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{PresetError, Result};
use crate::merge::{PresetHook, resolve_definition};
use crate::plan::BuildPlan;
use crate::preset::{AdapterKind, ExternalsPolicy, OutputPaths, PresetDefinition, PresetMeta};
use crate::template::ResolveContext;

/// One registered artifact: a definition plus how it becomes runnable.
#[derive(Clone)]
pub struct PresetEntry {
    pub definition: PresetDefinition,
    pub adapter: AdapterKind,
    pub hook: Option<PresetHook>,
}

impl std::fmt::Debug for PresetEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresetEntry")
            .field("definition", &self.definition)
            .field("adapter", &self.adapter)
            .field("hook", &self.hook.map(|_| "fn"))
            .finish()
    }
}

/// Registry of deployment targets.
#[derive(Debug, Default)]
pub struct PresetRegistry {
    targets: BTreeMap<String, Vec<PresetEntry>>,
}

impl PresetRegistry {
    /// Empty registry, for callers assembling their own target set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in target.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for entry in builtin_entries() {
            registry.register(entry);
        }
        registry
    }

    /// Register one artifact. Entries registered under the same name
    /// accumulate in registration order.
    pub fn register(&mut self, entry: PresetEntry) {
        self.targets
            .entry(entry.definition.name.clone())
            .or_default()
            .push(entry);
    }

    /// Entries contributing to a target, in registration order.
    pub fn get(&self, target: &str) -> Option<&[PresetEntry]> {
        self.targets.get(target).map(Vec::as_slice)
    }

    /// Registered target names, sorted.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    /// Resolve a target into its build plans.
    ///
    /// This is the single entry point the build step consumes: it merges
    /// `defaults` into each definition, substitutes all path templates
    /// against `ctx`, and runs each entry's hook once.
    ///
    /// # Errors
    ///
    /// [`PresetError::UnknownTarget`] if the name is not registered, plus
    /// every merge/template failure from [`resolve_definition`].
    pub fn resolve(
        &self,
        target: &str,
        ctx: &ResolveContext,
        defaults: &Value,
    ) -> Result<Vec<BuildPlan>> {
        let entries = self
            .get(target)
            .ok_or_else(|| PresetError::UnknownTarget(target.to_string()))?;

        tracing::debug!(target, artifacts = entries.len(), "resolving target");

        entries
            .iter()
            .map(|entry| {
                resolve_definition(&entry.definition, entry.adapter, entry.hook, ctx, defaults)
            })
            .collect()
    }
}

/// Built-in deployment targets.
fn builtin_entries() -> Vec<PresetEntry> {
    vec![
        // Local dev server: one flat output directory, everything inlined so
        // the watcher rebuild stays a single file.
        PresetEntry {
            definition: PresetDefinition {
                name: "dev".to_string(),
                entry: "./runtime/dev".to_string(),
                output: OutputPaths::flat("{{ buildDir }}/dev"),
                externals: ExternalsPolicy {
                    trace: false,
                    ..Default::default()
                },
                inline_dynamic_imports: true,
                source_map: true,
                meta: builtin_meta(),
            },
            adapter: AdapterKind::Server,
            hook: None,
        },
        PresetEntry {
            definition: PresetDefinition {
                name: "node-server".to_string(),
                entry: "./runtime/node-server".to_string(),
                output: OutputPaths::standard("{{ buildDir }}/{{ preset }}"),
                externals: ExternalsPolicy::default(),
                inline_dynamic_imports: false,
                source_map: false,
                meta: builtin_meta(),
            },
            adapter: AdapterKind::Server,
            hook: None,
        },
        PresetEntry {
            definition: PresetDefinition {
                name: "cloudflare-workers".to_string(),
                entry: "./runtime/cloudflare-workers".to_string(),
                output: OutputPaths::standard("{{ buildDir }}/{{ preset }}"),
                externals: ExternalsPolicy {
                    trace: false,
                    ..Default::default()
                },
                inline_dynamic_imports: false,
                source_map: true,
                meta: builtin_meta(),
            },
            adapter: AdapterKind::Fetch,
            hook: Some(inline_when_untraced),
        },
        PresetEntry {
            definition: PresetDefinition {
                name: "netlify-edge".to_string(),
                entry: "./runtime/netlify-edge".to_string(),
                output: OutputPaths::standard("{{ buildDir }}/{{ preset }}"),
                externals: ExternalsPolicy {
                    trace: false,
                    ..Default::default()
                },
                inline_dynamic_imports: true,
                source_map: true,
                meta: builtin_meta(),
            },
            adapter: AdapterKind::Fetch,
            hook: None,
        },
        PresetEntry {
            definition: PresetDefinition {
                name: "vercel-serverless".to_string(),
                entry: "./runtime/vercel-serverless".to_string(),
                output: OutputPaths::standard("{{ buildDir }}/{{ preset }}"),
                externals: ExternalsPolicy::default(),
                inline_dynamic_imports: false,
                source_map: false,
                meta: builtin_meta(),
            },
            adapter: AdapterKind::Event,
            hook: None,
        },
    ]
}

fn builtin_meta() -> Option<PresetMeta> {
    Some(PresetMeta {
        origin: "skiff-preset/builtin".to_string(),
    })
}

/// Workers cannot late-resolve dynamic imports when externals tracing is off,
/// so the whole bundle must collapse into one file.
fn inline_when_untraced(mut plan: BuildPlan, _ctx: &ResolveContext) -> Result<BuildPlan> {
    if !plan.externals.trace {
        plan.inline_dynamic_imports = true;
    }
    Ok(plan)
}
