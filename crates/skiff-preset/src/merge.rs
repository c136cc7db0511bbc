//! Configuration merging and template resolution.
//!
//! Turns a [`PresetDefinition`] plus global defaults plus a
//! [`ResolveContext`] into a [`BuildPlan`]. Resolution is strict: unknown
//! option keys, unknown or unresolved placeholder tokens, and inconsistent
//! output layouts all fail the build with an error naming the offending
//! preset and key.

use std::path::PathBuf;

use serde_json::Value;

use crate::error::{PresetError, Result};
use crate::plan::{BuildPlan, ResolvedOutput};
use crate::preset::{AdapterKind, PresetDefinition};
use crate::template::{ResolveContext, TemplateIssue, resolve_template};

/// Optional post-processing for a resolved plan.
///
/// A hook is a pure function: it receives the plan by value along with the
/// context it was resolved against, and returns a new plan. It runs exactly
/// once per resolution and has nowhere to reach external state from.
pub type PresetHook = fn(BuildPlan, &ResolveContext) -> Result<BuildPlan>;

/// Resolve one definition into a build plan.
///
/// Steps, in order:
/// 1. deep-merge `defaults` over the definition (unknown keys rejected)
/// 2. extend the context with the `preset` token
/// 3. substitute every `output.*` template
/// 4. validate the resolved layout
/// 5. run the hook, if any, exactly once, then re-validate
///
/// # Errors
///
/// See [`PresetError`]; every failure names the preset, and the template
/// failures name the output key as well.
pub fn resolve_definition(
    definition: &PresetDefinition,
    adapter: AdapterKind,
    hook: Option<PresetHook>,
    ctx: &ResolveContext,
    defaults: &Value,
) -> Result<BuildPlan> {
    let definition = apply_defaults(definition, defaults)?;

    let mut ctx = ctx.clone();
    ctx.insert("preset", definition.name.clone());

    let output = resolve_output(&definition, &ctx)?;
    validate_layout(&definition.name, &output)?;

    let mut plan = BuildPlan {
        preset: definition.name.clone(),
        entry: definition.entry.clone(),
        adapter,
        output,
        externals: definition.externals.clone(),
        inline_dynamic_imports: definition.inline_dynamic_imports,
        source_map: definition.source_map,
    };

    if let Some(hook) = hook {
        tracing::debug!(preset = %plan.preset, "running preset hook");
        plan = hook(plan, &ctx)?;
        validate_layout(&plan.preset, &plan.output)?;
    }

    Ok(plan)
}

/// Deep-merge global defaults over a definition.
///
/// `name` and `meta` are identity/provenance and kept from the original
/// definition regardless of what the defaults say.
fn apply_defaults(definition: &PresetDefinition, defaults: &Value) -> Result<PresetDefinition> {
    if defaults.is_null() {
        return Ok(definition.clone());
    }
    if !defaults.is_object() {
        return Err(PresetError::InvalidDefaults(
            "expected a JSON object".to_string(),
        ));
    }

    let invalid = |err: &dyn std::fmt::Display| PresetError::InvalidOverride {
        preset: definition.name.clone(),
        message: err.to_string(),
    };

    let mut base = serde_json::to_value(definition).map_err(|e| invalid(&e))?;
    merge_values(&mut base, defaults);

    let mut merged: PresetDefinition =
        serde_json::from_value(base).map_err(|e| invalid(&e))?;
    merged.name = definition.name.clone();
    merged.meta = definition.meta.clone();
    Ok(merged)
}

/// Recursive JSON merge: objects merge key-by-key, arrays and scalars are
/// replaced whole.
fn merge_values(target: &mut Value, update: &Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_values(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target_slot, _) => {
            *target_slot = update.clone();
        }
    }
}

fn resolve_output(definition: &PresetDefinition, ctx: &ResolveContext) -> Result<ResolvedOutput> {
    let resolve = |key: &str, template: &str| -> Result<PathBuf> {
        resolve_template(template, ctx)
            .map(PathBuf::from)
            .map_err(|issue| template_error(&definition.name, key, template, issue))
    };

    Ok(ResolvedOutput {
        dir: resolve("dir", &definition.output.dir)?,
        server_dir: resolve("serverDir", &definition.output.server_dir)?,
        public_dir: resolve("publicDir", &definition.output.public_dir)?,
    })
}

fn template_error(preset: &str, key: &str, template: &str, issue: TemplateIssue) -> PresetError {
    match issue {
        TemplateIssue::MissingValue(token) => PresetError::UnresolvedPlaceholder {
            preset: preset.to_string(),
            key: key.to_string(),
            token,
        },
        TemplateIssue::UnknownToken(token) => PresetError::UnknownToken {
            preset: preset.to_string(),
            key: key.to_string(),
            token,
        },
        TemplateIssue::Unterminated => PresetError::MalformedTemplate {
            preset: preset.to_string(),
            key: key.to_string(),
            template: template.to_string(),
        },
    }
}

/// Server and public directories must sit at or under the build root. The
/// dev preset collapses all three to one directory, which is valid.
fn validate_layout(preset: &str, output: &ResolvedOutput) -> Result<()> {
    for (key, path) in [
        ("serverDir", &output.server_dir),
        ("publicDir", &output.public_dir),
    ] {
        if !path.starts_with(&output.dir) {
            return Err(PresetError::ConflictingOutput {
                preset: preset.to_string(),
                key: key.to_string(),
                path: path.display().to_string(),
                dir: output.dir.display().to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::OutputPaths;
    use serde_json::json;

    fn dev_definition() -> PresetDefinition {
        PresetDefinition {
            name: "dev".to_string(),
            entry: "./runtime/dev".to_string(),
            output: OutputPaths::flat("{{ buildDir }}/dev"),
            externals: Default::default(),
            inline_dynamic_imports: true,
            source_map: true,
            meta: None,
        }
    }

    fn ctx() -> ResolveContext {
        ResolveContext::new().with("buildDir", "/out")
    }

    #[test]
    fn dev_preset_resolves_to_build_dir_subpath() {
        let plan = resolve_definition(
            &dev_definition(),
            AdapterKind::Server,
            None,
            &ctx(),
            &Value::Null,
        )
        .unwrap();

        assert_eq!(plan.output.dir, PathBuf::from("/out/dev"));
        assert_eq!(plan.output.server_dir, PathBuf::from("/out/dev"));
        assert_eq!(plan.output.public_dir, PathBuf::from("/out/dev"));
    }

    #[test]
    fn incomplete_context_names_preset_and_key() {
        let err = resolve_definition(
            &dev_definition(),
            AdapterKind::Server,
            None,
            &ResolveContext::new(),
            &Value::Null,
        )
        .unwrap_err();

        match err {
            PresetError::UnresolvedPlaceholder { preset, key, token } => {
                assert_eq!(preset, "dev");
                assert_eq!(key, "dir");
                assert_eq!(token, "buildDir");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_token_fails_even_with_complete_context() {
        let mut definition = dev_definition();
        definition.output.public_dir = "{{ distDir }}/public".to_string();

        let err = resolve_definition(
            &definition,
            AdapterKind::Server,
            None,
            &ctx(),
            &Value::Null,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            PresetError::UnknownToken { ref key, ref token, .. }
                if key == "publicDir" && token == "distDir"
        ));
    }

    #[test]
    fn defaults_merge_under_preset_identity() {
        let defaults = json!({
            "sourceMap": false,
            "externals": { "external": ["node:fs"] },
            "name": "hijacked"
        });

        let plan = resolve_definition(
            &dev_definition(),
            AdapterKind::Server,
            None,
            &ctx(),
            &defaults,
        )
        .unwrap();

        assert!(!plan.source_map);
        assert_eq!(plan.externals.external, vec!["node:fs".to_string()]);
        // trace came from the definition, untouched by the partial override
        assert!(plan.externals.trace);
        assert_eq!(plan.preset, "dev");
    }

    #[test]
    fn unknown_default_keys_are_rejected() {
        let defaults = json!({ "minify": true });
        let err = resolve_definition(
            &dev_definition(),
            AdapterKind::Server,
            None,
            &ctx(),
            &defaults,
        )
        .unwrap_err();

        match err {
            PresetError::InvalidOverride { preset, message } => {
                assert_eq!(preset, "dev");
                assert!(message.contains("minify"), "should name the key: {message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_object_defaults_are_rejected() {
        let err = resolve_definition(
            &dev_definition(),
            AdapterKind::Server,
            None,
            &ctx(),
            &json!(["not", "an", "object"]),
        )
        .unwrap_err();
        assert!(matches!(err, PresetError::InvalidDefaults(_)));
    }

    #[test]
    fn escaped_layout_is_a_conflict() {
        let mut definition = dev_definition();
        definition.output.server_dir = "{{ rootDir }}/elsewhere".to_string();

        let err = resolve_definition(
            &definition,
            AdapterKind::Server,
            None,
            &ctx().with("rootDir", "/src"),
            &Value::Null,
        )
        .unwrap_err();

        assert!(matches!(err, PresetError::ConflictingOutput { ref key, .. } if key == "serverDir"));
    }

    #[test]
    fn hook_runs_once_and_returns_a_new_plan() {
        fn force_source_map(mut plan: BuildPlan, _ctx: &ResolveContext) -> Result<BuildPlan> {
            plan.source_map = true;
            Ok(plan)
        }

        let mut definition = dev_definition();
        definition.source_map = false;

        let plan = resolve_definition(
            &definition,
            AdapterKind::Server,
            Some(force_source_map),
            &ctx(),
            &Value::Null,
        )
        .unwrap();

        assert!(plan.source_map);
    }

    #[test]
    fn hook_errors_carry_the_preset_name() {
        fn reject(plan: BuildPlan, _ctx: &ResolveContext) -> Result<BuildPlan> {
            Err(PresetError::Hook {
                preset: plan.preset,
                message: "not supported".to_string(),
            })
        }

        let err = resolve_definition(
            &dev_definition(),
            AdapterKind::Server,
            Some(reject),
            &ctx(),
            &Value::Null,
        )
        .unwrap_err();

        assert!(matches!(err, PresetError::Hook { ref preset, .. } if preset == "dev"));
    }
}
