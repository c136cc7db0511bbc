//! The build command: resolve a deployment target into build plans and lay
//! out the output directories.
//!
//! The bundler proper is a separate tool; what it consumes is the
//! build-plan.json this command writes into each artifact's resolved output
//! directory.

use std::path::Path;

use skiff_preset::{BuildPlan, PresetRegistry, ResolveContext};

use crate::cli::BuildArgs;
use crate::config::SkiffConfig;
use crate::error::Result;
use crate::ui;

pub async fn execute(args: BuildArgs) -> Result<()> {
    let mut config = SkiffConfig::load(args.config.as_deref())?;
    if let Some(target) = args.target {
        config.target = target;
    }
    if let Some(build_dir) = args.build_dir {
        config.build_dir = build_dir;
    }

    let plans = resolve_plans(&config)?;

    ui::info(&format!(
        "Resolving target '{}' ({} artifact{})",
        config.target,
        plans.len(),
        if plans.len() == 1 { "" } else { "s" }
    ));

    for plan in &plans {
        write_plan(plan).await?;
        tracing::info!(
            preset = %plan.preset,
            entry = %plan.entry,
            dir = %plan.output.dir.display(),
            "wrote build plan"
        );
    }

    ui::success(&format!(
        "Build plan ready under {}",
        config.build_dir.display()
    ));
    Ok(())
}

/// Resolve the configured target against the built-in registry.
pub fn resolve_plans(config: &SkiffConfig) -> Result<Vec<BuildPlan>> {
    let registry = PresetRegistry::builtin();
    let ctx = ResolveContext::new()
        .with("buildDir", config.build_dir.display().to_string())
        .with("rootDir", config.root_dir.display().to_string());

    Ok(registry.resolve(&config.target, &ctx, &config.defaults)?)
}

/// Create the artifact's directory layout and serialize its plan.
async fn write_plan(plan: &BuildPlan) -> Result<()> {
    for dir in [
        &plan.output.dir,
        &plan.output.server_dir,
        &plan.output.public_dir,
    ] {
        tokio::fs::create_dir_all(dir).await?;
    }

    let json = serde_json::to_vec_pretty(plan)?;
    tokio::fs::write(plan_path(&plan.output.dir, &plan.entry), json).await?;
    Ok(())
}

/// Plans land next to their artifact; targets with several artifacts get one
/// file per entry.
fn plan_path(dir: &Path, entry: &str) -> std::path::PathBuf {
    let stem = entry.rsplit('/').next().unwrap_or(entry);
    dir.join(format!("build-plan.{stem}.json"))
}
