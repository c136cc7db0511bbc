//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Skiff - package one application for many hosting runtimes
#[derive(Parser, Debug)]
#[command(
    name = "skiff",
    version,
    about = "Cross-platform server deployment",
    long_about = "Skiff resolves declarative deployment presets into build plans and\n\
                  bridges each platform's native request contract to one application\n\
                  pipeline, so the same app runs on edge functions, serverless\n\
                  functions, and plain servers unmodified."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a deployment target into build plans
    ///
    /// Merges the target's preset definitions with configured defaults,
    /// substitutes all path templates, creates the output layout, and writes
    /// one build-plan.json per artifact for the bundler to consume.
    Build(BuildArgs),

    /// Start the development server
    ///
    /// Resolves the `dev` preset and serves the application through the
    /// long-running server adapter, with public assets served directly.
    Dev(DevArgs),

    /// List registered deployment targets
    Presets(PresetsArgs),
}

/// Arguments for the build command
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Deployment target to build for
    ///
    /// Overrides the `target` field of skiff.config.json.
    #[arg(short, long, value_name = "NAME")]
    pub target: Option<String>,

    /// Root directory for all build output
    #[arg(long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for the dev command
#[derive(Args, Debug, Default)]
pub struct DevArgs {
    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long, value_name = "ADDR")]
    pub host: Option<String>,

    /// Directory of static assets served without dispatching
    #[arg(long, value_name = "DIR")]
    pub public_dir: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Arguments for the presets command
#[derive(Args, Debug, Default)]
pub struct PresetsArgs {
    /// Emit the list as JSON
    #[arg(long)]
    pub json: bool,
}
