//! The dev command: resolve the dev preset and run the development server.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::cli::DevArgs;
use crate::config::SkiffConfig;
use crate::dev::{DemoDispatcher, DevConfig, DevServer, DevServerState};
use crate::error::{CliError, Result};
use crate::ui;

pub async fn execute(args: DevArgs) -> Result<()> {
    let mut config = SkiffConfig::load(args.config.as_deref())?;
    config.target = "dev".to_string();
    if let Some(host) = args.host {
        config.dev.host = host;
    }
    if let Some(port) = args.port {
        config.dev.port = port;
    }
    if let Some(public_dir) = args.public_dir {
        config.dev.public_dir = public_dir;
    }

    // Same resolution path as a real build: the dev server runs against the
    // dev preset's resolved plan.
    let plans = super::build::resolve_plans(&config)?;
    let plan = plans
        .first()
        .ok_or_else(|| CliError::Server("dev preset resolved to no artifacts".to_string()))?;
    tracing::debug!(dir = %plan.output.dir.display(), "dev preset resolved");

    let addr: SocketAddr = format!("{}:{}", config.dev.host, config.dev.port)
        .parse()
        .map_err(|e| CliError::Server(format!("Invalid listen address: {e}")))?;

    ui::info(&format!(
        "Serving public assets from {}",
        config.dev.public_dir.display()
    ));

    let state = Arc::new(DevServerState::new(
        Arc::new(DemoDispatcher::new()),
        config.dev.public_dir.clone(),
    ));

    DevServer::new(DevConfig { addr }, state).start().await
}
