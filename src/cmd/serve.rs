//! `serve` subcommand: run the MCP server over stdio until the client disconnects.

use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::{ServiceExt, transport::stdio};
use tracing::info;

use crate::cmd::shared::Settings;
use crate::exec::ShellLauncher;
use crate::mcp::BuildServer;

pub fn execute_serve(settings: &Settings) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(async {
        let server = BuildServer::new(settings.toolchain(Arc::new(ShellLauncher::default())));
        info!(
            msbuild = settings.defaults.msbuild(),
            fpc = settings.defaults.fpc(),
            lazbuild = settings.defaults.lazbuild(),
            "serving MCP over stdio"
        );

        let service = server
            .serve(stdio())
            .await
            .map_err(|e| anyhow::anyhow!("failed to start MCP server: {e}"))?;
        let reason = service
            .waiting()
            .await
            .map_err(|e| anyhow::anyhow!("MCP server task failed: {e}"))?;
        info!(?reason, "MCP server stopped");
        Ok(())
    })
}
