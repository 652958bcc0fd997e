//! Command implementations and dispatch logic.
//!
//! `serve` hands the toolbox to the MCP service; `tools` and `call` exercise
//! the same toolbox from the shell.

use anyhow::Context;
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info};

use pubdev_config::{ConfigLoader, Settings};
use pubdev_core::error::{PubError, PubResult};

use crate::output::OutputHandler;
use crate::server::PubDevService;
use crate::tools::Toolbox;
use crate::Commands;

#[cfg(test)]
mod tests;

/// Shared context for all commands
pub struct CommandContext {
    pub settings: Settings,
    pub toolbox: Toolbox,
    pub output: OutputHandler,
}

impl CommandContext {
    /// Resolve configuration and build the registry client
    pub async fn new(
        config_path: Option<PathBuf>,
        cli_overrides: HashMap<String, String>,
    ) -> PubResult<Self> {
        let (settings, sources) = ConfigLoader::new(config_path).load(cli_overrides).await?;
        debug!(?sources, api = %settings.api_base_url, "configuration resolved");

        Self::from_settings(settings)
    }

    /// Build a context from already resolved settings
    pub fn from_settings(settings: Settings) -> PubResult<Self> {
        let toolbox = Toolbox::from_settings(&settings)?;
        Ok(Self {
            settings,
            toolbox,
            output: OutputHandler::new(),
        })
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> anyhow::Result<()> {
    match command {
        Commands::Serve => {
            info!("Serving pub.dev tools over stdio");
            serve(ctx).await
        },
        Commands::Tools => {
            list_tools(ctx);
            Ok(())
        },
        Commands::Call { tool, args } => {
            info!("Calling tool: {}", tool);
            let text = run_tool(&tool, &args, &ctx.toolbox).await?;
            ctx.output.print(&text);
            Ok(())
        },
        Commands::Version => {
            show_version(ctx);
            Ok(())
        },
    }
}

/// Run the MCP server until the peer disconnects
pub async fn serve(ctx: &CommandContext) -> anyhow::Result<()> {
    let service = PubDevService::new(ctx.toolbox.clone());
    let server = service
        .serve(stdio())
        .await
        .context("Failed to start MCP server")?;

    let reason = server.waiting().await.context("MCP server task failed")?;
    info!(?reason, "MCP server stopped");
    Ok(())
}

/// Print every tool with its description
pub fn list_tools(ctx: &CommandContext) {
    let service = PubDevService::new(ctx.toolbox.clone());
    let mut tools = service.tool_list();
    tools.sort_by(|a, b| a.name.cmp(&b.name));

    for tool in tools {
        ctx.output
            .tool_entry(&tool.name, tool.description.as_deref().unwrap_or_default());
    }
}

/// Parse `--args` and run one tool through the dispatcher
pub async fn run_tool(tool: &str, raw_args: &str, toolbox: &Toolbox) -> PubResult<String> {
    let arguments = parse_call_args(raw_args)?;
    toolbox.dispatch(tool, arguments).await
}

/// `--args` must be a JSON object (or empty)
fn parse_call_args(raw_args: &str) -> PubResult<Value> {
    if raw_args.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    let value: Value = serde_json::from_str(raw_args)
        .map_err(|e| PubError::invalid_argument("args", format!("not valid JSON: {}", e)))?;

    match value {
        Value::Object(_) | Value::Null => Ok(value),
        _ => Err(PubError::invalid_argument("args", "must be a JSON object")),
    }
}

fn show_version(ctx: &CommandContext) {
    let target = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    ctx.output.print(&format!("pubdev-mcp v{}", env!("CARGO_PKG_VERSION")));
    ctx.output.print(&format!("Target: {}", target));
    ctx.output.print(&format!("Registry API: {}", ctx.settings.api_base_url));
    ctx.output.print(&format!("Website: {}", ctx.settings.site_base_url));
}
