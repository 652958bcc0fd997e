//! # pubdev-mcp
//!
//! MCP server that exposes the pub.dev package registry as tools.
//!
//! Running the binary with no command serves the tools over stdio. Add it to
//! an MCP client configuration:
//! ```json
//! {
//!   "mcpServers": {
//!     "pubdev": { "command": "pubdev-mcp" }
//!   }
//! }
//! ```
//!
//! `pubdev-mcp tools` lists the tools and `pubdev-mcp call <tool> --args '{...}'`
//! runs one from the shell.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pubdev_config::merge::{CLI_API_URL, CLI_SITE_URL, CLI_TIMEOUT};

mod commands;
mod output;
mod render;
mod server;
mod tools;

use commands::CommandContext;

/// pub.dev package registry tools for MCP hosts
#[derive(Parser)]
#[command(name = "pubdev-mcp", version, about = "pub.dev package registry tools over MCP")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (default: <config dir>/pubdev-mcp/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the pub.dev API root
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Override the pub.dev website root
    #[arg(long, global = true, value_name = "URL")]
    pub site_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging (stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Serve the tools over MCP stdio (default)
    Serve,
    /// List available tools
    Tools,
    /// Run a single tool and print its output
    Call {
        /// Tool name, e.g. get_package_info
        tool: String,
        /// Tool arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
    /// Show version information
    Version,
}

impl Cli {
    /// Flags that override configuration, keyed for `ConfigLayering`
    pub fn config_overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();
        if let Some(url) = &self.api_url {
            overrides.insert(CLI_API_URL.to_string(), url.clone());
        }
        if let Some(url) = &self.site_url {
            overrides.insert(CLI_SITE_URL.to_string(), url.clone());
        }
        if let Some(timeout) = self.timeout {
            overrides.insert(CLI_TIMEOUT.to_string(), timeout.to_string());
        }
        overrides
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    info!("Starting pubdev-mcp v{}", env!("CARGO_PKG_VERSION"));

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let output = output::OutputHandler::new();
            match err.downcast_ref::<pubdev_core::PubError>() {
                Some(pub_err) => output.error(pub_err),
                None => output.error_message(&format!("{:#}", err)),
            }
            ExitCode::FAILURE
        },
    }
}

fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;

    rt.block_on(async move {
        let ctx = CommandContext::new(cli.config.clone(), cli.config_overrides()).await?;
        let command = cli.command.unwrap_or(Commands::Serve);
        commands::dispatch_command(command, &ctx).await
    })
}

/// Logs go to stderr; stdout carries the MCP protocol
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,pubdev_cli={level},pubdev_registry={level},pubdev_config={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("pubdev-mcp encountered an unexpected error: {}", panic_info);
        eprintln!("pubdev-mcp crashed! This is a bug.");
        eprintln!("Error: {}", panic_info);
    }));
}
