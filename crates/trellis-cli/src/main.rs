//! Trellis CLI Application
//!
//! Command-line interface for the Trellis plan management tool.

mod args;
mod cli;
mod mcp;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::{Cli, ListArgs};
use log::info;
use mcp::{run_stdio_server, TrellisMcpServer};
use renderer::TerminalRenderer;
use trellis_core::PlannerBuilder;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let planner = PlannerBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize planner")?;

    info!("Trellis started");

    match command {
        Some(Commands::Serve) => {
            info!("Starting Trellis MCP server");
            run_stdio_server(TrellisMcpServer::new(planner))
                .await
                .context("MCP server failed")
        }
        Some(command) => {
            Cli::new(planner, TerminalRenderer::new(!no_color))
                .run(command)
                .await
        }
        None => {
            // Bare `tl` lists the top-level plans.
            Cli::new(planner, TerminalRenderer::new(!no_color))
                .list(ListArgs {
                    top_level: true,
                    ..Default::default()
                })
                .await
        }
    }
}
