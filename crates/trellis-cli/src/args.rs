use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{
    AddStepArgs, CountArgs, CreatePlanArgs, DeleteArgs, ListArgs, ShowArgs, TreeArgs, UpdateArgs,
};

/// Main command-line interface for the Trellis plan management tool
///
/// Trellis keeps a hierarchy of plans and steps in a local SQLite database:
/// top-level items are plans, nested items are steps. The same operations
/// are available as CLI commands and, via `tl serve`, as an MCP (Model
/// Context Protocol) server for AI assistant integration.
#[derive(Parser)]
#[command(version, about, name = "tl")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/trellis/trellis.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Trellis CLI
///
/// Running without a command lists the top-level plans.
#[derive(Subcommand)]
pub enum Commands {
    /// Create a new top-level plan
    #[command(alias = "c")]
    Create(CreatePlanArgs),
    /// Add a step under an existing item
    #[command(alias = "s")]
    Step(AddStepArgs),
    /// List items with optional filters
    #[command(aliases = ["l", "ls"])]
    List(ListArgs),
    /// Show details of a single item
    Show(ShowArgs),
    /// Show an item together with its whole subtree
    #[command(alias = "t")]
    Tree(TreeArgs),
    /// Count the items in a subtree
    Count(CountArgs),
    /// Update an item's fields
    #[command(alias = "u")]
    Update(UpdateArgs),
    /// Delete an item and its entire subtree
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteArgs),
    /// Start the MCP server
    Serve,
}
