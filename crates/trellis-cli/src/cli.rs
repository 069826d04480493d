//! Command definitions and handlers.
//!
//! Each command has a clap argument struct that converts into the core
//! parameter types, keeping framework concerns out of `trellis-core`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Planner
//! ```
//!
//! Metadata is accepted as a JSON string on the command line and parsed
//! here; the core only ever sees structured `serde_json::Value` documents.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use trellis_core::{
    display::{CreateResult, Items, OperationStatus, UpdateResult},
    params::{AddStep, CreatePlan, DeleteItem, Id, QueryItems, UpdateItem},
    Planner,
};

use crate::{args::Commands, renderer::TerminalRenderer};

/// Create a new top-level plan
#[derive(Args)]
pub struct CreatePlanArgs {
    /// Name of the plan
    pub name: String,
    /// Optional description providing more context about the plan
    #[arg(short, long)]
    pub description: Option<String>,
    /// Category label, e.g. "travel" or "study" (defaults to "general")
    #[arg(short, long)]
    pub category: Option<String>,
    /// When the plan starts (YYYY-MM-DD)
    #[arg(long)]
    pub scheduled_at: Option<String>,
    /// When the plan should be finished (YYYY-MM-DD)
    #[arg(long)]
    pub deadline: Option<String>,
    /// Extra data as a JSON object, e.g. '{"budget": 500}'
    #[arg(short, long)]
    pub metadata: Option<String>,
}

/// Add a step under an existing item
#[derive(Args)]
pub struct AddStepArgs {
    /// ID of the parent item
    pub parent_id: u64,
    /// Name of the step
    pub name: String,
    /// Optional description of the step
    #[arg(short, long)]
    pub description: Option<String>,
    /// When the step should happen (YYYY-MM-DD)
    #[arg(long)]
    pub scheduled_at: Option<String>,
    /// Extra data as a JSON object
    #[arg(short, long)]
    pub metadata: Option<String>,
}

/// List items with optional filters
#[derive(Args, Default)]
pub struct ListArgs {
    /// List only the direct children of this item
    #[arg(short, long, conflicts_with = "top_level")]
    pub parent: Option<u64>,
    /// List only top-level plans
    #[arg(short, long)]
    pub top_level: bool,
    /// Filter by category
    #[arg(short, long)]
    pub category: Option<String>,
    /// Filter by status
    #[arg(short, long)]
    pub status: Option<ItemStatusArg>,
    /// Earliest scheduled date to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// Latest scheduled date to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,
}

/// Show details of a single item
#[derive(Args)]
pub struct ShowArgs {
    /// ID of the item to display
    pub id: u64,
}

/// Show an item together with its whole subtree
#[derive(Args)]
pub struct TreeArgs {
    /// ID of the subtree root
    pub id: u64,
}

/// Count the items in a subtree
#[derive(Args)]
pub struct CountArgs {
    /// ID of the subtree root
    pub id: u64,
}

/// Update an item's fields
#[derive(Args)]
pub struct UpdateArgs {
    /// ID of the item to update
    pub id: u64,
    /// New name for the item
    #[arg(short, long)]
    pub name: Option<String>,
    /// New description
    #[arg(short, long)]
    pub description: Option<String>,
    /// New category label
    #[arg(short, long)]
    pub category: Option<String>,
    /// Move the item under this parent
    #[arg(short, long, conflicts_with = "detach")]
    pub parent: Option<u64>,
    /// Move the item to top level
    #[arg(long)]
    pub detach: bool,
    /// New scheduled date (YYYY-MM-DD)
    #[arg(long)]
    pub scheduled_at: Option<String>,
    /// New deadline (YYYY-MM-DD)
    #[arg(long)]
    pub deadline: Option<String>,
    /// New status for the item
    #[arg(short, long)]
    pub status: Option<ItemStatusArg>,
    /// Replacement metadata as a JSON object
    #[arg(short, long)]
    pub metadata: Option<String>,
}

/// Delete an item and its entire subtree
#[derive(Args)]
pub struct DeleteArgs {
    /// ID of the item to delete
    pub id: u64,
    /// Confirm the cascading deletion
    #[arg(long)]
    pub confirm: bool,
}

/// Command-line representation of item status values.
///
/// clap rejects anything outside these four values before the input can
/// reach the repository.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum ItemStatusArg {
    /// Item has not been started yet
    Pending,
    /// Item is being worked on
    InProgress,
    /// Item has been completed
    Completed,
    /// Item was abandoned
    Cancelled,
}

impl std::fmt::Display for ItemStatusArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemStatusArg::Pending => write!(f, "pending"),
            ItemStatusArg::InProgress => write!(f, "in_progress"),
            ItemStatusArg::Completed => write!(f, "completed"),
            ItemStatusArg::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Parse a `--metadata` argument into a JSON document.
fn parse_metadata(raw: Option<&str>) -> Result<Option<serde_json::Value>> {
    raw.map(|s| serde_json::from_str(s).context("metadata must be a valid JSON document"))
        .transpose()
}

/// Command runner holding the planner and terminal renderer.
pub struct Cli {
    planner: Planner,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(planner: Planner, renderer: TerminalRenderer) -> Self {
        Self { planner, renderer }
    }

    /// Dispatch a parsed command. `Serve` is handled in `main` before the
    /// runner is constructed.
    pub async fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Create(args) => self.create_plan(args).await,
            Commands::Step(args) => self.add_step(args).await,
            Commands::List(args) => self.list(args).await,
            Commands::Show(args) => self.show(&args).await,
            Commands::Tree(args) => self.tree(&args).await,
            Commands::Count(args) => self.count(&args).await,
            Commands::Update(args) => self.update(args).await,
            Commands::Delete(args) => self.delete(&args).await,
            Commands::Serve => unreachable!("serve is dispatched before the CLI runner"),
        }
    }

    async fn create_plan(&self, args: CreatePlanArgs) -> Result<()> {
        let params = CreatePlan {
            name: args.name,
            description: args.description,
            category: args.category,
            scheduled_at: args.scheduled_at,
            deadline: args.deadline,
            metadata: parse_metadata(args.metadata.as_deref())?,
        };

        let plan = self.planner.create_plan(&params).await?;
        self.renderer.render(&CreateResult::new(plan).to_string())
    }

    async fn add_step(&self, args: AddStepArgs) -> Result<()> {
        let params = AddStep {
            parent_id: args.parent_id,
            name: args.name,
            description: args.description,
            scheduled_at: args.scheduled_at,
            metadata: parse_metadata(args.metadata.as_deref())?,
        };

        let step = self.planner.add_step(&params).await?;
        self.renderer.render(&CreateResult::new(step).to_string())
    }

    pub async fn list(&self, args: ListArgs) -> Result<()> {
        let params = QueryItems {
            parent_id: args.parent,
            top_level: args.top_level,
            category: args.category,
            status: args.status.map(|s| s.to_string()),
            scheduled_from: args.from,
            scheduled_to: args.to,
        };

        let title = match (params.parent_id, params.top_level) {
            (Some(id), _) => format!("Steps under item {id}"),
            (None, true) => "Plans".to_string(),
            (None, false) => "Items".to_string(),
        };

        let items = Items(self.planner.query_items(&params).await?);
        self.renderer.render(&format!("# {title}\n\n{items}"))
    }

    async fn show(&self, args: &ShowArgs) -> Result<()> {
        let item = self.planner.get_item(&Id { id: args.id }).await?;
        self.renderer.render(&item.to_string())
    }

    async fn tree(&self, args: &TreeArgs) -> Result<()> {
        let tree = self.planner.get_tree(&Id { id: args.id }).await?;
        self.renderer.render(&tree.to_string())
    }

    async fn count(&self, args: &CountArgs) -> Result<()> {
        let count = self.planner.count_subtree(&Id { id: args.id }).await?;
        self.renderer
            .render(&format!("Subtree of item {} contains {count} item(s)\n", args.id))
    }

    async fn update(&self, args: UpdateArgs) -> Result<()> {
        let changes = describe_update(&args);
        let params = UpdateItem {
            id: args.id,
            name: args.name,
            description: args.description,
            category: args.category,
            parent_id: args.parent,
            detach: args.detach,
            scheduled_at: args.scheduled_at,
            deadline: args.deadline,
            status: args.status.map(|s| s.to_string()),
            metadata: parse_metadata(args.metadata.as_deref())?,
        };

        if self.planner.update_item(&params).await? {
            let item = self.planner.get_item(&Id { id: params.id }).await?;
            self.renderer
                .render(&UpdateResult::with_changes(item, changes).to_string())
        } else {
            // A missing id (or an empty update) is a normal outcome for
            // idempotent callers, not an error.
            self.renderer.render(
                &OperationStatus::failure(format!(
                    "Item {} not found or nothing to update",
                    params.id
                ))
                .to_string(),
            )
        }
    }

    async fn delete(&self, args: &DeleteArgs) -> Result<()> {
        let params = DeleteItem {
            id: args.id,
            confirmed: args.confirm,
        };

        match self.planner.delete_item(&params).await? {
            Some(result) => self.renderer.render(&result.to_string()),
            None => self.renderer.render(
                &OperationStatus::failure(format!("Item {} not found", args.id)).to_string(),
            ),
        }
    }
}

/// Human-readable change list for update confirmations.
fn describe_update(args: &UpdateArgs) -> Vec<String> {
    let mut changes = Vec::new();
    if args.name.is_some() {
        changes.push("Updated name".to_string());
    }
    if args.description.is_some() {
        changes.push("Updated description".to_string());
    }
    if args.category.is_some() {
        changes.push("Updated category".to_string());
    }
    if let Some(parent) = args.parent {
        changes.push(format!("Moved under item {parent}"));
    }
    if args.detach {
        changes.push("Detached to top level".to_string());
    }
    if args.scheduled_at.is_some() {
        changes.push("Rescheduled".to_string());
    }
    if args.deadline.is_some() {
        changes.push("Updated deadline".to_string());
    }
    if let Some(status) = args.status {
        changes.push(format!("Changed status to '{status}'"));
    }
    if args.metadata.is_some() {
        changes.push("Replaced metadata".to_string());
    }
    changes
}
