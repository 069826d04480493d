//! High-level planner API for the item store.
//!
//! [`Planner`] is the async facade every front end talks to. Each operation
//! is an independent, short-lived unit of work: the planner opens a fresh
//! database connection on a blocking thread, runs the query, and releases
//! the connection on every exit path. No operation blocks on another except
//! through SQLite's own locking.
//!
//! ## Submodules
//!
//! - [`builder`]: factory for creating [`Planner`] instances
//! - [`item_ops`]: create/read/query/update operations on items
//! - [`tree_ops`]: subtree materialization, counting, and cascading delete
//!
//! # Usage
//!
//! ```rust,no_run
//! use trellis_core::{params::CreatePlan, PlannerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new().build().await?;
//!
//! let plan = planner
//!     .create_plan(&CreatePlan {
//!         name: "Japan Trip".to_string(),
//!         category: Some("travel".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("{}", plan);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

pub mod builder;
pub mod item_ops;
pub mod tree_ops;

pub use builder::PlannerBuilder;

/// Main planner interface for managing the item hierarchy.
pub struct Planner {
    pub(crate) db_path: PathBuf,
}

impl Planner {
    /// Creates a new planner with the specified database path.
    pub(crate) fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }
}
