//! Core library for the Trellis plan store.
//!
//! This crate provides the business logic for a hierarchy of plan items:
//! a single self-referencing SQLite table in which top-level rows are plans
//! and nested rows are steps, with recursive subtree materialization,
//! cascading delete, filtered queries, and a scheduling-date validation
//! policy applied at plan creation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use trellis_core::{params::{AddStep, CreatePlan, Id}, PlannerBuilder};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_database_path(Some("plans.db"))
//!     .build()
//!     .await?;
//!
//! let plan = planner
//!     .create_plan(&CreatePlan {
//!         name: "Japan Trip".to_string(),
//!         category: Some("travel".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! planner
//!     .add_step(&AddStep {
//!         parent_id: plan.id,
//!         name: "Book Flight".to_string(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! let tree = planner.get_tree(&Id { id: plan.id }).await?;
//! println!("{}", tree);
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod error;
pub mod models;
pub mod params;
pub mod planner;
pub mod policy;

// Re-export commonly used types
pub use db::Database;
pub use display::{CreateResult, DeleteResult, Items, LocalDateTime, OperationStatus, UpdateResult};
pub use error::{PlannerError, Result};
pub use models::{
    Item, ItemFilter, ItemStatus, ItemTree, NewItem, NewStep, ParentFilter, UpdateItemRequest,
};
pub use params::{AddStep, CreatePlan, DeleteItem, Id, QueryItems, Reschedule, SetStatus, UpdateItem};
pub use planner::{Planner, PlannerBuilder};
