//! Item operations for the Planner.

use jiff::Zoned;
use tokio::task;

use super::Planner;
use crate::{
    db::Database,
    error::{PlannerError, Result},
    models::{item::empty_metadata, Item, ItemFilter, NewItem, NewStep, UpdateItemRequest},
    params::{AddStep, CreatePlan, Id, QueryItems, UpdateItem},
    policy,
};

impl Planner {
    /// Creates a new top-level plan.
    ///
    /// The scheduling dates go through the full validation policy (parse,
    /// past-date roll-forward, chronological-order check) before anything
    /// touches the database; only plan-level creation applies it.
    pub async fn create_plan(&self, params: &CreatePlan) -> Result<Item> {
        let today = Zoned::now().date();
        let (scheduled_at, deadline) = policy::normalize_schedule(
            params.scheduled_at.as_deref(),
            params.deadline.as_deref(),
            today,
        )?;

        let item = NewItem {
            name: params.name.clone(),
            parent_id: None,
            description: params.description.clone(),
            category: params
                .category
                .clone()
                .unwrap_or_else(|| "general".to_string()),
            scheduled_at,
            deadline,
            metadata: params.metadata.clone().unwrap_or_else(empty_metadata),
        };

        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.create_item(&item)
        })
        .await
        .map_err(|e| PlannerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Adds a step under an existing item.
    ///
    /// The step inherits the parent's category at creation time. Its
    /// scheduled date is parsed strictly, but the roll-forward policy does
    /// not apply to steps.
    pub async fn add_step(&self, params: &AddStep) -> Result<Item> {
        let scheduled_at = params
            .scheduled_at
            .as_deref()
            .map(|s| policy::parse_date("scheduled_at", s))
            .transpose()?;

        let step = NewStep {
            name: params.name.clone(),
            description: params.description.clone(),
            scheduled_at,
            metadata: params.metadata.clone().unwrap_or_else(empty_metadata),
        };

        let parent_id = params.parent_id;
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.add_step(parent_id, &step)
        })
        .await
        .map_err(|e| PlannerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves an item by its ID, failing with `ItemNotFound` when it
    /// does not exist.
    pub async fn get_item(&self, params: &Id) -> Result<Item> {
        let id = params.id;
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_item(id)?.ok_or(PlannerError::ItemNotFound { id })
        })
        .await
        .map_err(|e| PlannerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Lists items matching the supplied filters.
    pub async fn query_items(&self, params: &QueryItems) -> Result<Vec<Item>> {
        let filter = ItemFilter::try_from(params)?;
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.query_items(&filter)
        })
        .await
        .map_err(|e| PlannerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Updates an item's fields.
    ///
    /// Returns `Ok(false)` when the item does not exist or no field was
    /// supplied. Invalid status strings, malformed dates, and
    /// cycle-creating parent changes fail with `InvalidInput`.
    pub async fn update_item(&self, params: &UpdateItem) -> Result<bool> {
        let id = params.id;
        let request = UpdateItemRequest::try_from(params.clone())?;
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.update_item(id, &request)
        })
        .await
        .map_err(|e| PlannerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
