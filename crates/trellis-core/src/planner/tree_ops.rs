//! Tree operations for the Planner.

use tokio::task;

use super::Planner;
use crate::{
    db::Database,
    display::DeleteResult,
    error::{PlannerError, Result},
    models::ItemTree,
    params::{DeleteItem, Id},
};

impl Planner {
    /// Materializes the subtree rooted at the given item, failing with
    /// `ItemNotFound` when the root does not exist.
    pub async fn get_tree(&self, params: &Id) -> Result<ItemTree> {
        let id = params.id;
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_tree(id)?.ok_or(PlannerError::ItemNotFound { id })
        })
        .await
        .map_err(|e| PlannerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Counts the items in the subtree rooted at the given item, the root
    /// included. Returns 0 when the root does not exist.
    pub async fn count_subtree(&self, params: &Id) -> Result<u64> {
        let id = params.id;
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.count_subtree(id)
        })
        .await
        .map_err(|e| PlannerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Deletes an item and its entire subtree.
    ///
    /// Requires explicit confirmation, since the cascade removes every
    /// descendant and cannot be undone. Returns `None` when the item does
    /// not exist; otherwise the deleted item's details and the number of
    /// items removed.
    pub async fn delete_item(&self, params: &DeleteItem) -> Result<Option<DeleteResult>> {
        if !params.confirmed {
            return Err(PlannerError::invalid_input(
                "confirmed",
                "Deleting an item removes its entire subtree and cannot be undone. Set \
                 'confirmed' to true to proceed.",
            ));
        }

        let id = params.id;
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            let Some(item) = db.get_item(id)? else {
                return Ok(None);
            };
            match db.cascade_delete(id)? {
                Some(removed) => Ok(Some(DeleteResult::new(item.id, item.name, removed))),
                None => Ok(None),
            }
        })
        .await
        .map_err(|e| PlannerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
