//! Tree engine: subtree materialization, counting, and cascading delete.

use std::collections::HashSet;

use log::warn;
use rusqlite::params;

use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    models::{Item, ItemFilter, ItemTree},
};

const CHECK_ITEM_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM items WHERE id = ?1)";
const DELETE_ITEM_SQL: &str = "DELETE FROM items WHERE id = ?1";

// UNION (not UNION ALL) so a cycle in stale data terminates instead of
// recursing forever.
const COUNT_SUBTREE_SQL: &str = "WITH RECURSIVE subtree(id) AS (
    SELECT id FROM items WHERE id = ?1
    UNION
    SELECT items.id FROM items JOIN subtree ON items.parent_id = subtree.id
)
SELECT COUNT(*) FROM subtree";

impl super::Database {
    /// Materializes the subtree rooted at `root_id`.
    ///
    /// Returns the root item with its recursively collected children;
    /// sibling order follows the repository's default query order. `None`
    /// when the root does not exist. The whole walk runs inside a single
    /// read transaction so a concurrent cascade delete cannot interleave
    /// mid-traversal.
    pub fn get_tree(&self, root_id: u64) -> Result<Option<ItemTree>> {
        let tx = self
            .connection
            .unchecked_transaction()
            .db_context("Failed to begin read transaction")?;

        let Some(root) = self.get_item(root_id)? else {
            return Ok(None);
        };

        let mut seen = HashSet::from([root.id]);
        let tree = self.materialize_subtree(root, &mut seen)?;

        tx.commit().db_context("Failed to commit read transaction")?;

        Ok(Some(tree))
    }

    fn materialize_subtree(&self, item: Item, seen: &mut HashSet<u64>) -> Result<ItemTree> {
        let mut children = Vec::new();
        for child in self.query_items(&ItemFilter::children_of(item.id))? {
            if !seen.insert(child.id) {
                // update_item rejects cycle-creating reparents; reaching an
                // already-visited id means the stored data is corrupt.
                warn!(
                    "skipping item {} under {}: cycle in parent chain",
                    child.id, item.id
                );
                continue;
            }
            children.push(self.materialize_subtree(child, seen)?);
        }
        Ok(ItemTree { item, children })
    }

    /// Counts the items in the subtree rooted at `root_id`, the root
    /// included. Returns 0 when the root does not exist.
    pub fn count_subtree(&self, root_id: u64) -> Result<u64> {
        let count: i64 = self
            .connection
            .query_row(COUNT_SUBTREE_SQL, params![root_id as i64], |row| row.get(0))
            .db_context("Failed to count subtree")?;

        Ok(count as u64)
    }

    /// Deletes the item and its entire subtree as one atomic operation.
    ///
    /// Returns the number of items removed, or `None` when the root does
    /// not exist. Either the whole subtree is removed or, on failure,
    /// nothing is: the count and the delete share one transaction, and the
    /// delete itself relies on the `ON DELETE CASCADE` foreign key.
    pub fn cascade_delete(&mut self, root_id: u64) -> Result<Option<u64>> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(CHECK_ITEM_EXISTS_SQL, params![root_id as i64], |row| {
                row.get(0)
            })
            .db_context("Failed to check item existence")?;

        if !exists {
            return Ok(None);
        }

        let count: i64 = tx
            .query_row(COUNT_SUBTREE_SQL, params![root_id as i64], |row| row.get(0))
            .db_context("Failed to count subtree")?;

        tx.execute(DELETE_ITEM_SQL, params![root_id as i64])
            .map_err(|e| PlannerError::database_error("Failed to delete item", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Some(count as u64))
    }
}
