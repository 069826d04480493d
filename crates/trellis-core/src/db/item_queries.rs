//! Item repository: CRUD operations and the shared filtered query builder.

use jiff::{civil::Date, Timestamp};
use rusqlite::{params, types::Type, OptionalExtension};

use crate::{
    error::{DatabaseResultExt, PlannerError, Result},
    models::{Item, ItemFilter, ItemStatus, NewItem, NewStep, ParentFilter, UpdateItemRequest},
};

// SQL as const strings, shared by the operations below.
const ITEM_COLUMNS: &str = "id, parent_id, name, description, category, scheduled_at, deadline, status, metadata, created_at, updated_at";
const INSERT_ITEM_SQL: &str = "INSERT INTO items (parent_id, name, description, category, scheduled_at, deadline, status, metadata, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";
const SELECT_ITEM_SQL: &str = "SELECT id, parent_id, name, description, category, scheduled_at, deadline, status, metadata, created_at, updated_at FROM items WHERE id = ?1";
const CHECK_ITEM_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM items WHERE id = ?1)";
const SELECT_CATEGORY_SQL: &str = "SELECT category FROM items WHERE id = ?1";
const SELECT_PARENT_SQL: &str = "SELECT parent_id FROM items WHERE id = ?1";

// Default ordering for every listing: dated items first in date order,
// dateless items after them, creation order (and id) breaking ties.
const ITEM_ORDER_CLAUSE: &str = " ORDER BY scheduled_at IS NULL, scheduled_at, created_at, id";

impl super::Database {
    /// Construct an [`Item`] from a database row in `ITEM_COLUMNS` order.
    pub(super) fn build_item_from_row(row: &rusqlite::Row) -> rusqlite::Result<Item> {
        let status_str: String = row.get(7)?;
        let status = status_str.parse::<ItemStatus>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                7,
                Type::Text,
                format!("Invalid status: {status_str}").into(),
            )
        })?;

        let scheduled_at = row
            .get::<_, Option<String>>(5)?
            .map(|s| s.parse::<Date>())
            .transpose()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;
        let deadline = row
            .get::<_, Option<String>>(6)?
            .map(|s| s.parse::<Date>())
            .transpose()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

        let metadata_str: String = row.get(8)?;
        let metadata = serde_json::from_str(&metadata_str)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?;

        Ok(Item {
            id: row.get::<_, i64>(0)? as u64,
            parent_id: row.get::<_, Option<i64>>(1)?.map(|v| v as u64),
            name: row.get(2)?,
            description: row.get(3)?,
            category: row.get(4)?,
            scheduled_at,
            deadline,
            status,
            metadata,
            created_at: row.get::<_, String>(9)?.parse::<Timestamp>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(e))
            })?,
            updated_at: row
                .get::<_, String>(10)?
                .parse::<Timestamp>()
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(10, Type::Text, Box::new(e))
                })?,
        })
    }

    /// Creates a new item. The parent, when given, must already exist.
    pub fn create_item(&mut self, item: &NewItem) -> Result<Item> {
        if item.name.trim().is_empty() {
            return Err(PlannerError::invalid_input("name", "Name must not be blank"));
        }

        let metadata_json = serde_json::to_string(&item.metadata)?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        if let Some(parent_id) = item.parent_id {
            let exists: bool = tx
                .query_row(CHECK_ITEM_EXISTS_SQL, params![parent_id as i64], |row| {
                    row.get(0)
                })
                .db_context("Failed to check parent existence")?;

            if !exists {
                return Err(PlannerError::ItemNotFound { id: parent_id });
            }
        }

        let now = Timestamp::now();
        let now_str = now.to_string();

        tx.execute(
            INSERT_ITEM_SQL,
            params![
                item.parent_id.map(|v| v as i64),
                &item.name,
                item.description.as_deref(),
                &item.category,
                item.scheduled_at.map(|d| d.to_string()),
                item.deadline.map(|d| d.to_string()),
                ItemStatus::Pending.as_str(),
                &metadata_json,
                &now_str,
                &now_str
            ],
        )
        .map_err(|e| PlannerError::database_error("Failed to insert item", e))?;

        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Item {
            id,
            parent_id: item.parent_id,
            name: item.name.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
            scheduled_at: item.scheduled_at,
            deadline: item.deadline,
            status: ItemStatus::Pending,
            metadata: item.metadata.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Adds a step under an existing item, inheriting the parent's category.
    ///
    /// Parent lookup and insert happen in one transaction, so the inherited
    /// category is the parent's category at the moment of creation. The copy
    /// is one-time: later category changes on the parent do not propagate.
    pub fn add_step(&mut self, parent_id: u64, step: &NewStep) -> Result<Item> {
        if step.name.trim().is_empty() {
            return Err(PlannerError::invalid_input("name", "Name must not be blank"));
        }

        let metadata_json = serde_json::to_string(&step.metadata)?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let category: String = tx
            .query_row(SELECT_CATEGORY_SQL, params![parent_id as i64], |row| {
                row.get(0)
            })
            .map_err(|e| {
                if matches!(e, rusqlite::Error::QueryReturnedNoRows) {
                    PlannerError::ItemNotFound { id: parent_id }
                } else {
                    PlannerError::database_error("Failed to look up parent item", e)
                }
            })?;

        let now = Timestamp::now();
        let now_str = now.to_string();

        tx.execute(
            INSERT_ITEM_SQL,
            params![
                parent_id as i64,
                &step.name,
                step.description.as_deref(),
                &category,
                step.scheduled_at.map(|d| d.to_string()),
                None::<String>, // steps carry no deadline at creation
                ItemStatus::Pending.as_str(),
                &metadata_json,
                &now_str,
                &now_str
            ],
        )
        .map_err(|e| PlannerError::database_error("Failed to insert step", e))?;

        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Item {
            id,
            parent_id: Some(parent_id),
            name: step.name.clone(),
            description: step.description.clone(),
            category,
            scheduled_at: step.scheduled_at,
            deadline: None,
            status: ItemStatus::Pending,
            metadata: step.metadata.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Retrieves a single item by its ID.
    pub fn get_item(&self, id: u64) -> Result<Option<Item>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_ITEM_SQL)
            .map_err(|e| PlannerError::database_error("Failed to prepare query", e))?;

        let item = stmt
            .query_row(params![id as i64], Self::build_item_from_row)
            .optional()
            .map_err(|e| PlannerError::database_error("Failed to query item", e))?;

        Ok(item)
    }

    /// Lists items matching the filter, in the repository's default order.
    ///
    /// All supplied filters AND-combine; an empty result is not an error.
    pub fn query_items(&self, filter: &ItemFilter) -> Result<Vec<Item>> {
        let mut query = format!("SELECT {ITEM_COLUMNS} FROM items");

        let mut conditions: Vec<&str> = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        match filter.parent {
            ParentFilter::Any => {}
            ParentFilter::TopLevel => conditions.push("parent_id IS NULL"),
            ParentFilter::ChildrenOf(id) => {
                conditions.push("parent_id = ?");
                params_vec.push(Box::new(id as i64));
            }
        }

        if let Some(ref category) = filter.category {
            conditions.push("category = ?");
            params_vec.push(Box::new(category.clone()));
        }

        if let Some(status) = filter.status {
            conditions.push("status = ?");
            params_vec.push(Box::new(status.as_str().to_string()));
        }

        if let Some(from) = filter.scheduled_from {
            conditions.push("scheduled_at >= ?");
            params_vec.push(Box::new(from.to_string()));
        }

        if let Some(to) = filter.scheduled_to {
            conditions.push("scheduled_at <= ?");
            params_vec.push(Box::new(to.to_string()));
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(ITEM_ORDER_CLAUSE);

        let mut stmt = self
            .connection
            .prepare(&query)
            .map_err(|e| PlannerError::database_error("Failed to prepare query", e))?;

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let items = stmt
            .query_map(&params_refs[..], Self::build_item_from_row)
            .map_err(|e| PlannerError::database_error("Failed to query items", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| PlannerError::database_error("Failed to fetch items", e))?;

        Ok(items)
    }

    /// Updates the supplied fields of an item.
    ///
    /// Returns `Ok(false)` when the item does not exist or the request is
    /// empty; a missing id is a normal outcome for idempotent callers, not
    /// an error. When at least one field is supplied, `updated_at` is
    /// refreshed even if the new value equals the old one. A parent change
    /// that would make the item its own descendant fails with
    /// `InvalidInput` and leaves the tree unchanged.
    pub fn update_item(&mut self, id: u64, changes: &UpdateItemRequest) -> Result<bool> {
        if changes.is_empty() {
            return Ok(false);
        }

        if let Some(name) = &changes.name {
            if name.trim().is_empty() {
                return Err(PlannerError::invalid_input("name", "Name must not be blank"));
            }
        }

        let metadata_json = changes
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let exists: bool = tx
            .query_row(CHECK_ITEM_EXISTS_SQL, params![id as i64], |row| row.get(0))
            .db_context("Failed to check item existence")?;

        if !exists {
            return Ok(false);
        }

        if let Some(Some(new_parent)) = changes.parent {
            Self::ensure_no_cycle(&tx, id, new_parent)?;
        }

        let mut assignments: Vec<&str> = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = changes.name {
            assignments.push("name = ?");
            params_vec.push(Box::new(name.clone()));
        }
        if let Some(ref description) = changes.description {
            assignments.push("description = ?");
            params_vec.push(Box::new(description.clone()));
        }
        if let Some(ref category) = changes.category {
            assignments.push("category = ?");
            params_vec.push(Box::new(category.clone()));
        }
        if let Some(parent) = changes.parent {
            assignments.push("parent_id = ?");
            params_vec.push(Box::new(parent.map(|v| v as i64)));
        }
        if let Some(date) = changes.scheduled_at {
            assignments.push("scheduled_at = ?");
            params_vec.push(Box::new(date.to_string()));
        }
        if let Some(date) = changes.deadline {
            assignments.push("deadline = ?");
            params_vec.push(Box::new(date.to_string()));
        }
        if let Some(status) = changes.status {
            assignments.push("status = ?");
            params_vec.push(Box::new(status.as_str().to_string()));
        }
        if let Some(json) = metadata_json {
            assignments.push("metadata = ?");
            params_vec.push(Box::new(json));
        }

        assignments.push("updated_at = ?");
        params_vec.push(Box::new(Timestamp::now().to_string()));
        params_vec.push(Box::new(id as i64));

        let sql = format!("UPDATE items SET {} WHERE id = ?", assignments.join(", "));
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        tx.execute(&sql, &params_refs[..])
            .map_err(|e| PlannerError::database_error("Failed to update item", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(true)
    }

    /// Verify that reparenting `item_id` under `new_parent` keeps the parent
    /// relation acyclic.
    ///
    /// Walks the ancestor chain upward from the proposed parent; reaching
    /// `item_id` means the item would become its own descendant. The first
    /// lookup also confirms the proposed parent exists.
    fn ensure_no_cycle(conn: &rusqlite::Connection, item_id: u64, new_parent: u64) -> Result<()> {
        let mut cursor = new_parent;
        loop {
            if cursor == item_id {
                return Err(PlannerError::invalid_input(
                    "parent_id",
                    format!(
                        "Setting parent_id to {new_parent} would make item {item_id} its own \
                         descendant"
                    ),
                ));
            }

            let parent: Option<i64> = conn
                .query_row(SELECT_PARENT_SQL, params![cursor as i64], |row| row.get(0))
                .map_err(|e| {
                    if matches!(e, rusqlite::Error::QueryReturnedNoRows) {
                        PlannerError::ItemNotFound { id: cursor }
                    } else {
                        PlannerError::database_error("Failed to walk ancestor chain", e)
                    }
                })?;

            match parent {
                Some(next) => cursor = next as u64,
                None => return Ok(()),
            }
        }
    }
}
