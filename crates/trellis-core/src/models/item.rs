//! Item model definition and related functionality.

use jiff::{civil::Date, Timestamp};
use serde::{Deserialize, Serialize};

use super::ItemStatus;

/// A single node in the plan hierarchy.
///
/// Items with no `parent_id` are plans; items referencing another item's id
/// are steps belonging to that parent. Both shapes share every other field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    /// Unique identifier, assigned by the store and never reused
    pub id: u64,

    /// ID of the parent item; `None` marks a top-level plan
    pub parent_id: Option<u64>,

    /// Name of the item
    pub name: String,

    /// Detailed multi-line description of the item
    pub description: Option<String>,

    /// Free-form classification label (defaults to "general")
    pub category: String,

    /// Intended start/occurrence date
    pub scheduled_at: Option<Date>,

    /// Date the item should be finished by
    pub deadline: Option<Date>,

    /// Current status of the item
    #[serde(default)]
    pub status: ItemStatus,

    /// Opaque key-value document, persisted as JSON text
    #[serde(default = "empty_metadata")]
    pub metadata: serde_json::Value,

    /// Timestamp when the item was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the item was last modified (UTC)
    pub updated_at: Timestamp,
}

impl Item {
    /// Whether this item is a top-level plan.
    pub fn is_plan(&self) -> bool {
        self.parent_id.is_none()
    }
}

pub(crate) fn empty_metadata() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}
