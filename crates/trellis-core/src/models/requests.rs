//! Request types for creating and updating items.

use std::str::FromStr;

use jiff::civil::Date;

use super::{item::empty_metadata, ItemStatus};
use crate::{policy, PlannerError};

/// Fields for inserting a new item.
///
/// Date fields are already parsed; callers that accept text dates go
/// through [`crate::policy`] first.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub parent_id: Option<u64>,
    pub description: Option<String>,
    pub category: String,
    pub scheduled_at: Option<Date>,
    pub deadline: Option<Date>,
    pub metadata: serde_json::Value,
}

impl Default for NewItem {
    fn default() -> Self {
        Self {
            name: String::new(),
            parent_id: None,
            description: None,
            category: "general".to_string(),
            scheduled_at: None,
            deadline: None,
            metadata: empty_metadata(),
        }
    }
}

/// Fields for adding a step under an existing parent.
///
/// Carries no category: the step inherits the parent's category at
/// creation time (a one-time copy, not a live link).
#[derive(Debug, Clone)]
pub struct NewStep {
    pub name: String,
    pub description: Option<String>,
    pub scheduled_at: Option<Date>,
    pub metadata: serde_json::Value,
}

impl Default for NewStep {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            scheduled_at: None,
            metadata: empty_metadata(),
        }
    }
}

/// Parameters for a field-level item update.
///
/// Every field is optional; an absent field is left untouched. `parent`
/// uses a nested option: `Some(Some(id))` reparents the item, `Some(None)`
/// detaches it to top level, `None` leaves the parent unchanged.
#[derive(Debug, Default)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub parent: Option<Option<u64>>,
    pub scheduled_at: Option<Date>,
    pub deadline: Option<Date>,
    pub status: Option<ItemStatus>,
    pub metadata: Option<serde_json::Value>,
}

impl UpdateItemRequest {
    /// Whether the request carries no field at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.parent.is_none()
            && self.scheduled_at.is_none()
            && self.deadline.is_none()
            && self.status.is_none()
            && self.metadata.is_none()
    }
}

impl TryFrom<crate::params::UpdateItem> for UpdateItemRequest {
    type Error = PlannerError;

    /// Convert caller-facing update parameters into a validated request.
    ///
    /// Parses the status string and any date strings, and resolves the
    /// `parent_id`/`detach` pair into the nested parent option. Invalid
    /// status values are rejected here, before they can reach the
    /// repository.
    fn try_from(params: crate::params::UpdateItem) -> Result<Self, Self::Error> {
        if let Some(name) = &params.name {
            if name.trim().is_empty() {
                return Err(PlannerError::invalid_input("name", "Name must not be blank"));
            }
        }

        let status = params
            .status
            .as_deref()
            .map(|s| {
                ItemStatus::from_str(s).map_err(|_| {
                    PlannerError::invalid_input(
                        "status",
                        format!(
                            "Invalid status: {s}. Must be 'pending', 'in_progress', \
                             'completed', or 'cancelled'"
                        ),
                    )
                })
            })
            .transpose()?;

        let scheduled_at = params
            .scheduled_at
            .as_deref()
            .map(|s| policy::parse_date("scheduled_at", s))
            .transpose()?;
        let deadline = params
            .deadline
            .as_deref()
            .map(|s| policy::parse_date("deadline", s))
            .transpose()?;

        let parent = match (params.parent_id, params.detach) {
            (Some(_), true) => {
                return Err(PlannerError::invalid_input(
                    "parent_id",
                    "Cannot be combined with 'detach'",
                ));
            }
            (Some(id), false) => Some(Some(id)),
            (None, true) => Some(None),
            (None, false) => None,
        };

        Ok(Self {
            name: params.name,
            description: params.description,
            category: params.category,
            parent,
            scheduled_at,
            deadline,
            status,
            metadata: params.metadata,
        })
    }
}
