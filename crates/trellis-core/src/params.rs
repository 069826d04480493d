//! Parameter structures for store operations.
//!
//! These shared structures pass data between interface layers (CLI, MCP)
//! and the core without framework-specific derives leaking inward:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │   MCP Params    │    │  Core Params    │
//! │  (clap derives) │───▶│ (serde derives) │───▶│ (minimal deps)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Interface layers add their own derives (clap `Args`, `schemars`) on
//! wrapper types and convert into these structs, so the planner API stays
//! identical across front ends. Dates and statuses arrive here as strings;
//! parsing and validation happen on conversion into the typed request
//! structs in [`crate::models::requests`] or in [`crate::policy`].

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Generic parameters for operations requiring just an ID.
///
/// Used for `show_item`, `show_tree`, and `count_subtree`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The ID of the item to operate on
    pub id: u64,
}

/// Parameters for creating a new top-level plan.
///
/// The scheduling dates are ISO `YYYY-MM-DD` strings; they go through the
/// full validation policy (parse, roll-forward, order check) before the
/// plan is persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CreatePlan {
    /// Name of the plan (required, non-blank)
    pub name: String,
    /// Optional detailed description of the plan
    pub description: Option<String>,
    /// Classification label; defaults to "general" when absent
    pub category: Option<String>,
    /// When the plan starts (ISO 8601: YYYY-MM-DD)
    pub scheduled_at: Option<String>,
    /// When the plan should be finished (ISO 8601: YYYY-MM-DD)
    pub deadline: Option<String>,
    /// Arbitrary JSON document with extra data (e.g. `{"budget": 500}`)
    pub metadata: Option<serde_json::Value>,
}

/// Parameters for adding a step to an existing item.
///
/// The step inherits the parent's category; its scheduled date is parsed
/// strictly but the roll-forward policy is not applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct AddStep {
    /// ID of the parent item
    pub parent_id: u64,
    /// Name of the step (required, non-blank)
    pub name: String,
    /// Optional detailed description of the step
    pub description: Option<String>,
    /// When this step should happen (ISO 8601: YYYY-MM-DD)
    pub scheduled_at: Option<String>,
    /// Arbitrary JSON document with extra data
    pub metadata: Option<serde_json::Value>,
}

/// Parameters for a filtered item listing.
///
/// `parent_id` and `top_level` select the parent mode: neither means "no
/// parent filter", `top_level` restricts to plans, `parent_id` restricts to
/// one item's direct children. Supplying both is an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct QueryItems {
    /// List only the direct children of this item
    pub parent_id: Option<u64>,
    /// List only top-level plans
    #[serde(default)]
    pub top_level: bool,
    /// Filter by category
    pub category: Option<String>,
    /// Filter by status ('pending', 'in_progress', 'completed', 'cancelled')
    pub status: Option<String>,
    /// Earliest scheduled date to include (ISO 8601, inclusive)
    pub scheduled_from: Option<String>,
    /// Latest scheduled date to include (ISO 8601, inclusive)
    pub scheduled_to: Option<String>,
}

/// Parameters for updating an existing item.
///
/// Only supplied fields change; `updated_at` refreshes whenever at least
/// one field is supplied. `parent_id` moves the item under another item,
/// `detach` moves it to top level; the two are mutually exclusive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct UpdateItem {
    /// Item ID to update (required)
    pub id: u64,
    /// New name for the item
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New category label
    pub category: Option<String>,
    /// Move the item under this parent
    pub parent_id: Option<u64>,
    /// Move the item to top level (mutually exclusive with `parent_id`)
    #[serde(default)]
    pub detach: bool,
    /// New scheduled date (ISO 8601: YYYY-MM-DD)
    pub scheduled_at: Option<String>,
    /// New deadline (ISO 8601: YYYY-MM-DD)
    pub deadline: Option<String>,
    /// New status ('pending', 'in_progress', 'completed', 'cancelled')
    pub status: Option<String>,
    /// Replacement metadata document
    pub metadata: Option<serde_json::Value>,
}

/// Parameters for deleting an item and its entire subtree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct DeleteItem {
    /// ID of the item to delete
    pub id: u64,
    /// Confirm the cascading deletion (required to prevent accidents)
    #[serde(default)]
    pub confirmed: bool,
}

/// Parameters for changing just an item's status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct SetStatus {
    /// ID of the item
    pub id: u64,
    /// New status ('pending', 'in_progress', 'completed', 'cancelled')
    pub status: String,
}

/// Parameters for changing just an item's scheduled date.
///
/// Reschedules are explicit and intentional, so the roll-forward policy
/// does not re-apply; the date is only parsed for validity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Reschedule {
    /// ID of the item
    pub id: u64,
    /// New scheduled date (ISO 8601: YYYY-MM-DD)
    pub scheduled_at: String,
}

impl From<SetStatus> for UpdateItem {
    fn from(params: SetStatus) -> Self {
        UpdateItem {
            id: params.id,
            status: Some(params.status),
            ..Default::default()
        }
    }
}

impl From<Reschedule> for UpdateItem {
    fn from(params: Reschedule) -> Self {
        UpdateItem {
            id: params.id,
            scheduled_at: Some(params.scheduled_at),
            ..Default::default()
        }
    }
}

impl TryFrom<&QueryItems> for crate::models::ItemFilter {
    type Error = crate::PlannerError;

    /// Resolve listing parameters into a typed filter.
    ///
    /// Rejects the ambiguous combination of `parent_id` and `top_level`,
    /// and parses the status and date-range strings.
    fn try_from(params: &QueryItems) -> Result<Self, Self::Error> {
        use std::str::FromStr;

        use crate::models::{ItemStatus, ParentFilter};

        let parent = match (params.parent_id, params.top_level) {
            (Some(_), true) => {
                return Err(crate::PlannerError::invalid_input(
                    "parent_id",
                    "Cannot be combined with 'top_level'",
                ));
            }
            (Some(id), false) => ParentFilter::ChildrenOf(id),
            (None, true) => ParentFilter::TopLevel,
            (None, false) => ParentFilter::Any,
        };

        let status = params
            .status
            .as_deref()
            .map(|s| {
                ItemStatus::from_str(s).map_err(|_| {
                    crate::PlannerError::invalid_input(
                        "status",
                        format!(
                            "Invalid status: {s}. Must be 'pending', 'in_progress', \
                             'completed', or 'cancelled'"
                        ),
                    )
                })
            })
            .transpose()?;

        let scheduled_from = params
            .scheduled_from
            .as_deref()
            .map(|s| crate::policy::parse_date("scheduled_from", s))
            .transpose()?;
        let scheduled_to = params
            .scheduled_to
            .as_deref()
            .map(|s| crate::policy::parse_date("scheduled_to", s))
            .transpose()?;

        Ok(Self {
            parent,
            category: params.category.clone(),
            status,
            scheduled_from,
            scheduled_to,
        })
    }
}
