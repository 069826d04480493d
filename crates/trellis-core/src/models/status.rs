//! Status enumeration for items.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of item statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Item has not been started yet
    #[default]
    Pending,

    /// Item is being worked on
    InProgress,

    /// Item has been completed
    Completed,

    /// Item was abandoned
    Cancelled,
}

impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ItemStatus::Pending),
            "in_progress" | "inprogress" => Ok(ItemStatus::InProgress),
            "completed" => Ok(ItemStatus::Completed),
            "cancelled" => Ok(ItemStatus::Cancelled),
            _ => Err(format!("Invalid item status: {s}")),
        }
    }
}

impl ItemStatus {
    /// Convert to the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::InProgress => "in_progress",
            ItemStatus::Completed => "completed",
            ItemStatus::Cancelled => "cancelled",
        }
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trellis_core::models::ItemStatus;
    ///
    /// assert_eq!(ItemStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(ItemStatus::Pending.with_icon(), "○ Pending");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "○ Pending",
            ItemStatus::InProgress => "➤ In Progress",
            ItemStatus::Completed => "✓ Completed",
            ItemStatus::Cancelled => "✗ Cancelled",
        }
    }
}
