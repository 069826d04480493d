//! Filter types for querying items.

use jiff::civil::Date;

use super::ItemStatus;

/// Parent dimension of an item query.
///
/// "No filter on parent" and "top-level items only" are distinct modes and
/// must never be conflated: `Any` matches every item, `TopLevel` matches
/// only items with no parent, `ChildrenOf` matches the direct children of
/// one item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParentFilter {
    /// Do not filter on the parent relationship
    #[default]
    Any,

    /// Only top-level plans (`parent_id IS NULL`)
    TopLevel,

    /// Only direct children of the given item
    ChildrenOf(u64),
}

/// Filter options for querying items. All supplied filters AND-combine.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    /// Parent relationship mode
    pub parent: ParentFilter,

    /// Filter by category (exact match)
    pub category: Option<String>,

    /// Filter by status
    pub status: Option<ItemStatus>,

    /// Filter by scheduled date range (inclusive bounds)
    pub scheduled_from: Option<Date>,
    pub scheduled_to: Option<Date>,
}

impl ItemFilter {
    /// Filter matching the direct children of an item.
    pub fn children_of(parent_id: u64) -> Self {
        Self {
            parent: ParentFilter::ChildrenOf(parent_id),
            ..Default::default()
        }
    }

    /// Filter matching top-level plans only.
    pub fn top_level() -> Self {
        Self {
            parent: ParentFilter::TopLevel,
            ..Default::default()
        }
    }
}
