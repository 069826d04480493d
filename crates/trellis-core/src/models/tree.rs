//! Materialized subtree model.

use serde::{Deserialize, Serialize};

use super::Item;

/// An item together with its recursively materialized descendants.
///
/// Serializes with the item's fields inlined and a `children` array, so a
/// tree round-trips as the nested JSON document callers expect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemTree {
    #[serde(flatten)]
    pub item: Item,

    /// Direct children in repository query order
    #[serde(default)]
    pub children: Vec<ItemTree>,
}

impl ItemTree {
    /// Number of items in the subtree, the root included.
    pub fn count(&self) -> u64 {
        1 + self.children.iter().map(ItemTree::count).sum::<u64>()
    }

    /// Depth-first iteration over every item in the subtree.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(&node.item)
        })
    }
}
