//! Collection wrapper types for displaying groups of items.

use std::fmt;

use crate::models::Item;

/// Newtype wrapper for displaying a list of items compactly.
///
/// One line per item, with id, name, category, status, and scheduled date.
/// Handles the empty collection gracefully.
pub struct Items(pub Vec<Item>);

impl Items {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of items in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the items.
    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.0.iter()
    }
}

impl IntoIterator for Items {
    type Item = Item;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Items {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Items {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No items found.")
        } else {
            for item in &self.0 {
                let date = item
                    .scheduled_at
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "no date".to_string());
                writeln!(
                    f,
                    "- [{}] {} ({}, {}) {}",
                    item.id, item.name, item.category, item.status, date
                )?;
            }
            Ok(())
        }
    }
}
