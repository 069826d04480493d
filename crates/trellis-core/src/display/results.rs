//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::models::Item;

/// Wrapper type for displaying the result of create operations.
///
/// Formats a success line with the new id followed by the full item view.
pub struct CreateResult {
    pub resource: Item,
}

impl CreateResult {
    /// Create a new CreateResult wrapper.
    pub fn new(resource: Item) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.resource.is_plan() { "plan" } else { "step" };
        writeln!(f, "Created {kind} with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of update operations.
///
/// Tracks which fields were touched so the caller sees what actually
/// changed, followed by the refreshed item.
pub struct UpdateResult {
    pub resource: Item,
    pub changes: Vec<String>,
}

impl UpdateResult {
    /// Create an UpdateResult with a list of changes made.
    pub fn with_changes(resource: Item, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl fmt::Display for UpdateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Updated item with ID: {}", self.resource.id)?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of a cascading delete.
#[derive(Debug)]
pub struct DeleteResult {
    pub id: u64,
    pub name: String,
    pub removed: u64,
}

impl DeleteResult {
    /// Create a new DeleteResult wrapper.
    pub fn new(id: u64, name: String, removed: u64) -> Self {
        Self { id, name, removed }
    }
}

impl fmt::Display for DeleteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted '{}' (ID: {}): {} item(s) removed",
            self.name, self.id, self.removed
        )
    }
}
