//! Display implementations for domain models.
//!
//! All output is markdown so both the terminal renderer and the MCP text
//! responses can share one formatting path.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{Item, ItemStatus, ItemTree};

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.name)?;
        writeln!(f)?;

        // Metadata section
        writeln!(f, "- Status: {}", self.status.with_icon())?;
        writeln!(f, "- Category: {}", self.category)?;
        if let Some(parent_id) = self.parent_id {
            writeln!(f, "- Parent: {parent_id}")?;
        }
        if let Some(date) = self.scheduled_at {
            writeln!(f, "- Scheduled: {date}")?;
        }
        if let Some(date) = self.deadline {
            writeln!(f, "- Deadline: {date}")?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if let Some(object) = self.metadata.as_object() {
            if !object.is_empty() {
                writeln!(f, "- Metadata: {}", self.metadata)?;
            }
        }

        // Description as a paragraph
        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        Ok(())
    }
}

impl ItemTree {
    /// Format one node of the tree as an indented list entry.
    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        write!(
            f,
            "{indent}- [{}] {} ({})",
            self.item.id,
            self.item.name,
            self.item.status.with_icon()
        )?;
        if let Some(date) = self.item.scheduled_at {
            write!(f, " {date}")?;
        }
        writeln!(f)?;

        for child in &self.children {
            child.fmt_node(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for ItemTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.item)?;

        if self.children.is_empty() {
            writeln!(f, "\nNo steps under this item.")?;
        } else {
            writeln!(f, "\n## Steps")?;
            writeln!(f)?;
            for child in &self.children {
                child.fmt_node(f, 0)?;
            }
        }

        Ok(())
    }
}
