//! Display formatting for items, trees, and operation results.
//!
//! Domain models implement [`std::fmt::Display`] directly (see [`models`]);
//! this module adds newtype wrappers for collections and operation results
//! so the same data can be formatted differently depending on context
//! (lists vs. individual items, creation results vs. updates) while every
//! front end shares one markdown output path.
//!
//! - [`collections`]: collection wrapper ([`Items`])
//! - [`results`]: operation result types ([`CreateResult`], [`UpdateResult`],
//!   [`DeleteResult`])
//! - [`status`]: status and confirmation messages ([`OperationStatus`])
//! - [`datetime`]: local-timezone timestamp formatting
//! - [`models`]: `Display` implementations for domain models

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

// Re-export commonly used types for convenience
pub use collections::Items;
pub use datetime::LocalDateTime;
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::OperationStatus;
