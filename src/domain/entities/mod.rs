//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures. Creation inputs live in separate
//! `New*` structs so that database-assigned fields (ids, timestamps,
//! counters) never have to be invented by callers.
//!
//! # Entity Types
//!
//! - [`ShortLink`] - A key bound to a target URL
//! - [`Visit`] - One recorded access against a [`ShortLink`]

pub mod link;
pub mod visit;

pub use link::{NewShortLink, ShortLink};
pub use visit::{NewVisit, UNKNOWN, Visit};
