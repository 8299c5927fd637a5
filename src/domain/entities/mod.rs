//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Link`] - A short code mapped to a target URL, with its click counter
//!
//! # Design Pattern
//!
//! Entities follow the "New Type" pattern with separate structs for creation:
//! - `NewLink` - For inserting new records
//! - `LinkPatch` - For partial updates

pub mod link;

pub use link::{Link, LinkPatch, NewLink};
