//! Link repository implementations.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - PostgreSQL storage via SQLx, used in production
//! - [`InMemoryLinkRepository`] - process-local storage for development and tests

pub mod memory_link_repository;
pub mod pg_link_repository;

pub use memory_link_repository::InMemoryLinkRepository;
pub use pg_link_repository::PgLinkRepository;
