//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin CLI. All URL and code validation happens here,
//! before any store mutation.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation, editing and redirect resolution

pub mod services;
