//! REST API layer for HTTP request/response handling.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers, including the public redirect
//! - [`middleware`] - Request tracing
//! - [`routes`] - JSON API route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
