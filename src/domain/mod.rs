//! Domain layer containing business entities and logic.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click counting event model
//! - [`click_worker`] - Asynchronous click counter worker
//!
//! # Click Processing Flow
//!
//! 1. Redirect handler resolves a code and answers immediately
//! 2. [`click_event::ClickEvent`] is sent to a bounded channel
//! 3. [`click_worker::run_click_worker`] applies increments with retry logic
//! 4. Counters are persisted via [`repositories::LinkRepository::increment_click_count`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
