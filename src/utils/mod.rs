//! Short code generation and URL processing helpers.
//!
//! - [`code_generator`] - Short code generation and custom code validation
//! - [`url_normalizer`] - URL normalization, validation and advisory checks

pub mod code_generator;
pub mod url_normalizer;
