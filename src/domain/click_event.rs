//! Click event model for asynchronous click counting.

/// A successful redirect waiting to be counted.
///
/// Created by the redirect handler after the target has been resolved and
/// re-validated, then handed to [`crate::domain::click_worker::run_click_worker`]
/// through a bounded channel so the redirect response never waits on the
/// counter update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub code: String,
}

impl ClickEvent {
    /// Creates a click event for the given short code.
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}
