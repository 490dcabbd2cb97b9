//! Backend test support utilities
//!
//! Shared helpers for the backend's unit and integration tests: logging
//! bootstrap, problem-details assertions, and unique fixture data.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
