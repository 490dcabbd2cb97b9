//! Helpers for service-level tests, shared by unit and integration tests.

pub mod app_builder;
pub mod spy_store;

pub use app_builder::{create_test_app_builder, TestAppBuilder};
pub use spy_store::SpyStore;
