#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod test_support;
pub mod trace_ctx;

// Re-exports for public API
pub use auth::{Credential, Identity};
pub use config::{AppConfig, CookiePolicy, RuntimeEnv, StoreBackend};
pub use error::AppError;
pub use errors::{DomainError, ErrorCode};
pub use extractors::{CurrentIdentity, ValidatedJson};
pub use infra::state::{build_state, StateBuilder};
pub use middleware::{
    cors_middleware, RequestTrace, SecurityHeaders, SessionGuard, StructuredLogger, TraceSpan,
};
pub use policy::{Access, Decision, Role, RouteIntent};
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;
pub use store::{Collection, Document, Field, Filter, MemoryStore, Query, RecordStore, SeaStore};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
