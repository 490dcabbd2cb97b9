use actix_web::web;
use serde::Deserialize;

pub mod auth;
pub mod bits;
pub mod health;
pub mod jobs;

/// `/{email}` path segment of self-only routes.
#[derive(Debug, Deserialize)]
pub struct OwnerPath {
    pub email: String,
}

/// `/{email}/{id}` path segments of id-addressed self-only routes.
#[derive(Debug, Deserialize)]
pub struct OwnedRecordPath {
    pub email: String,
    pub id: String,
}

/// Register every route. Protected resources carry their own `SessionGuard`,
/// so the same configuration serves `main.rs` and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    health::configure_routes(cfg);
    auth::configure_routes(cfg);
    jobs::configure_routes(cfg);
    bits::configure_routes(cfg);
}
