#![allow(dead_code)]

use std::sync::Arc;
use std::time::SystemTime;

use actix_web::cookie::Cookie;
use actix_web::test::TestRequest;
use jobboard::auth::{token, Identity};
use jobboard::config::cookie::{CookiePolicy, SESSION_COOKIE};
use jobboard::state::app_state::AppState;
use jobboard::state::security_config::SecurityConfig;
use jobboard::store::{Document, RecordStore};
use serde_json::Value;

// Logging is auto-installed for every test binary that includes this module
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

pub const TEST_SECRET: &str = "test_secret_key_for_testing_purposes_only";

pub fn security() -> SecurityConfig {
    SecurityConfig::new(TEST_SECRET.as_bytes())
}

/// AppState over `store` with the test secret and development cookies.
pub fn state_with(store: Arc<dyn RecordStore>) -> AppState {
    AppState::new(store, security(), CookiePolicy::default())
}

/// A valid session cookie for `email`.
pub fn session_for(email: &str) -> Cookie<'static> {
    let token = token::issue(&Identity::new(email), SystemTime::now(), &security())
        .expect("issue token");
    Cookie::new(SESSION_COOKIE, token)
}

/// Attach a session cookie for `email` to `req`.
pub fn as_user(req: TestRequest, email: &str) -> TestRequest {
    req.cookie(session_for(email))
}

pub fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
