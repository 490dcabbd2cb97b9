use std::sync::Arc;

use super::security_config::SecurityConfig;
use crate::config::cookie::CookiePolicy;
use crate::store::RecordStore;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Record store gateway; every data operation goes through it
    pub store: Arc<dyn RecordStore>,
    /// Security configuration including JWT settings
    pub security: SecurityConfig,
    /// Attributes for the session cookie
    pub cookie: CookiePolicy,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, security: SecurityConfig, cookie: CookiePolicy) -> Self {
        Self {
            store,
            security,
            cookie,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store.backend_name())
            .field("algorithm", &self.security.algorithm)
            .field("cookie", &self.cookie)
            .finish()
    }
}
