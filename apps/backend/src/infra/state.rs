use crate::config::app::AppConfig;
use crate::config::cookie::{CookiePolicy, RuntimeEnv};
use crate::config::store::StoreBackend;
use crate::error::AppError;
use crate::infra::db::open_store;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    runtime_env: RuntimeEnv,
    backend: StoreBackend,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::default(),
            runtime_env: RuntimeEnv::default(),
            backend: StoreBackend::Memory,
        }
    }

    /// Everything the binary reads from the environment.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new()
            .with_security(SecurityConfig::new(config.jwt_secret.as_bytes()))
            .with_env(config.runtime_env)
            .with_backend(config.store.clone())
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    pub fn with_env(mut self, env: RuntimeEnv) -> Self {
        self.runtime_env = env;
        self
    }

    pub fn with_backend(mut self, backend: StoreBackend) -> Self {
        self.backend = backend;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        if self.security_config.jwt_secret.is_empty() {
            return Err(AppError::config("JWT secret must not be empty"));
        }

        let store = open_store(&self.backend).await?;

        Ok(AppState::new(
            store,
            self.security_config,
            CookiePolicy::for_env(self.runtime_env),
        ))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

#[cfg(test)]
mod tests {
    use actix_web::cookie::SameSite;

    use super::*;

    #[tokio::test]
    async fn test_defaults_to_memory_store() {
        let state = build_state().build().await.unwrap();
        assert_eq!(state.store.backend_name(), "memory");
        assert_eq!(state.cookie.same_site, SameSite::Strict);
    }

    #[tokio::test]
    async fn test_production_cookies() {
        let state = build_state()
            .with_env(RuntimeEnv::Production)
            .build()
            .await
            .unwrap();
        assert!(state.cookie.secure);
        assert_eq!(state.cookie.same_site, SameSite::None);
    }

    #[tokio::test]
    async fn test_empty_secret_is_rejected() {
        let err = build_state()
            .with_security(SecurityConfig::new(Vec::new()))
            .build()
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }
}
