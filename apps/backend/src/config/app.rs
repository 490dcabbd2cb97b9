//! Centralized application configuration loaded from environment variables.

use std::env;

use crate::config::cookie::RuntimeEnv;
use crate::config::store::StoreBackend;
use crate::error::AppError;

const DEFAULT_PORT: u16 = 5000;

/// Everything the binary needs from its environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Server configuration
    pub host: String,
    pub port: u16,

    // Security configuration
    pub jwt_secret: String,
    pub runtime_env: RuntimeEnv,

    // Record store
    pub store: StoreBackend,

    // CORS
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Load and validate configuration from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load and validate configuration through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // First name that is set wins.
        let first = |names: &[&str]| names.iter().find_map(|name| lookup(name));

        let host = lookup("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match first(&["PORT", "BACKEND_PORT"]) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AppError::config(format!("PORT must be a valid port number, got '{raw}'"))
            })?,
            None => DEFAULT_PORT,
        };

        let jwt_secret = first(&["JWT_SECRET", "TOKEN_SECRET"])
            .filter(|secret| !secret.trim().is_empty())
            .ok_or_else(|| AppError::config("JWT_SECRET (or TOKEN_SECRET) must be set"))?;

        let runtime_env = first(&["APP_ENV", "NODE_ENV"])
            .map(|raw| RuntimeEnv::parse(&raw))
            .unwrap_or_default();

        let store = StoreBackend::resolve(
            lookup("STORE_BACKEND").as_deref(),
            lookup("DATABASE_URL").as_deref(),
        )?;

        let cors_allowed_origins = parse_origins(&lookup("CORS_ALLOWED_ORIGINS").unwrap_or_default());

        Ok(Self {
            host,
            port,
            jwt_secret,
            runtime_env,
            store,
            cors_allowed_origins,
        })
    }
}

/// Comma-separated origins; blanks, `null` and non-http(s) entries are dropped.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.runtime_env, RuntimeEnv::Development);
        assert_eq!(config.store, StoreBackend::Memory);
        assert!(config.cors_allowed_origins.is_empty());
    }

    #[test]
    fn test_token_secret_alias_and_node_env() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("TOKEN_SECRET", "legacy"),
            ("NODE_ENV", "production"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.jwt_secret, "legacy");
        assert_eq!(config.runtime_env, RuntimeEnv::Production);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_missing_or_blank_secret_is_config_error() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));

        let err = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "   ")])).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("PORT", "http"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_parse_origins_filters_garbage() {
        let origins = parse_origins(" https://app.example.com ,null,,ftp://x, http://localhost:5173");
        assert_eq!(
            origins,
            vec![
                "https://app.example.com".to_string(),
                "http://localhost:5173".to_string()
            ]
        );
    }

    #[test]
    #[serial_test::serial]
    fn test_from_env_reads_process_environment() {
        std::env::set_var("JWT_SECRET", "from-env");
        std::env::set_var("STORE_BACKEND", "memory");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.jwt_secret, "from-env");

        std::env::remove_var("JWT_SECRET");
        std::env::remove_var("STORE_BACKEND");
    }
}
