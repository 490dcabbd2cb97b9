//! Session cookie attributes per deployment environment.

use actix_web::cookie::{Cookie, SameSite};

/// Name of the transport slot that carries the session token.
pub const SESSION_COOKIE: &str = "token";

/// Deployment environment, as far as cookie attributes care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeEnv {
    #[default]
    Development,
    Production,
}

impl RuntimeEnv {
    /// `production` (any case) selects production; everything else is development.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("production") {
            RuntimeEnv::Production
        } else {
            RuntimeEnv::Development
        }
    }
}

/// Attributes applied to the session cookie on login and logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookiePolicy {
    /// Cross-site frontends in production need `SameSite=None`, which browsers
    /// only accept together with `Secure`.
    pub fn for_env(env: RuntimeEnv) -> Self {
        match env {
            RuntimeEnv::Production => Self {
                secure: true,
                same_site: SameSite::None,
            },
            RuntimeEnv::Development => Self {
                secure: false,
                same_site: SameSite::Strict,
            },
        }
    }

    /// HTTP-only session cookie carrying `token`.
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, token)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .finish()
    }

    /// Removal cookie (empty value, expired) with the same attributes.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.session_cookie(String::new());
        cookie.make_removal();
        cookie
    }
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self::for_env(RuntimeEnv::Development)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_env_parse() {
        assert_eq!(RuntimeEnv::parse("production"), RuntimeEnv::Production);
        assert_eq!(RuntimeEnv::parse(" Production "), RuntimeEnv::Production);
        assert_eq!(RuntimeEnv::parse("development"), RuntimeEnv::Development);
        assert_eq!(RuntimeEnv::parse(""), RuntimeEnv::Development);
    }

    #[test]
    fn test_production_cookie_attributes() {
        let cookie = CookiePolicy::for_env(RuntimeEnv::Production).session_cookie("abc".into());
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_development_cookie_attributes() {
        let cookie = CookiePolicy::for_env(RuntimeEnv::Development).session_cookie("abc".into());
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    }

    #[test]
    fn test_removal_cookie_is_expired_and_empty() {
        let cookie = CookiePolicy::default().removal_cookie();
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age().map(|d| d.whole_seconds()), Some(0));
    }
}
