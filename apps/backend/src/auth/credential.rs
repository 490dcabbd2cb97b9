use actix_web::HttpRequest;

use crate::config::cookie::SESSION_COOKIE;

/// What the transport carried in the session slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Present(String),
    Absent,
}

impl Credential {
    /// Read the session cookie. An empty value counts as absent.
    pub fn from_request(req: &HttpRequest) -> Self {
        match req.cookie(SESSION_COOKIE) {
            Some(cookie) if !cookie.value().is_empty() => {
                Credential::Present(cookie.value().to_string())
            }
            _ => Credential::Absent,
        }
    }
}
