//! Session token codec: HS256 JWT carrying a single email claim.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// The authenticated principal. Self-asserted at login, carried by the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
}

impl Identity {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// Claims included in issued session tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub email: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

/// Sign a token for `identity`, valid from `now` for `security.token_ttl`.
pub fn issue(
    identity: &Identity,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time"))?
        .as_secs() as i64;
    let exp = iat + security.token_ttl.as_secs() as i64;

    let claims = Claims {
        email: identity.email.clone(),
        iat,
        exp,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify signature, algorithm and expiry and return the carried identity.
///
/// Every failure maps to the same `Unauthorized` error; the reason is only
/// visible in debug logs.
pub fn verify(token: &str, security: &SecurityConfig) -> Result<Identity, AppError> {
    let mut validation = Validation::new(security.algorithm);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "iat"]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map_err(|e| {
        let reason = match e.kind() {
            ErrorKind::ExpiredSignature => "token_expired",
            ErrorKind::InvalidSignature => "invalid_signature",
            ErrorKind::InvalidAlgorithm => "invalid_algorithm",
            _ => "invalid_token",
        };
        debug!(reason, "session token rejected");
        AppError::unauthorized()
    })?;

    if data.claims.email.is_empty() {
        debug!(reason = "empty_email", "session token rejected");
        return Err(AppError::unauthorized());
    }

    Ok(Identity::new(data.claims.email))
}
