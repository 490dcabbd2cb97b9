use tracing::{debug, warn};

use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// A protected route was called without a credential.
pub fn credential_missing(path: &str) {
    debug!(
        event = "SECURITY_CREDENTIAL_MISSING",
        trace_id = %trace_ctx::trace_id(),
        path,
        "Request rejected: no session token"
    );
}

/// A credential was presented but failed verification.
pub fn credential_rejected(path: &str, reason: &str) {
    warn!(
        event = "SECURITY_CREDENTIAL_REJECTED",
        trace_id = %trace_ctx::trace_id(),
        path,
        reason,
        "Request rejected: invalid session token"
    );
}

/// An authenticated caller asked for a slice of data it does not own.
pub fn ownership_denied(identity_email: &str, route_email: &str) {
    warn!(
        event = "SECURITY_OWNERSHIP_DENIED",
        trace_id = %trace_ctx::trace_id(),
        identity = %Redacted(identity_email),
        requested = %Redacted(route_email),
        "Ownership check failed"
    );
}
