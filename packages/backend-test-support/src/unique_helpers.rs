//! Test helpers for generating unique test data
//!
//! ULID-suffixed values keep tests that share a store from colliding.

use ulid::Ulid;

/// Generate a unique string with the given prefix, `{prefix}-{ulid}`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("job");
/// let id2 = unique_str("job");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("job-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Generate a unique email address, `{prefix}-{ulid}@example.test`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let email = unique_email("employer");
/// assert!(email.starts_with("employer-"));
/// assert!(email.ends_with("@example.test"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new())
}
