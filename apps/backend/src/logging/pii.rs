//! PII redaction for log output.
//!
//! Owner emails and session tokens show up in almost every access-control
//! log line; neither may be written in clear.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
});

// JWT segments and other opaque runs of 16+ token characters.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9_\-]{16,}={0,2}").unwrap()
});

// ULID record ids pass through untouched.
static ULID: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[0-7][0-9A-HJKMNP-TV-Z]{25}$").unwrap()
});

/// Masks emails (first character of the local part kept, domain kept) and
/// opaque tokens (`[REDACTED_TOKEN]`). Emails are handled first so their
/// domains are not mistaken for tokens; ULID record ids are left as-is.
pub fn redact(input: &str) -> String {
    let emails_masked = EMAIL.replace_all(input, |caps: &regex::Captures| {
        let full = &caps[0];
        match full.split_once('@') {
            Some((local, domain)) => match local.chars().next() {
                Some(first) => format!("{first}***@{domain}"),
                None => format!("@{domain}"),
            },
            None => full.to_string(),
        }
    });

    TOKEN
        .replace_all(&emails_masked, |caps: &regex::Captures| {
            let run = &caps[0];
            if ULID.is_match(run) {
                run.to_string()
            } else {
                "[REDACTED_TOKEN]".to_string()
            }
        })
        .into_owned()
}

/// Display wrapper that redacts on format.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
