//! Retry policy and response classification for endpoint probes.
//!
//! The policy itself is pure; the async driver that sleeps between
//! attempts lives with the transport.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::constants::{
    BACKOFF_BASE, MAX_VALIDATION_ATTEMPTS, STATUS_BAD_REQUEST, STATUS_CONFLICT, STATUS_NOT_FOUND,
    STATUS_OK, STATUS_UNAUTHORIZED,
};
use crate::endpoints::EndpointName;

/// Why a probe stopped the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FatalReason {
    /// 404: the endpoint no longer exists.
    EndpointMissing,
    /// 401: the session was rejected.
    Unauthorized,
    RetriesExhausted { attempts: u32, last: String },
    /// The request could not even be built from the endpoint table.
    InvalidRequest(String),
}

impl fmt::Display for FatalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndpointMissing => f.write_str("endpoint not found (404)"),
            Self::Unauthorized => f.write_str("authentication rejected (401)"),
            Self::RetriesExhausted { attempts, last } => {
                write!(f, "still failing after {attempts} attempts ({last})")
            }
            Self::InvalidRequest(why) => write!(f, "request could not be built: {why}"),
        }
    }
}

/// Outcome of one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Success,
    Transient(String),
    Fatal(FatalReason),
}

impl Verdict {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Classify a probe response for `endpoint`.
///
/// 409 means "already done" and counts as success. The warbond endpoint
/// answers 400 to the minimal probe payload for business reasons, which
/// still proves the route exists.
#[must_use]
pub fn classify_probe(endpoint: EndpointName, status: u16) -> Verdict {
    match status {
        STATUS_OK | STATUS_CONFLICT => Verdict::Success,
        STATUS_BAD_REQUEST if endpoint == EndpointName::Warbond => Verdict::Success,
        STATUS_NOT_FOUND => Verdict::Fatal(FatalReason::EndpointMissing),
        STATUS_UNAUTHORIZED => Verdict::Fatal(FatalReason::Unauthorized),
        other => Verdict::Transient(format!("status {other}")),
    }
}

/// Bounded attempts with exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RetryPolicy {
    #[serde(default = "RetryPolicy::default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "RetryPolicy::default_backoff_base")]
    pub backoff_base: u64,
}

impl RetryPolicy {
    const fn default_max_attempts() -> u32 {
        MAX_VALIDATION_ATTEMPTS
    }

    const fn default_backoff_base() -> u64 {
        BACKOFF_BASE
    }

    /// Delay after the failed attempt numbered `attempt` (1-based):
    /// `base^attempt` seconds, so 2 s then 4 s with the defaults.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_secs(self.backoff_base.saturating_pow(attempt))
    }

    /// Whether another attempt may follow the failed attempt `attempt`.
    #[must_use]
    pub const fn has_attempts_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: Self::default_max_attempts(),
            backoff_base: Self::default_backoff_base(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_statuses() {
        assert!(classify_probe(EndpointName::User, 200).is_success());
        assert!(classify_probe(EndpointName::CheckIn, 409).is_success());
        assert!(classify_probe(EndpointName::Warbond, 400).is_success());
    }

    #[test]
    fn bad_request_is_transient_off_the_warbond_route() {
        assert!(matches!(
            classify_probe(EndpointName::User, 400),
            Verdict::Transient(_)
        ));
        assert!(matches!(
            classify_probe(EndpointName::Treasury, 503),
            Verdict::Transient(_)
        ));
    }

    #[test]
    fn contract_breaks_are_fatal() {
        assert_eq!(
            classify_probe(EndpointName::User, 404),
            Verdict::Fatal(FatalReason::EndpointMissing)
        );
        assert_eq!(
            classify_probe(EndpointName::Warbond, 401),
            Verdict::Fatal(FatalReason::Unauthorized)
        );
    }

    #[test]
    fn default_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert!(policy.has_attempts_after(2));
        assert!(!policy.has_attempts_after(3));
    }
}
