use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use super::classify::FailureCause;

/// Status codes retried by default (subject to the failure's kind).
pub const DEFAULT_RETRYABLE_STATUS_CODES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// Share of the exponential delay used as the jitter window in each direction.
const JITTER_RATIO: f64 = 0.25;

/// Classification of a failed attempt.
///
/// Every HTTP status and every transport failure resolves to exactly one kind;
/// `Unknown` is the catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// HTTP 401.
    Unauthorized,
    /// HTTP 403.
    Forbidden,
    /// HTTP 400; the message is sanitized and never echoes the request.
    Validation,
    /// HTTP 404. The only kind that triggers endpoint fallback.
    NotFound,
    /// HTTP 429 with the server's `Retry-After` (60s when absent).
    RateLimited { retry_after: Duration },
    /// HTTP 5xx.
    ServerError,
    /// Connection, DNS or timeout failure (including HTTP 408).
    Transport,
    /// Any other non-success status.
    Unknown,
}

impl ErrorKind {
    /// Kinds that may be retried at all. Whether a specific failure is retried
    /// also depends on the policy's allow-lists.
    pub fn is_retry_class(&self) -> bool {
        matches!(
            self,
            ErrorKind::Transport | ErrorKind::ServerError | ErrorKind::RateLimited { .. }
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Unauthorized => write!(f, "unauthorized"),
            ErrorKind::Forbidden => write!(f, "forbidden"),
            ErrorKind::Validation => write!(f, "validation error"),
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::RateLimited { retry_after } => {
                write!(f, "rate limited (retry after {}s)", retry_after.as_secs())
            }
            ErrorKind::ServerError => write!(f, "server error"),
            ErrorKind::Transport => write!(f, "transport error"),
            ErrorKind::Unknown => write!(f, "unexpected response"),
        }
    }
}

/// How the wait between attempts grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffStrategy {
    Fixed,
    Linear,
    Exponential,
    #[default]
    ExponentialJitter,
    /// Unrecognized name in config; behaves like `Fixed`.
    #[serde(other)]
    Unknown,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this failure.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Retry and backoff parameters for one client.
///
/// Built once from configuration and shared read-only by every call.
/// `max_attempts` counts retries after the first attempt, so a call makes at
/// most `max_attempts + 1` requests; zero behaves like `enabled = false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub enabled: bool,
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Upper bound for the exponential strategies. Not validated against `base_delay`.
    pub max_delay: Duration,
    pub strategy: BackoffStrategy,
    pub retryable_status_codes: BTreeSet<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            strategy: BackoffStrategy::ExponentialJitter,
            retryable_status_codes: DEFAULT_RETRYABLE_STATUS_CODES.into_iter().collect(),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Backoff delay before retry number `attempt` (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        match self.strategy {
            BackoffStrategy::Fixed | BackoffStrategy::Unknown => self.base_delay,
            BackoffStrategy::Linear => self.base_delay.saturating_mul(attempt),
            BackoffStrategy::Exponential => self.exponential(attempt),
            BackoffStrategy::ExponentialJitter => jitter(self.exponential(attempt)),
        }
    }

    /// `base * 2^(attempt-1)`, capped at `max_delay`.
    fn exponential(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(31);
        self.base_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay)
    }

    /// Whether a failure of this kind and cause is eligible for retry at all.
    pub fn is_retryable(&self, kind: ErrorKind, cause: FailureCause) -> bool {
        if !self.enabled || !kind.is_retry_class() {
            return false;
        }
        match cause {
            FailureCause::Status(code) => self.retryable_status_codes.contains(&code),
            FailureCause::Transport(failure) => failure.is_retry_eligible(),
        }
    }

    /// Decide what to do after attempt number `attempt` (1-based) failed.
    pub fn decide(&self, attempt: u32, kind: ErrorKind, cause: FailureCause) -> RetryDecision {
        if !self.enabled || attempt > self.max_attempts {
            return RetryDecision::NoRetry;
        }
        if !self.is_retryable(kind, cause) {
            return RetryDecision::NoRetry;
        }
        RetryDecision::RetryAfter(self.delay(attempt))
    }
}

/// Spread `delay` uniformly within ±25%, never below zero.
fn jitter(delay: Duration) -> Duration {
    let secs = delay.as_secs_f64();
    let spread = secs * JITTER_RATIO;
    let offset = rand::thread_rng().gen_range(-spread..=spread);
    Duration::try_from_secs_f64((secs + offset).max(0.0)).unwrap_or(delay)
}
